// chirpstream-core: the unidirectional state core between the feed transports and consumers.

pub mod action;
pub mod adapter;
pub mod config;
pub mod error;
pub mod model;
pub mod projection;
pub mod reducer;
pub mod sink;
pub mod state;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::Action;
pub use adapter::{AdapterState, FeedAdapter};
pub use config::{FeedConfig, TlsVerification};
pub use error::CoreError;
pub use model::{Tweet, TweetUser};
pub use projection::visible_tweets;
pub use reducer::{Reducer, reduce};
pub use sink::{ObservabilitySink, TracingSink};
pub use state::State;
pub use store::{Store, SubscriberId};
