// chirpstream-feed: raw push-channel transports for the tweet feed (SSE + notice socket)

pub mod error;
pub mod socket;
pub mod sse;
pub mod transport;

pub use error::Error;
pub use socket::SocketHandle;
pub use sse::{FeedEvent, SseHandle, SseParser};
pub use transport::{TlsMode, TransportConfig};
