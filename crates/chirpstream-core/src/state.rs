use std::sync::Arc;

use crate::model::Tweet;

/// The single application state owned by the [`Store`](crate::Store).
///
/// Never mutated in place: every transition produces a new value derived
/// from the previous one. Tweets are shared `Arc`s, so snapshots are
/// cheap and an append shares structure with the prior state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    /// Every tweet received this session, in arrival order. Append-only.
    pub tweets: Vec<Arc<Tweet>>,

    /// Substring filter for the view projection; empty means no filter.
    pub filter_contains: String,

    /// Latches to `true` once the stream reports open, then stays there
    /// for the session.
    pub streaming: bool,
}
