//! All possible state transitions. Actions are the sole mechanism for
//! state mutation.

use std::sync::Arc;

use crate::model::Tweet;

/// An immutable description of one intended state transition.
///
/// The payload each kind requires is part of its variant, so a
/// malformed action cannot be constructed.
#[derive(Debug, Clone)]
pub enum Action {
    /// Append one tweet received from the feed.
    AddTweet(Arc<Tweet>),

    /// Replace the substring filter (empty string clears it).
    SetFilter(String),

    /// The push channel reported open. Idempotent after the first.
    StreamOpened,
}
