//! Read-only derived views. Nothing here is stored or cached.

use std::sync::Arc;

use crate::model::Tweet;
use crate::state::State;

/// Tweets whose text contains the current filter, in arrival order.
///
/// Case-sensitive containment; the empty filter matches everything.
/// Pure function of the state -- safe to call arbitrarily often.
pub fn visible_tweets(state: &State) -> Vec<Arc<Tweet>> {
    state
        .tweets
        .iter()
        .filter(|t| t.text.contains(&state.filter_contains))
        .map(Arc::clone)
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────
