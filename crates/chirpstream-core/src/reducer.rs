//! The pure transition function.

use std::sync::Arc;

use crate::action::Action;
use crate::state::State;

/// Reducer signature accepted by the store.
pub type Reducer = fn(&State, &Action) -> State;

/// Compute the next state from the current state and one action.
///
/// Pure and total: no I/O, no panics, reads nothing but its parameters.
/// The returned state may share structure with the input (the tweets are
/// `Arc`s); the input itself is never modified.
pub fn reduce(state: &State, action: &Action) -> State {
    match action {
        Action::AddTweet(tweet) => {
            let mut next = state.clone();
            next.tweets.push(Arc::clone(tweet));
            next
        }
        Action::SetFilter(filter) => {
            let mut next = state.clone();
            next.filter_contains.clone_from(filter);
            next
        }
        Action::StreamOpened => {
            // Guard against duplicate open notifications.
            if state.streaming {
                return state.clone();
            }
            let mut next = state.clone();
            next.streaming = true;
            next
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
