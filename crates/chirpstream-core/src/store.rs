//! The single-owner state container.
//!
//! One `Store` per session, constructed explicitly and passed by
//! reference to collaborators -- there is no ambient global. All
//! mutation funnels through [`dispatch`](Store::dispatch): reduce,
//! replace, then notify subscribers in subscription order.
//!
//! The store is deliberately `!Sync`: asynchronous inputs reach it
//! through channels consumed on its own task, so dispatches can never
//! interleave and no locks are involved. Re-entrant dispatch (an
//! observer dispatching from inside a notification) is rejected up
//! front rather than queued, keeping the update model auditable.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::action::Action;
use crate::error::CoreError;
use crate::reducer::{self, Reducer};
use crate::state::State;

/// Identifies one subscriber for [`Store::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    notify: Rc<dyn Fn()>,
}

/// Owns the current [`State`] and one [`Reducer`].
pub struct Store {
    state: RefCell<State>,
    reducer: Reducer,
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
    /// Held `true` for the whole reduce-replace-notify pass.
    dispatching: Cell<bool>,
}

impl Store {
    /// Store with the default reducer and the default initial state.
    pub fn new() -> Self {
        Self::with_state(State::default())
    }

    /// Store with a caller-provided initial state.
    pub fn with_state(state: State) -> Self {
        Self::with_reducer(state, reducer::reduce)
    }

    /// Store wrapping an arbitrary reducer.
    pub fn with_reducer(state: State, reducer: Reducer) -> Self {
        Self {
            state: RefCell::new(state),
            reducer,
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            dispatching: Cell::new(false),
        }
    }

    /// Snapshot of the current state. Cheap: tweets are shared `Arc`s.
    pub fn state(&self) -> State {
        self.state.borrow().clone()
    }

    /// Apply `action` and notify subscribers.
    ///
    /// Synchronous: the reducer runs, the state is replaced, and every
    /// subscriber registered when the pass started is notified in
    /// subscription order, with no arguments -- observers read back
    /// through [`state`](Self::state). Re-entrant calls fail fast with
    /// [`CoreError::Reentrancy`] before the state is touched.
    pub fn dispatch(&self, action: Action) -> Result<(), CoreError> {
        if self.dispatching.get() {
            return Err(CoreError::Reentrancy);
        }
        self.dispatching.set(true);

        {
            let mut state = self.state.borrow_mut();
            let next = (self.reducer)(&state, &action);
            *state = next;
        }

        // Stable snapshot: subscribing or unsubscribing during the pass
        // does not affect who receives this notification.
        let pass: Vec<Rc<dyn Fn()>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|s| Rc::clone(&s.notify))
            .collect();
        for notify in pass {
            notify();
        }

        self.dispatching.set(false);
        Ok(())
    }

    /// Register `observer`; it runs after every completed dispatch.
    ///
    /// Returns the id to pass to [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, observer: impl Fn() + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            notify: Rc::new(observer),
        });
        id
    }

    /// Deregister a subscriber. Returns whether it was still registered.
    ///
    /// Safe to call from inside a notification; the in-flight pass still
    /// completes against the snapshot it started with.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Tweet;
    use crate::projection::visible_tweets;
    use pretty_assertions::assert_eq;

    fn tweet(text: &str) -> Arc<Tweet> {
        Arc::new(Tweet {
            text: text.to_owned(),
            id: None,
            user: None,
            created_at: None,
            extra: serde_json::Value::Null,
        })
    }

    #[test]
    fn default_state_then_add_tweet() {
        let store = Store::new();
        let initial = store.state();
        assert!(initial.tweets.is_empty());
        assert_eq!(initial.filter_contains, "");
        assert!(!initial.streaming);

        store.dispatch(Action::AddTweet(tweet("hello"))).unwrap();

        let state = store.state();
        assert_eq!(state.tweets.len(), 1);
        assert_eq!(state.tweets[0].text, "hello");
    }

    #[test]
    fn filter_then_add_two_projects_one() {
        let store = Store::new();
        store.dispatch(Action::SetFilter("ell".to_owned())).unwrap();
        store.dispatch(Action::AddTweet(tweet("hello"))).unwrap();
        store.dispatch(Action::AddTweet(tweet("world"))).unwrap();

        let visible = visible_tweets(&store.state());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].text, "hello");
    }

    #[test]
    fn double_stream_opened_latches_once() {
        let store = Store::new();
        store.dispatch(Action::StreamOpened).unwrap();
        let after_first = store.state();
        store.dispatch(Action::StreamOpened).unwrap();

        let state = store.state();
        assert!(state.streaming);
        assert!(state.tweets.is_empty());
        assert_eq!(state, after_first);
    }

    #[test]
    fn subscribers_run_in_subscription_order() {
        let store = Store::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for label in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            store.subscribe(move || order.borrow_mut().push(label));
        }

        store.dispatch(Action::StreamOpened).unwrap();
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn observers_see_the_new_state() {
        let store = Rc::new(Store::new());
        let seen = Rc::new(Cell::new(0));

        let store_ref = Rc::clone(&store);
        let seen_ref = Rc::clone(&seen);
        store.subscribe(move || seen_ref.set(store_ref.state().tweets.len()));

        store.dispatch(Action::AddTweet(tweet("x"))).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn self_unsubscribe_mid_pass_completes_then_goes_silent() {
        let store = Rc::new(Store::new());
        let first_calls = Rc::new(Cell::new(0));
        let second_calls = Rc::new(Cell::new(0));

        // First observer unsubscribes itself on its first notification.
        let own_id = Rc::new(Cell::new(None));
        let store_ref = Rc::clone(&store);
        let first_ref = Rc::clone(&first_calls);
        let own_id_ref = Rc::clone(&own_id);
        let id = store.subscribe(move || {
            first_ref.set(first_ref.get() + 1);
            if let Some(id) = own_id_ref.get() {
                assert!(store_ref.unsubscribe(id));
            }
        });
        own_id.set(Some(id));

        let second_ref = Rc::clone(&second_calls);
        store.subscribe(move || second_ref.set(second_ref.get() + 1));

        // First pass: both observers run, including the one that removes
        // itself mid-pass.
        store.dispatch(Action::StreamOpened).unwrap();
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 1);

        // Second pass: only the survivor runs.
        store.dispatch(Action::AddTweet(tweet("x"))).unwrap();
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 2);
    }

    #[test]
    fn unsubscribing_a_peer_mid_pass_still_delivers_the_snapshot() {
        let store = Rc::new(Store::new());
        let peer_calls = Rc::new(Cell::new(0));
        let peer_slot = Rc::new(Cell::new(None));

        // The remover runs first (subscribed first) and removes the peer
        // before the peer's own delivery in the same pass.
        let store_ref = Rc::clone(&store);
        let peer_slot_ref = Rc::clone(&peer_slot);
        store.subscribe(move || {
            if let Some(peer) = peer_slot_ref.get() {
                store_ref.unsubscribe(peer);
            }
        });

        let peer_ref = Rc::clone(&peer_calls);
        let peer = store.subscribe(move || peer_ref.set(peer_ref.get() + 1));
        peer_slot.set(Some(peer));

        // The pass snapshot was taken before the removal, so the peer
        // still receives the in-flight notification.
        store.dispatch(Action::StreamOpened).unwrap();
        assert_eq!(peer_calls.get(), 1);

        // And nothing afterwards.
        store.dispatch(Action::AddTweet(tweet("x"))).unwrap();
        assert_eq!(peer_calls.get(), 1, "removed peer must stay silent");
    }

    #[test]
    fn subscribing_mid_pass_misses_the_in_flight_notification() {
        let store = Rc::new(Store::new());
        let late_calls = Rc::new(Cell::new(0));

        let store_ref = Rc::clone(&store);
        let late_ref = Rc::clone(&late_calls);
        let added = Rc::new(Cell::new(false));
        store.subscribe(move || {
            if !added.get() {
                added.set(true);
                let late = Rc::clone(&late_ref);
                store_ref.subscribe(move || late.set(late.get() + 1));
            }
        });

        store.dispatch(Action::StreamOpened).unwrap();
        assert_eq!(late_calls.get(), 0, "not part of the pass snapshot");

        store.dispatch(Action::AddTweet(tweet("x"))).unwrap();
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn reentrant_dispatch_fails_fast_without_corrupting_state() {
        let store = Rc::new(Store::new());
        let result = Rc::new(RefCell::new(None));

        let store_ref = Rc::clone(&store);
        let result_ref = Rc::clone(&result);
        store.subscribe(move || {
            let attempt = store_ref.dispatch(Action::AddTweet(tweet("nested")));
            *result_ref.borrow_mut() = Some(attempt);
        });

        store.dispatch(Action::AddTweet(tweet("outer"))).unwrap();

        assert!(matches!(
            result.borrow().as_ref(),
            Some(Err(CoreError::Reentrancy))
        ));
        // Only the outer dispatch landed.
        let state = store.state();
        assert_eq!(state.tweets.len(), 1);
        assert_eq!(state.tweets[0].text, "outer");

        // The store stays usable afterwards.
        store.dispatch(Action::AddTweet(tweet("later"))).unwrap();
        assert_eq!(store.state().tweets.len(), 2);
    }

    #[test]
    fn unsubscribe_unknown_id_is_false() {
        let store = Store::new();
        let id = store.subscribe(|| {});
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn custom_reducer_is_honored() {
        fn identity(state: &State, _action: &Action) -> State {
            state.clone()
        }

        let store = Store::with_reducer(State::default(), identity);
        store.dispatch(Action::AddTweet(tweet("ignored"))).unwrap();
        assert!(store.state().tweets.is_empty());
    }
}
