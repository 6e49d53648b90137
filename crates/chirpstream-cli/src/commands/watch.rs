//! The `watch` command: stream the filtered projection to stdout.
//!
//! This is the view layer the core deliberately excludes: it dispatches
//! `SetFilter`, subscribes an observer, and re-derives the projection on
//! every notification, printing whatever newly became visible.

use std::cell::Cell;
use std::rc::Rc;

use chrono::Local;
use tokio_util::sync::CancellationToken;

use chirpstream_core::{
    Action, FeedAdapter, FeedConfig, Store, TracingSink, Tweet, visible_tweets,
};

use crate::cli::WatchArgs;
use crate::error::CliError;

pub async fn handle(args: WatchArgs, mut config: FeedConfig) -> Result<(), CliError> {
    if !args.socket {
        config.socket_url = None;
    }

    let store = Rc::new(Store::new());
    if let Some(contains) = args.contains {
        store.dispatch(Action::SetFilter(contains))?;
    }

    // Observers get no arguments: read the snapshot back, re-derive the
    // projection, and print the tail we haven't shown yet.
    let done = CancellationToken::new();
    let printed = Rc::new(Cell::new(0usize));
    let store_ref = Rc::clone(&store);
    let printed_ref = Rc::clone(&printed);
    let done_ref = done.clone();
    let limit = args.limit;
    store.subscribe(move || {
        let state = store_ref.state();
        let visible = visible_tweets(&state);
        for tweet in visible.iter().skip(printed_ref.get()) {
            print_tweet(tweet);
        }
        printed_ref.set(visible.len());
        if limit.is_some_and(|n| visible.len() >= n) {
            done_ref.cancel();
        }
    });

    let mut adapter = FeedAdapter::new(Rc::new(TracingSink));
    adapter.open(&config)?;

    tokio::select! {
        result = adapter.run(&store) => result?,
        () = done.cancelled() => {
            tracing::debug!("tweet limit reached");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
        }
    }
    adapter.close();

    Ok(())
}

fn print_tweet(tweet: &Tweet) {
    let stamp = Local::now().format("%H:%M:%S");
    match tweet.author() {
        Some(author) => println!("[{stamp}] @{author}: {}", tweet.text),
        None => println!("[{stamp}] {}", tweet.text),
    }
}
