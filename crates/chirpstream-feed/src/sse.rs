//! Server-sent-events client for the tweet push channel.
//!
//! Connects to the relay's stream endpoint and surfaces one [`FeedEvent`]
//! per logical occurrence through a [`tokio::sync::mpsc`] channel: `Opened`
//! once the stream is established, `Record` for every `data:` frame, and a
//! terminal `Closed` when the connection ends. A single connection per
//! handle -- no reconnection is attempted.
//!
//! # Example
//!
//! ```rust,ignore
//! use chirpstream_feed::sse::{FeedEvent, SseHandle};
//! use chirpstream_feed::transport::TransportConfig;
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let url = Url::parse("http://localhost:8080/api/stream")?;
//!
//! let (handle, mut rx) = SseHandle::connect(url, &TransportConfig::default(), cancel.clone())?;
//!
//! while let Some(event) = rx.recv().await {
//!     if let FeedEvent::Record(raw) = event {
//!         println!("{raw}");
//!     }
//! }
//!
//! handle.shutdown();
//! ```

use futures_util::StreamExt;
use reqwest::header;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Event channel capacity ───────────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 1024;

// ── FeedEvent ────────────────────────────────────────────────────────

/// One logical occurrence on the push channel.
#[derive(Debug)]
pub enum FeedEvent {
    /// The stream endpoint accepted the request; records may follow.
    Opened,

    /// The payload of one complete `data:` frame -- exactly one logical
    /// application record, still unparsed.
    Record(String),

    /// The connection ended. `error` is `None` for a clean server-side
    /// end of stream. Terminal: no further events follow.
    Closed { error: Option<Error> },
}

// ── SseHandle ────────────────────────────────────────────────────────

/// Handle to a running SSE reader task.
///
/// Dropping the receiver stops the task at its next send; calling
/// [`shutdown`](Self::shutdown) stops it deterministically without
/// emitting further events.
pub struct SseHandle {
    cancel: CancellationToken,
}

impl SseHandle {
    /// Spawn the reader task for `url` and return the event receiver.
    ///
    /// Returns immediately once the task is spawned; the connection is
    /// established asynchronously and reported via [`FeedEvent::Opened`].
    pub fn connect(
        url: Url,
        transport: &TransportConfig,
        cancel: CancellationToken,
    ) -> Result<(Self, mpsc::Receiver<FeedEvent>), Error> {
        let client = transport.build_client()?;
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            sse_task(client, url, event_tx, task_cancel).await;
        });

        Ok((Self { cancel }, event_rx))
    }

    /// Cancel the reader task. No events are emitted after this returns.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Reader task ──────────────────────────────────────────────────────

/// Connect once, read until the stream ends, report the outcome.
async fn sse_task(
    client: reqwest::Client,
    url: Url,
    event_tx: mpsc::Sender<FeedEvent>,
    cancel: CancellationToken,
) {
    let result = read_stream(&client, &url, &event_tx, &cancel).await;

    // A cancelled task must not emit anything further.
    if cancel.is_cancelled() {
        tracing::debug!("event stream task cancelled");
        return;
    }

    let _ = event_tx
        .send(FeedEvent::Closed {
            error: result.err(),
        })
        .await;
}

/// Establish the stream and pump frames until it drops.
async fn read_stream(
    client: &reqwest::Client,
    url: &Url,
    event_tx: &mpsc::Sender<FeedEvent>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting to event stream");

    let response = client
        .get(url.clone())
        .header(header::ACCEPT, "text/event-stream")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
        });
    }

    tracing::info!("event stream connected");
    if event_tx.send(FeedEvent::Opened).await.is_err() {
        return Ok(());
    }

    let mut parser = SseParser::new();
    let mut body = response.bytes_stream();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            chunk = body.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        for record in parser.feed(&bytes) {
                            if event_tx.send(FeedEvent::Record(record)).await.is_err() {
                                return Ok(());
                            }
                        }
                    }
                    Some(Err(e)) => return Err(Error::Transport(e)),
                    None => {
                        tracing::info!("event stream ended");
                        return Ok(());
                    }
                }
            }
        }
    }
}

// ── Incremental SSE parsing ──────────────────────────────────────────

/// Incremental parser for the `text/event-stream` grammar.
///
/// Feed it raw body chunks in any split; it yields one `String` per
/// completed event (the `data:` lines joined with `\n`). Comment lines
/// (the relay sends `:ping` heartbeats) and the `event:`/`id:`/`retry:`
/// fields produce no records.
#[derive(Debug, Default)]
pub struct SseParser {
    line: Vec<u8>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk and return the records it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut records = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                let mut line = std::mem::take(&mut self.line);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                self.process_line(&line, &mut records);
            } else {
                self.line.push(byte);
            }
        }
        records
    }

    fn process_line(&mut self, line: &[u8], out: &mut Vec<String>) {
        // Blank line terminates the current event.
        if line.is_empty() {
            if !self.data.is_empty() {
                out.push(self.data.join("\n"));
                self.data.clear();
            }
            return;
        }

        let line = String::from_utf8_lossy(line);

        // Comment line -- the relay's keep-alive (`:ping`).
        if let Some(comment) = line.strip_prefix(':') {
            tracing::trace!(comment = %comment.trim_start(), "sse comment");
            return;
        }

        if let Some(value) = line.strip_prefix("data:") {
            // One optional leading space after the colon, per the grammar.
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_owned());
        } else {
            // event:/id:/retry: and unknown fields -- unused by this feed.
            tracing::trace!(field = %line, "ignoring sse field");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
