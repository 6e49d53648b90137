// ── Feed adapter ──
//
// Bridges the push channel to the store. An explicit state machine
// (Idle -> Connecting -> Open -> Closed-with-error) driven by
// `FeedEvent`s from the transport, so the behavior is independent of the
// I/O primitive and testable with synthetic events.

use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use chirpstream_feed::socket::SocketHandle;
use chirpstream_feed::sse::{FeedEvent, SseHandle};
use chirpstream_feed::transport::{TlsMode, TransportConfig};

use crate::action::Action;
use crate::config::{FeedConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::Tweet;
use crate::sink::ObservabilitySink;
use crate::store::Store;

/// Connection state of the adapter's single push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterState {
    #[default]
    Idle,
    Connecting,
    Open,
    /// The channel ended. The adapter stays here -- no reconnection.
    ClosedWithError,
}

/// Translates inbound feed events into store actions.
///
/// Manages exactly one push connection per session; the optional notice
/// socket rides along but never produces actions. Errors never crash the
/// adapter: malformed records are dropped and reported, channel failures
/// park the adapter in [`AdapterState::ClosedWithError`].
pub struct FeedAdapter {
    state: AdapterState,
    sink: Rc<dyn ObservabilitySink>,
    cancel: CancellationToken,
    events: Option<mpsc::Receiver<FeedEvent>>,
    stream: Option<SseHandle>,
    socket: Option<SocketHandle>,
}

impl FeedAdapter {
    pub fn new(sink: Rc<dyn ObservabilitySink>) -> Self {
        Self {
            state: AdapterState::Idle,
            sink,
            cancel: CancellationToken::new(),
            events: None,
            stream: None,
            socket: None,
        }
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// Open the push channel.
    ///
    /// No-op when already `Connecting` or `Open` -- mirroring the
    /// reducer's idempotent `StreamOpened` guard. Establishment is
    /// asynchronous: the transition to `Open` (and the `StreamOpened`
    /// dispatch) happens when the transport reports [`FeedEvent::Opened`].
    pub fn open(&mut self, config: &FeedConfig) -> Result<(), CoreError> {
        if matches!(self.state, AdapterState::Connecting | AdapterState::Open) {
            tracing::debug!(state = ?self.state, "open ignored; channel already up");
            return Ok(());
        }

        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            connect_timeout: config.connect_timeout,
        };

        // Fresh token per connection attempt so a previous close cannot
        // cancel the new transport.
        self.cancel = CancellationToken::new();

        let (stream, events) =
            SseHandle::connect(config.stream_url.clone(), &transport, self.cancel.clone())?;
        self.stream = Some(stream);
        self.events = Some(events);

        if let Some(ref socket_url) = config.socket_url {
            self.socket = Some(SocketHandle::connect(
                socket_url.clone(),
                self.cancel.clone(),
            ));
        }

        self.state = AdapterState::Connecting;
        Ok(())
    }

    /// Attach an externally established event channel.
    ///
    /// Alternative to [`open`](Self::open) for custom transports and for
    /// tests that inject synthetic events.
    pub fn attach(&mut self, events: mpsc::Receiver<FeedEvent>) {
        self.events = Some(events);
        self.state = AdapterState::Connecting;
    }

    /// Translate one transport event into at most one dispatch.
    pub fn apply(&mut self, store: &Store, event: FeedEvent) -> Result<(), CoreError> {
        match event {
            FeedEvent::Opened => {
                if self.state == AdapterState::Open {
                    // Duplicate open notification.
                    return Ok(());
                }
                self.state = AdapterState::Open;
                store.dispatch(Action::StreamOpened)
            }

            FeedEvent::Record(raw) => {
                if self.state != AdapterState::Open {
                    tracing::debug!(state = ?self.state, "record outside open state dropped");
                    return Ok(());
                }
                match Tweet::from_record(&raw) {
                    Ok(tweet) => store.dispatch(Action::AddTweet(Arc::new(tweet))),
                    Err(e) => {
                        let error = CoreError::MalformedMessage {
                            reason: e.to_string(),
                            payload: raw,
                        };
                        self.sink.malformed_message(&error);
                        Ok(())
                    }
                }
            }

            FeedEvent::Closed { error } => {
                self.state = AdapterState::ClosedWithError;
                let reason = error.map_or_else(
                    || "stream ended by server".to_owned(),
                    |e| e.to_string(),
                );
                self.sink
                    .connection_error(&CoreError::ConnectionFailed { reason });
                Ok(())
            }
        }
    }

    /// Drive the adapter until the channel ends or [`close`](Self::close)
    /// tears the transport down.
    pub async fn run(&mut self, store: &Store) -> Result<(), CoreError> {
        let Some(mut events) = self.events.take() else {
            tracing::debug!("run without an attached channel is a no-op");
            return Ok(());
        };

        while let Some(event) = events.recv().await {
            self.apply(store, event)?;
            if self.state == AdapterState::ClosedWithError {
                break;
            }
        }
        Ok(())
    }

    /// Tear down the transport deterministically.
    ///
    /// Cancels the background tasks and drops the event channel; no
    /// action is dispatched after this returns. The adapter returns to
    /// `Idle` unless the channel had already failed.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.events = None;
        self.stream = None;
        self.socket = None;
        if self.state != AdapterState::ClosedWithError {
            self.state = AdapterState::Idle;
        }
    }
}

impl Drop for FeedAdapter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

// ── Tests ────────────────────────────────────────────────────────────
