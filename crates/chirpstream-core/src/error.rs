// ── Core error taxonomy ──
//
// Consumers never see transport details directly -- the `From`
// impl translates `chirpstream-feed` errors into the domain-level
// connection variant.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An inbound record could not be parsed as a tweet.
    ///
    /// Recoverable and per-message: the record is dropped and reported
    /// through the observability sink; the stream continues.
    #[error("Malformed feed message: {reason}")]
    MalformedMessage { reason: String, payload: String },

    /// The push channel failed or ended. The adapter does not reconnect.
    #[error("Feed connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// `dispatch` was called from inside a notification pass.
    ///
    /// A programming error: the offending call fails before the state is
    /// touched, so the store stays consistent.
    #[error("Re-entrant dispatch rejected: the store is mid-notification")]
    Reentrancy,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<chirpstream_feed::Error> for CoreError {
    fn from(err: chirpstream_feed::Error) -> Self {
        CoreError::ConnectionFailed {
            reason: err.to_string(),
        }
    }
}
