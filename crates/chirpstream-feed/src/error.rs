use thiserror::Error;

/// Top-level error type for the `chirpstream-feed` crate.
///
/// Covers the two transport surfaces: the SSE stream endpoint and the
/// notice socket. `chirpstream-core` maps these into its domain-level
/// connection errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Stream endpoint ─────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The stream endpoint answered with a non-success status.
    #[error("Stream endpoint returned HTTP {status}")]
    Http { status: u16 },

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Notice socket ───────────────────────────────────────────────
    /// WebSocket connection failed.
    #[error("Socket connection failed: {0}")]
    SocketConnect(String),

    /// WebSocket read failed after the connection was established.
    #[error("Socket closed: {reason}")]
    SocketClosed { reason: String },
}
