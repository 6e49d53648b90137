// ── Feed configuration ──

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// TLS verification policy for the feed endpoints.
#[derive(Debug, Clone)]
pub enum TlsVerification {
    /// Use the system certificate store.
    SystemDefaults,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate.
    DangerAcceptInvalid,
}

/// Everything the feed adapter needs to open the push channels.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// SSE stream endpoint -- the tweet channel.
    pub stream_url: Url,

    /// Optional WebSocket notice endpoint.
    pub socket_url: Option<Url>,

    pub tls: TlsVerification,

    /// Bound on connection establishment, not on the open stream.
    pub connect_timeout: Duration,
}
