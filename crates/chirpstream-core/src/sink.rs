//! Observability boundary for the feed adapter.
//!
//! The adapter never prints and never swallows: every dropped message
//! and every connection failure goes through this trait, so embedders
//! decide where reports land and tests can assert on them.

use crate::error::CoreError;

/// Receives the adapter's error reports.
pub trait ObservabilitySink {
    /// A per-message parse failure. The message was dropped.
    fn malformed_message(&self, error: &CoreError);

    /// The push channel failed or ended. The adapter will not reconnect.
    fn connection_error(&self, error: &CoreError);
}

/// Default sink: structured log records via `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn malformed_message(&self, error: &CoreError) {
        tracing::warn!(error = %error, "dropped malformed feed message");
    }

    fn connection_error(&self, error: &CoreError) {
        tracing::warn!(error = %error, "feed connection error");
    }
}
