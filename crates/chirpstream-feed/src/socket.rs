//! Upgradeable notice socket.
//!
//! Connects to the relay's WebSocket endpoint and logs the textual
//! notices it pushes. Notices never become store actions -- this surface
//! exists so the channel stays observable while the protocol on it is
//! still being defined. Keep-alive is transport-level only: tungstenite
//! answers protocol pings automatically, and nothing application-level
//! is layered on top.

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;

/// Handle to a running notice-socket reader task.
pub struct SocketHandle {
    cancel: CancellationToken,
}

impl SocketHandle {
    /// Spawn the reader task for `url`.
    ///
    /// Returns immediately; connection failures are logged by the task.
    pub fn connect(url: Url, cancel: CancellationToken) -> Self {
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            match connect_and_log(&url, &task_cancel).await {
                Ok(()) => tracing::info!("notice socket closed"),
                Err(e) => tracing::warn!(error = %e, "notice socket failed"),
            }
        });

        Self { cancel }
    }

    /// Cancel the reader task and release the connection.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Establish a single WebSocket connection and log frames until it drops.
async fn connect_and_log(url: &Url, cancel: &CancellationToken) -> Result<(), Error> {
    tracing::info!(url = %url, "connecting to notice socket");

    let uri: tungstenite::http::Uri = url
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::SocketConnect(e.to_string()))?;

    let (ws_stream, _response) = tokio_tungstenite::connect_async(ClientRequestBuilder::new(uri))
        .await
        .map_err(|e| Error::SocketConnect(e.to_string()))?;

    tracing::info!("notice socket connected");

    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        tracing::info!(notice = %text, "socket notice");
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite handles pong replies automatically
                        tracing::trace!("socket ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(
                                code = %cf.code,
                                reason = %cf.reason,
                                "socket close frame received"
                            );
                        } else {
                            tracing::info!("socket close frame received (no payload)");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        return Err(Error::SocketClosed {
                            reason: e.to_string(),
                        });
                    }
                    None => {
                        tracing::info!("notice socket stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}
