//! Errors raised while moving frames.

use std::time::Duration;

/// What went wrong below the codec.
///
/// Decoding failures are not reported here; a transport only promises
/// that a frame is whole and is text.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listener or accepting a TCP stream failed.
    #[error("listener error: {0}")]
    Listener(#[source] std::io::Error),

    /// The WebSocket layer failed (upgrade, read or write).
    #[cfg(feature = "websocket")]
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A binary frame arrived that is not valid UTF-8.
    #[error("frame is not text: {0}")]
    NotText(#[from] std::string::FromUtf8Error),

    /// No frame arrived within the allowed time. The connection has
    /// been closed by the time this is returned.
    #[error("no frame within {0:?}")]
    TimedOut(Duration),

    /// [`Transport::shutdown`](crate::Transport::shutdown) was called.
    #[error("transport shut down")]
    Shutdown,
}
