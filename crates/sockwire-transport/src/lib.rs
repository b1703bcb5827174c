//! Frame transports for Sockwire.
//!
//! The codec turns one `Message` into one string. Something still has
//! to carry that string to the peer as a unit; that is all a transport
//! does here:
//!
//! - [`Transport`] hands out new connections until it is shut down.
//! - [`Connection`] sends and receives whole text frames. Sending and
//!   receiving are independent, so one task can wait in `recv_frame`
//!   while others keep sending.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — one WebSocket message per frame, via
//!   `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{ShutdownHandle, WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Per-process connection number, used to tag log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of new connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;

    /// Waits for the next peer.
    ///
    /// Returns [`TransportError::Shutdown`] once [`shutdown`] has been
    /// called, including for a call that was already waiting.
    ///
    /// [`shutdown`]: Transport::shutdown
    async fn accept(&mut self) -> Result<Self::Connection, TransportError>;

    /// Stops accepting. Connections already handed out stay open.
    async fn shutdown(&self) -> Result<(), TransportError>;
}

/// One peer, exchanging whole text frames.
///
/// Each `send_frame` arrives as exactly one `recv_frame` on the other
/// side. `send_frame` and `close` never wait for a pending `recv_frame`.
pub trait Connection: Send + Sync + 'static {
    async fn send_frame(&self, frame: &str) -> Result<(), TransportError>;

    /// The next frame, or `Ok(None)` after the peer closed cleanly.
    async fn recv_frame(&self) -> Result<Option<String>, TransportError>;

    /// Starts the close handshake. Later sends fail.
    async fn close(&self) -> Result<(), TransportError>;

    fn id(&self) -> ConnectionId;
}
