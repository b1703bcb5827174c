//! # Sockwire
//!
//! Compact text wire protocol for duplex event transports.
//!
//! Sockwire multiplexes connection lifecycle signals (open, close,
//! ping/pong) and application events with optional acknowledgements
//! over a single stream of text frames. This crate ties the layers
//! together:
//!
//! ```text
//! Transport (text frames) → Protocol (Message) → your dispatch code
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sockwire::prelude::*;
//!
//! # async fn run() -> Result<(), SockwireError> {
//! let mut transport = WebSocketTransport::bind("127.0.0.1:8080").await?;
//! let conn = FramedConnection::with_defaults(transport.accept().await?);
//!
//! while let Some(msg) = conn.recv().await? {
//!     if msg.kind == MessageKind::Ping {
//!         conn.send(&Message::pong().with_namespace(msg.namespace)).await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod framed;

pub use config::{FramingConfig, MalformedPolicy};
pub use error::SockwireError;
pub use framed::FramedConnection;

pub use sockwire_protocol as protocol;
pub use sockwire_transport as transport;

/// Everything needed to accept connections and exchange messages.
pub mod prelude {
    pub use crate::{
        FramedConnection, FramingConfig, MalformedPolicy, SockwireError,
    };
    pub use sockwire_protocol::{
        decode, encode, FrameCodec, Message, MessageKind, ProtocolError,
        TextCodec,
    };
    pub use sockwire_transport::{
        Connection, ConnectionId, ShutdownHandle, Transport, TransportError,
        WebSocketConnection, WebSocketTransport,
    };
}
