//! A connection that speaks [`Message`]s instead of raw text.
//!
//! Wraps any transport [`Connection`] and runs every outgoing message
//! through the codec's encoder and every incoming frame through its
//! decoder.

use sockwire_protocol::{FrameCodec, Message, TextCodec};
use sockwire_transport::{Connection, ConnectionId, TransportError};

use crate::{FramingConfig, MalformedPolicy, SockwireError};

/// A [`Connection`] paired with a [`FrameCodec`].
///
/// The codec defaults to [`TextCodec`]. Every method takes `&self`, so
/// one task can sit in [`recv`](Self::recv) while others
/// [`send`](Self::send) through a shared `Arc`.
pub struct FramedConnection<C, K = TextCodec>
where
    C: Connection,
    K: FrameCodec,
{
    conn: C,
    codec: K,
    config: FramingConfig,
}

impl<C> FramedConnection<C, TextCodec>
where
    C: Connection,
{
    /// Wraps `conn` with the default codec and configuration.
    pub fn with_defaults(conn: C) -> Self {
        Self::new(conn, TextCodec, FramingConfig::default())
    }
}

impl<C, K> FramedConnection<C, K>
where
    C: Connection,
    K: FrameCodec,
{
    pub fn new(conn: C, codec: K, config: FramingConfig) -> Self {
        Self {
            conn,
            codec,
            config,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Encodes `msg` and sends it as one frame.
    ///
    /// Nothing is sent if encoding fails.
    pub async fn send(&self, msg: &Message) -> Result<(), SockwireError> {
        let frame = self.codec.encode(msg)?;
        tracing::trace!(conn = %self.conn.id(), kind = %msg.kind, "sending frame");
        self.conn.send_frame(&frame).await?;
        Ok(())
    }

    /// Receives and decodes the next message.
    ///
    /// Returns `Ok(None)` once the peer has closed the connection.
    /// Frames that fail to decode are handled per
    /// [`FramingConfig::on_malformed`]. If
    /// [`FramingConfig::recv_timeout`] passes without a frame, the
    /// connection is closed and [`TransportError::TimedOut`] returned.
    pub async fn recv(&self) -> Result<Option<Message>, SockwireError> {
        loop {
            let Some(frame) = self.recv_frame().await? else {
                return Ok(None);
            };

            match self.codec.decode(&frame) {
                Ok(msg) => return Ok(Some(msg)),
                Err(source) => match self.config.on_malformed {
                    MalformedPolicy::Discard => {
                        tracing::debug!(
                            conn = %self.conn.id(),
                            error = %source,
                            "discarding malformed frame"
                        );
                    }
                    MalformedPolicy::Close => {
                        tracing::info!(
                            conn = %self.conn.id(),
                            error = %source,
                            "closing connection after malformed frame"
                        );
                        if let Err(e) = self.conn.close().await {
                            tracing::debug!(error = %e, "close failed");
                        }
                        return Err(SockwireError::MalformedFrame {
                            frame,
                            source,
                        });
                    }
                },
            }
        }
    }

    /// Closes the underlying connection.
    pub async fn close(&self) -> Result<(), SockwireError> {
        self.conn.close().await?;
        Ok(())
    }

    /// Unwraps the underlying connection.
    pub fn into_inner(self) -> C {
        self.conn
    }

    async fn recv_frame(&self) -> Result<Option<String>, TransportError> {
        let Some(limit) = self.config.recv_timeout else {
            return self.conn.recv_frame().await;
        };
        match tokio::time::timeout(limit, self.conn.recv_frame()).await {
            Ok(received) => received,
            Err(_) => {
                tracing::info!(conn = %self.conn.id(), ?limit, "peer went quiet, closing");
                if let Err(e) = self.conn.close().await {
                    tracing::debug!(error = %e, "close failed");
                }
                Err(TransportError::TimedOut(limit))
            }
        }
    }
}
