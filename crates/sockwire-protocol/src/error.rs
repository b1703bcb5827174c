//! Error types for the protocol layer.
//!
//! Every failure here is deterministic: the same frame text always
//! produces the same error, so callers should drop the frame (or the
//! connection) rather than retry.

use std::num::ParseIntError;

/// Errors that can occur while encoding or decoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The kind prefix is missing or unknown.
    ///
    /// Raised by the decoder for an empty frame or an unmatched leading
    /// character sequence, and by [`MessageKind::try_from`] for a numeric
    /// kind code outside the known range.
    ///
    /// [`MessageKind::try_from`]: crate::MessageKind
    #[error("wrong message type")]
    WrongMessageType,

    /// The body of the frame is structurally malformed: missing ack id
    /// where it is mandatory, a broken `[...]` wrapper, or bad method
    /// quoting.
    #[error("wrong packet")]
    WrongPacket,

    /// The digits in front of the body did not parse as an ack id.
    ///
    /// `#[from]` lets `?` convert a `ParseIntError` straight into this
    /// variant, so the numeric error reaches the caller unchanged.
    #[error("invalid ack id: {0}")]
    InvalidAckId(#[from] ParseIntError),

    /// JSON handling failed: quoting a method name, or the structured
    /// args helpers on [`Message`](crate::Message).
    #[error("json error: {0}")]
    Json(#[source] serde_json::Error),
}

impl ProtocolError {
    /// Returns `true` when the frame text itself is bad: unknown prefix,
    /// broken body, or unparseable ack id. `Json` errors come from the
    /// caller's side and are not counted.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::WrongMessageType | Self::WrongPacket | Self::InvalidAckId(_)
        )
    }
}
