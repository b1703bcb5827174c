//! Message kinds and their wire prefixes.
//!
//! Every frame starts with a short run of digits that says what kind of
//! message it carries. The mapping is total in both directions except
//! for one deliberate overlap: `Emit` and `AckRequest` share `42`, and
//! the decoder tells them apart by looking for an ack id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Wire prefixes
// ---------------------------------------------------------------------------

const OPEN: &str = "0";
const CLOSE: &str = "1";
const PING: &str = "2";
const PONG: &str = "3";
const EMPTY: &str = "40";
const EVENT: &str = "42";
const ACK: &str = "43";

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// What a [`Message`](crate::Message) is for.
///
/// The first four kinds are connection lifecycle signals. `Empty` is a
/// bare message frame with no body. The last three carry application
/// events and acknowledgements.
///
/// Serialized as its numeric code (`Open` = 0 through `AckResponse` = 7)
/// and deserialized through `TryFrom<u8>`, so an unknown code coming
/// from outside is rejected with [`ProtocolError::WrongMessageType`]
/// instead of producing a kind the encoder cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MessageKind {
    /// Connection opened; carries the handshake payload verbatim.
    Open,
    /// Connection closing.
    Close,
    /// Keepalive probe.
    Ping,
    /// Keepalive reply.
    Pong,
    /// Message frame without a body.
    Empty,
    /// Named event, no acknowledgement expected.
    Emit,
    /// Named event the peer must acknowledge.
    AckRequest,
    /// Acknowledgement for an earlier `AckRequest`.
    AckResponse,
}

impl MessageKind {
    /// All kinds, in numeric code order.
    pub const ALL: [MessageKind; 8] = [
        Self::Open,
        Self::Close,
        Self::Ping,
        Self::Pong,
        Self::Empty,
        Self::Emit,
        Self::AckRequest,
        Self::AckResponse,
    ];

    /// Returns the wire prefix written in front of every frame of this
    /// kind.
    pub fn prefix(self) -> &'static str {
        // No wildcard arm: adding a kind without a prefix is a compile
        // error.
        match self {
            Self::Open => OPEN,
            Self::Close => CLOSE,
            Self::Ping => PING,
            Self::Pong => PONG,
            Self::Empty => EMPTY,
            Self::Emit | Self::AckRequest => EVENT,
            Self::AckResponse => ACK,
        }
    }

    /// Maps a wire prefix back to a kind.
    ///
    /// `"42"` maps to [`MessageKind::Emit`]; the decoder upgrades it to
    /// [`MessageKind::AckRequest`] once it finds an ack id.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            OPEN => Some(Self::Open),
            CLOSE => Some(Self::Close),
            PING => Some(Self::Ping),
            PONG => Some(Self::Pong),
            EMPTY => Some(Self::Empty),
            EVENT => Some(Self::Emit),
            ACK => Some(Self::AckResponse),
            _ => None,
        }
    }

    /// Kinds whose frame ends right after the optional namespace.
    pub fn is_bodyless(self) -> bool {
        matches!(self, Self::Close | Self::Ping | Self::Pong | Self::Empty)
    }

    /// Kinds that carry an ack id on the wire.
    pub fn has_ack_id(self) -> bool {
        matches!(self, Self::AckRequest | Self::AckResponse)
    }

    /// Kinds that carry a method name on the wire.
    pub fn has_method(self) -> bool {
        matches!(self, Self::Emit | Self::AckRequest)
    }
}

impl From<MessageKind> for u8 {
    fn from(kind: MessageKind) -> u8 {
        match kind {
            MessageKind::Open => 0,
            MessageKind::Close => 1,
            MessageKind::Ping => 2,
            MessageKind::Pong => 3,
            MessageKind::Empty => 4,
            MessageKind::Emit => 5,
            MessageKind::AckRequest => 6,
            MessageKind::AckResponse => 7,
        }
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(ProtocolError::WrongMessageType)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Empty => "empty",
            Self::Emit => "emit",
            Self::AckRequest => "ack-request",
            Self::AckResponse => "ack-response",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table() {
        assert_eq!(MessageKind::Open.prefix(), "0");
        assert_eq!(MessageKind::Close.prefix(), "1");
        assert_eq!(MessageKind::Ping.prefix(), "2");
        assert_eq!(MessageKind::Pong.prefix(), "3");
        assert_eq!(MessageKind::Empty.prefix(), "40");
        assert_eq!(MessageKind::Emit.prefix(), "42");
        assert_eq!(MessageKind::AckRequest.prefix(), "42");
        assert_eq!(MessageKind::AckResponse.prefix(), "43");
    }

    #[test]
    fn test_every_prefix_maps_back_to_its_class() {
        for kind in MessageKind::ALL {
            let back = MessageKind::from_prefix(kind.prefix()).unwrap();
            // AckRequest shares the event prefix and comes back as Emit.
            if kind == MessageKind::AckRequest {
                assert_eq!(back, MessageKind::Emit);
            } else {
                assert_eq!(back, kind);
            }
        }
    }

    #[test]
    fn test_unknown_prefixes() {
        assert_eq!(MessageKind::from_prefix(""), None);
        assert_eq!(MessageKind::from_prefix("4"), None);
        assert_eq!(MessageKind::from_prefix("41"), None);
        assert_eq!(MessageKind::from_prefix("5"), None);
    }

    #[test]
    fn test_numeric_codes_round_trip() {
        for kind in MessageKind::ALL {
            let code: u8 = kind.into();
            assert_eq!(MessageKind::try_from(code).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_code_is_wrong_message_type() {
        let err = MessageKind::try_from(8).unwrap_err();
        assert!(matches!(err, ProtocolError::WrongMessageType));
        assert!(MessageKind::try_from(255).is_err());
    }

    #[test]
    fn test_serde_uses_numeric_code() {
        let json = serde_json::to_string(&MessageKind::AckResponse).unwrap();
        assert_eq!(json, "7");

        let kind: MessageKind = serde_json::from_str("2").unwrap();
        assert_eq!(kind, MessageKind::Ping);

        let bad: Result<MessageKind, _> = serde_json::from_str("42");
        assert!(bad.is_err());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(MessageKind::Ping.is_bodyless());
        assert!(!MessageKind::Open.is_bodyless());
        assert!(MessageKind::AckResponse.has_ack_id());
        assert!(!MessageKind::Emit.has_ack_id());
        assert!(MessageKind::AckRequest.has_method());
        assert!(!MessageKind::AckResponse.has_method());
    }

    #[test]
    fn test_display() {
        assert_eq!(MessageKind::AckRequest.to_string(), "ack-request");
        assert_eq!(MessageKind::Ping.to_string(), "ping");
    }
}
