//! The structured side of a frame.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{MessageKind, ProtocolError};

/// One frame, in structured form.
///
/// `kind` decides which of the other fields mean anything:
///
/// | Kind | namespace | ack_id | method | args |
/// |---|---|---|---|---|
/// | `Open` | yes | | | verbatim |
/// | `Close`, `Ping`, `Pong`, `Empty` | yes | | | |
/// | `Emit` | yes | | yes | array body |
/// | `AckRequest` | yes | yes | yes | array body |
/// | `AckResponse` | yes | yes | | array interior |
///
/// Fields that don't apply are ignored by the encoder and left at their
/// defaults by the decoder.
///
/// ## Args are opaque
///
/// `args` is pre-serialized JSON text and is copied byte for byte in both
/// directions. The codec never parses or re-serializes it, so **the
/// caller owns its JSON correctness**. The `*_json` helpers below are an
/// optional layer for callers that want serde to do that work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,

    /// Logical channel, including its leading `/`. Empty means the
    /// default namespace.
    #[serde(default)]
    pub namespace: String,

    /// Correlates an `AckRequest` with its `AckResponse`.
    #[serde(default)]
    pub ack_id: Option<u64>,

    /// Event name for `Emit` and `AckRequest`.
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub args: String,

    /// The raw frame this message was decoded from. Set only by
    /// [`decode`](crate::decode), for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Message {
    /// A message of the given kind with every other field empty.
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            namespace: String::new(),
            ack_id: None,
            method: String::new(),
            args: String::new(),
            source: None,
        }
    }

    /// `Open`, carrying `args` verbatim (usually a handshake object).
    pub fn open(args: impl Into<String>) -> Self {
        Self {
            args: args.into(),
            ..Self::new(MessageKind::Open)
        }
    }

    pub fn close() -> Self {
        Self::new(MessageKind::Close)
    }

    pub fn ping() -> Self {
        Self::new(MessageKind::Ping)
    }

    pub fn pong() -> Self {
        Self::new(MessageKind::Pong)
    }

    pub fn empty() -> Self {
        Self::new(MessageKind::Empty)
    }

    /// `Emit` of `method` with `args` as the raw array body, e.g. `1,"a"`.
    pub fn emit(method: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: args.into(),
            ..Self::new(MessageKind::Emit)
        }
    }

    pub fn ack_request(
        ack_id: u64,
        method: impl Into<String>,
        args: impl Into<String>,
    ) -> Self {
        Self {
            ack_id: Some(ack_id),
            method: method.into(),
            args: args.into(),
            ..Self::new(MessageKind::AckRequest)
        }
    }

    /// `AckResponse` for `ack_id`. `args` is the interior of the array,
    /// without the surrounding brackets.
    pub fn ack_response(ack_id: u64, args: impl Into<String>) -> Self {
        Self {
            ack_id: Some(ack_id),
            args: args.into(),
            ..Self::new(MessageKind::AckResponse)
        }
    }

    /// Moves the message into `namespace` (which should start with `/`).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// `true` when the message lives in the default namespace.
    pub fn is_default_namespace(&self) -> bool {
        self.namespace.is_empty()
    }

    // -----------------------------------------------------------------------
    // Structured args
    // -----------------------------------------------------------------------

    /// `Emit` whose single argument is `value` serialized as JSON.
    pub fn emit_json<T: Serialize + ?Sized>(
        method: impl Into<String>,
        value: &T,
    ) -> Result<Self, ProtocolError> {
        let args = serde_json::to_string(value).map_err(ProtocolError::Json)?;
        Ok(Self::emit(method, args))
    }

    /// `AckResponse` whose single argument is `value` serialized as JSON.
    pub fn ack_response_json<T: Serialize + ?Sized>(
        ack_id: u64,
        value: &T,
    ) -> Result<Self, ProtocolError> {
        let args = serde_json::to_string(value).map_err(ProtocolError::Json)?;
        Ok(Self::ack_response(ack_id, args))
    }

    /// Parses `args` as JSON.
    ///
    /// For the event and ack kinds `args` is an array body, so it is
    /// wrapped in `[...]` first and `T` is typically a tuple or a `Vec`.
    /// For `Open` and `Close` it is parsed as-is.
    pub fn args_json<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        let parsed = match self.kind {
            MessageKind::Open | MessageKind::Close => {
                serde_json::from_str(&self.args)
            }
            _ => serde_json::from_str(&format!("[{}]", self.args)),
        };
        parsed.map_err(ProtocolError::Json)
    }
}
