//! Codec trait for swapping the frame format behind higher layers.
//!
//! Connection code only needs "message in, text out" and the reverse.
//! It takes any [`FrameCodec`], so a different text grammar can be
//! plugged in without touching the connection layer.

use crate::{decode, encode, Message, ProtocolError};

/// Converts between [`Message`] and one frame of wire text.
///
/// `Send + Sync + 'static` because a codec is shared by every task that
/// handles a connection.
pub trait FrameCodec: Send + Sync + 'static {
    /// Builds the frame text for `msg`.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the message cannot be written.
    fn encode(&self, msg: &Message) -> Result<String, ProtocolError>;

    /// Parses one frame.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the frame is malformed.
    fn decode(&self, frame: &str) -> Result<Message, ProtocolError>;
}

// ---------------------------------------------------------------------------
// TextCodec
// ---------------------------------------------------------------------------

/// The `42["event",...]` text grammar implemented by [`encode`] and
/// [`decode`].
///
/// ## Example
///
/// ```rust
/// use sockwire_protocol::{FrameCodec, Message, MessageKind, TextCodec};
///
/// let codec = TextCodec;
///
/// let frame = codec.encode(&Message::emit("move", "1,2")).unwrap();
/// assert_eq!(frame, r#"42["move",1,2]"#);
///
/// let msg = codec.decode(&frame).unwrap();
/// assert_eq!(msg.kind, MessageKind::Emit);
/// assert_eq!(msg.method, "move");
/// assert_eq!(msg.args, "1,2");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl FrameCodec for TextCodec {
    fn encode(&self, msg: &Message) -> Result<String, ProtocolError> {
        encode(msg)
    }

    fn decode(&self, frame: &str) -> Result<Message, ProtocolError> {
        decode(frame)
    }
}
