//! Wire text → structured [`Message`].
//!
//! Decoding is a pipeline of small splitters. Each one consumes a prefix
//! of the text and hands the rest to the next:
//!
//! ```text
//! 42/chat,7["move",1,2]
//! ^^                      classify        → Emit (event class)
//!   ^^^^^^                split_namespace → "/chat"
//!          ^              split_ack_id    → 7, upgrades to AckRequest
//!           ^^^^^^^^^^^^  split_method_args → "move", "1,2"
//! ```
//!
//! The first failure aborts the whole frame.

use crate::{Message, MessageKind, ProtocolError};

/// Parses one frame.
///
/// # Errors
///
/// - [`ProtocolError::WrongMessageType`] for an empty frame or an unknown
///   prefix.
/// - [`ProtocolError::WrongPacket`] for a malformed body.
/// - [`ProtocolError::InvalidAckId`] when an `AckResponse` has non-numeric
///   digits in front of its body.
pub fn decode(data: &str) -> Result<Message, ProtocolError> {
    let result = decode_frame(data);
    match &result {
        Ok(msg) => tracing::trace!(kind = %msg.kind, "decoded frame"),
        Err(e) => tracing::debug!(
            error = %e,
            frame = %truncate(data, 64),
            "failed to decode frame"
        ),
    }
    result
}

fn decode_frame(data: &str) -> Result<Message, ProtocolError> {
    let (kind, rest) = classify(data)?;
    let (namespace, rest) = split_namespace(rest);

    let mut msg = Message {
        namespace: namespace.to_owned(),
        source: Some(data.to_owned()),
        ..Message::new(kind)
    };

    if kind.is_bodyless() {
        return Ok(msg);
    }

    if kind == MessageKind::Open {
        msg.args = rest.to_owned();
        return Ok(msg);
    }

    let body = match split_ack_id(rest) {
        Ok((ack_id, body)) => {
            msg.ack_id = Some(ack_id);
            if kind == MessageKind::Emit {
                msg.kind = MessageKind::AckRequest;
            }
            body
        }
        // The ack id is mandatory on an AckResponse.
        Err(e) if kind == MessageKind::AckResponse => return Err(e),
        // No ack id: a plain Emit. The body is re-sliced from the raw
        // frame, skipping only the two-character prefix, so any namespace
        // text is still in front of it.
        Err(_) => &data[MessageKind::Emit.prefix().len()..],
    };

    if msg.kind == MessageKind::AckResponse {
        msg.args = body
            .strip_prefix('[')
            .and_then(|b| b.strip_suffix(']'))
            .ok_or(ProtocolError::WrongPacket)?
            .to_owned();
        return Ok(msg);
    }

    let (method, args) = split_method_args(body)?;
    msg.method = method.to_owned();
    msg.args = args.to_owned();
    Ok(msg)
}

// ---------------------------------------------------------------------------
// Splitters
// ---------------------------------------------------------------------------

/// Reads the kind prefix.
///
/// Single-digit prefixes are complete on their own; a leading `4` needs a
/// second digit. The returned kind for `42` is always
/// [`MessageKind::Emit`].
pub(crate) fn classify(data: &str) -> Result<(MessageKind, &str), ProtocolError> {
    let width = match data.as_bytes().first() {
        None => return Err(ProtocolError::WrongMessageType),
        Some(b'4') => 2,
        Some(_) => 1,
    };
    // `get` also guards against slicing inside a multi-byte character.
    let prefix = data.get(..width).ok_or(ProtocolError::WrongMessageType)?;
    let kind =
        MessageKind::from_prefix(prefix).ok_or(ProtocolError::WrongMessageType)?;
    Ok((kind, &data[width..]))
}

/// Splits off a leading `/namespace`.
///
/// The namespace runs up to the first comma, which is consumed. Without
/// a comma the whole text is the namespace. Text that doesn't start with
/// `/` has no namespace and is returned unchanged.
pub(crate) fn split_namespace(text: &str) -> (&str, &str) {
    if !text.starts_with('/') {
        return ("", text);
    }
    match text.split_once(',') {
        Some((namespace, rest)) => (namespace, rest),
        None => (text, ""),
    }
}

/// Splits off the ack id in front of the `[` that opens the body.
///
/// The returned body still starts with `[`.
pub(crate) fn split_ack_id(text: &str) -> Result<(u64, &str), ProtocolError> {
    let pos = text.find('[').ok_or(ProtocolError::WrongPacket)?;
    let ack_id = text[..pos].parse::<u64>()?;
    Ok((ack_id, &text[pos..]))
}

/// Where [`split_method_args`] is while scanning `["method",args]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyState {
    /// Skipping up to the quote that opens the method name.
    AwaitOpenQuote,
    /// Inside the method name; `start` is its first byte.
    InMethod { start: usize },
    /// Just after the closing quote; only a comma may follow.
    AwaitComma,
    /// Past the comma; the args begin at `start` and run to the last byte.
    InArgs { start: usize },
}

/// Splits an event body into its method name and raw args.
///
/// The body must look like `["method",args]`. The closing `]` is dropped
/// from the args; the method is returned as written between the quotes,
/// without JSON unescaping.
pub(crate) fn split_method_args(body: &str) -> Result<(&str, &str), ProtocolError> {
    let mut state = BodyState::AwaitOpenQuote;
    let mut method = "";

    for (i, c) in body.char_indices() {
        state = match (state, c) {
            (BodyState::AwaitOpenQuote, '"') => {
                BodyState::InMethod { start: i + 1 }
            }
            (BodyState::AwaitOpenQuote, _) => state,
            (BodyState::InMethod { start }, '"') => {
                method = &body[start..i];
                BodyState::AwaitComma
            }
            (BodyState::InMethod { .. }, _) => state,
            (BodyState::AwaitComma, ',') => BodyState::InArgs { start: i + 1 },
            (BodyState::AwaitComma, _) => return Err(ProtocolError::WrongPacket),
            (BodyState::InArgs { .. }, _) => break,
        };
    }

    let BodyState::InArgs { start } = state else {
        return Err(ProtocolError::WrongPacket);
    };
    let args = body[start..]
        .strip_suffix(']')
        .ok_or(ProtocolError::WrongPacket)?;
    Ok((method, args))
}

/// Shortens a frame for log output without splitting a character.
fn truncate(data: &str, max: usize) -> &str {
    match data.char_indices().nth(max) {
        Some((i, _)) => &data[..i],
        None => data,
    }
}
