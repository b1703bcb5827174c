//! Structured [`Message`] → wire text.

use crate::{Message, MessageKind, ProtocolError};

/// Builds the frame text for `msg`.
///
/// Fields are appended in wire order. A namespace is only followed by a
/// comma when another field comes after it, so the separator is tracked
/// as "owed" and written lazily.
///
/// `args` is concatenated byte for byte; nothing here checks that it is
/// valid JSON.
///
/// # Errors
///
/// Returns [`ProtocolError::Json`] if the method name cannot be quoted.
/// Nothing is returned on failure, never a partial frame.
pub fn encode(msg: &Message) -> Result<String, ProtocolError> {
    let kind = msg.kind;
    let mut out = Frame::new(kind.prefix());

    if !msg.namespace.is_empty() {
        out.push(&msg.namespace);
        out.owe_comma();
    }

    if matches!(kind, MessageKind::Empty | MessageKind::Ping | MessageKind::Pong) {
        return Ok(out.finish());
    }

    if kind.has_ack_id() {
        // An ack kind without an id still gets a number on the wire.
        out.push_field(&msg.ack_id.unwrap_or_default().to_string());
    }

    match kind {
        MessageKind::Open | MessageKind::Close => {
            out.push_field(&msg.args);
        }
        MessageKind::AckResponse => {
            out.push_field("[");
            out.push(&msg.args);
            out.push("]");
        }
        _ => {
            let method = serde_json::to_string(&msg.method)
                .map_err(ProtocolError::Json)?;
            out.push_field("[");
            out.push(&method);
            out.push(",");
            out.push(&msg.args);
            out.push("]");
        }
    }

    let frame = out.finish();
    tracing::trace!(%kind, len = frame.len(), "encoded frame");
    Ok(frame)
}

/// Like [`encode`], but panics on failure.
///
/// Only for callers whose own invariants make failure unreachable, such
/// as messages built from constants.
///
/// # Panics
///
/// Panics if [`encode`] returns an error.
pub fn must_encode(msg: &Message) -> String {
    match encode(msg) {
        Ok(frame) => frame,
        Err(e) => panic!("failed to encode {} message: {e}", msg.kind),
    }
}

/// Output buffer that remembers whether a separator is owed.
struct Frame {
    buf: String,
    comma: bool,
}

impl Frame {
    fn new(prefix: &str) -> Self {
        Self {
            buf: prefix.to_owned(),
            comma: false,
        }
    }

    fn owe_comma(&mut self) {
        self.comma = true;
    }

    fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Starts a new field, paying any owed comma first.
    fn push_field(&mut self, text: &str) {
        if std::mem::take(&mut self.comma) {
            self.buf.push(',');
        }
        self.buf.push_str(text);
    }

    fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(msg: Message) -> String {
        encode(&msg).unwrap()
    }

    #[test]
    fn test_encode_emit() {
        assert_eq!(enc(Message::emit("foo", "[1,2]")), r#"42["foo",[1,2]]"#);
    }

    #[test]
    fn test_encode_emit_with_namespace() {
        let msg = Message::emit("foo", "1").with_namespace("/chat");
        assert_eq!(enc(msg), r#"42/chat,["foo",1]"#);
    }

    #[test]
    fn test_encode_emit_quotes_method_as_json() {
        let msg = Message::emit("say \"hi\"", "1");
        assert_eq!(enc(msg), r#"42["say \"hi\"",1]"#);
    }

    #[test]
    fn test_encode_ack_request() {
        let msg = Message::ack_request(12, "get", r#""id""#);
        assert_eq!(enc(msg), r#"4212["get","id"]"#);

        let msg = Message::ack_request(3, "get", "1").with_namespace("/a");
        assert_eq!(enc(msg), r#"42/a,3["get",1]"#);
    }

    #[test]
    fn test_encode_ack_response() {
        assert_eq!(enc(Message::ack_response(1, r#""bar""#)), r#"431["bar"]"#);

        let msg = Message::ack_response(7, "").with_namespace("/a");
        assert_eq!(enc(msg), "43/a,7[]");
    }

    #[test]
    fn test_encode_ack_without_id_writes_zero() {
        let mut msg = Message::ack_response(1, "true");
        msg.ack_id = None;
        assert_eq!(enc(msg), "430[true]");
    }

    #[test]
    fn test_encode_open_args_verbatim() {
        assert_eq!(enc(Message::open(r#"{"sid":"x"}"#)), r#"0{"sid":"x"}"#);
        let msg = Message::open("{}").with_namespace("/chat");
        assert_eq!(enc(msg), "0/chat,{}");
    }

    #[test]
    fn test_encode_close() {
        assert_eq!(enc(Message::close()), "1");
        // Close with a namespace and no args still pays the owed comma.
        assert_eq!(enc(Message::close().with_namespace("/chat")), "1/chat,");
    }

    #[test]
    fn test_encode_bodyless_kinds_ignore_other_fields() {
        let mut msg = Message::ping();
        msg.method = "ignored".into();
        msg.args = "ignored".into();
        msg.ack_id = Some(5);
        assert_eq!(enc(msg), "2");

        assert_eq!(enc(Message::pong().with_namespace("/n")), "3/n");
        assert_eq!(enc(Message::empty()), "40");
        assert_eq!(enc(Message::empty().with_namespace("/n")), "40/n");
    }

    #[test]
    fn test_encode_emit_ignores_ack_id() {
        let mut msg = Message::emit("foo", "1");
        msg.ack_id = Some(99);
        assert_eq!(enc(msg), r#"42["foo",1]"#);
    }

    #[test]
    fn test_must_encode() {
        assert_eq!(must_encode(&Message::ping()), "2");
    }
}
