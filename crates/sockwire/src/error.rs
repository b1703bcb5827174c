//! Unified error type for Sockwire.

use sockwire_protocol::ProtocolError;
use sockwire_transport::TransportError;

/// Top-level error that wraps the errors of each layer.
///
/// The `#[from]` attributes generate `From` impls, so `?` converts
/// layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SockwireError {
    /// A transport-level error (accept, send, recv, close, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error outside of frame receipt, e.g. encoding.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A received frame failed to decode and the connection was closed
    /// because of it.
    #[error("malformed frame {frame:?}: {source}")]
    MalformedFrame {
        frame: String,
        #[source]
        source: ProtocolError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::Shutdown;
        let wrapped: SockwireError = err.into();
        assert!(matches!(wrapped, SockwireError::Transport(_)));
        assert_eq!(wrapped.to_string(), "transport shut down");
    }

    #[test]
    fn test_from_protocol_error() {
        let wrapped: SockwireError = ProtocolError::WrongPacket.into();
        assert!(matches!(wrapped, SockwireError::Protocol(_)));
        assert_eq!(wrapped.to_string(), "wrong packet");
    }

    #[test]
    fn test_malformed_frame_display_includes_frame() {
        let err = SockwireError::MalformedFrame {
            frame: "9".into(),
            source: ProtocolError::WrongMessageType,
        };
        assert_eq!(err.to_string(), r#"malformed frame "9": wrong message type"#);
    }
}
