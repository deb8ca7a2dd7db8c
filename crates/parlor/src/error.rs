//! Unified error type for the Parlor server.

use parlor_protocol::ProtocolError;
use parlor_transport::TransportError;

/// Top-level error wrapping the crate-specific errors that can end a
/// connection or prevent the server from starting.
///
/// Lobby and game rejections never appear here — they are answered to
/// the offending client as `error` messages and the connection lives on.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let wrapped: ParlorError = err.into();
        assert!(matches!(wrapped, ParlorError::Transport(_)));
        assert!(wrapped.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let wrapped: ParlorError = err.into();
        assert!(matches!(wrapped, ParlorError::Protocol(_)));
    }
}
