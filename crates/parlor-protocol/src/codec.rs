//! Codec trait and the JSON implementation.
//!
//! A codec converts between message types and the text frames the
//! transport carries. The rest of the stack only sees the [`Codec`]
//! trait, so a binary format could be slotted in behind a feature flag
//! without touching the handler or the lobby.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes messages to text frames and decodes them back.
///
/// `Send + Sync + 'static` because the codec is shared across every
/// connection task for the life of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed,
    /// truncated, or doesn't match the expected shape.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that speaks JSON via `serde_json`.
///
/// JSON text frames are what the browser clients produce and the
/// easiest thing to inspect in DevTools, which is why they are the
/// default (and currently only) format.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
