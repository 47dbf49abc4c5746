//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A codec converts between Rust types and raw bytes. The client never
//! calls `serde_json` directly; it asks a [`Codec`] so the wire format
//! stays in one place.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `decode` uses `DeserializeOwned` because response buffers are dropped
/// right after decoding; the result must own all of its data.
pub trait Codec: Send + Sync + 'static {
    /// The MIME type of the bytes this codec produces.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`), the only format the
/// board API speaks.
///
/// ## Example
///
/// ```rust
/// use bulletin_protocol::{AuthResponse, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let resp: AuthResponse = codec
///     .decode(br#"{"accessToken":"T2"}"#)
///     .unwrap();
///
/// assert_eq!(resp.access_token, "T2");
/// assert_eq!(resp.refresh_token, None);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Categories, SignupRequest};

    #[test]
    fn test_encode_uses_camel_case_field_names() {
        let bytes = JsonCodec
            .encode(&SignupRequest {
                username: "u@x.com".into(),
                name: "U".into(),
                password: "abcd123!".into(),
                confirm_password: "abcd123!".into(),
            })
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["username"], "u@x.com");
        assert_eq!(value["confirmPassword"], "abcd123!");
        assert!(value.get("confirm_password").is_none());
    }

    #[test]
    fn test_decode_malformed_returns_decode_error() {
        let result: Result<Categories, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_shape_returns_decode_error() {
        let result: Result<crate::AuthResponse, _> =
            JsonCodec.decode(br#"{"token":"x"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
