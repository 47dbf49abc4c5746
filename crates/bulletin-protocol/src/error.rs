//! Error types for the protocol layer.
//!
//! A `ProtocolError` means the bytes were fine at the transport level but
//! could not be turned into (or out of) the typed API messages.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing required fields,
    /// or wrong data types in a server response.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded but is unusable, e.g. a sign-in response
    /// without a refresh token.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
