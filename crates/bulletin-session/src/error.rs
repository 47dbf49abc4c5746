//! Error types for the session layer.

/// Errors that can occur while decoding tokens or persisting the session.
///
/// None of these ever escape a session mutation: the store logs them and
/// carries on. They surface only from the lower-level helpers
/// ([`SessionStorage`](crate::SessionStorage), token parsing).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The access token is not a three-segment token with a base64url
    /// JSON payload carrying a subject.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Reading or writing durable storage failed.
    #[error("session storage failed: {0}")]
    Storage(#[source] std::io::Error),

    /// The stored record is not a valid serialized session.
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}
