//! Reading the user identity out of an access token.
//!
//! An access token is `header.payload.signature`, each segment base64url.
//! We only look at the payload, and only at three claims:
//!
//! | Claim      | Used for                                   |
//! |------------|--------------------------------------------|
//! | `sub`      | `username`, and `name` if `name` is absent |
//! | `username` | `username` when `sub` is absent            |
//! | `name`     | `name`                                     |
//!
//! The signature is never checked. That would need the server's signing
//! key, which a client must not hold.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// The user a session belongs to, as claimed by the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The subject claim (the account e-mail).
    pub username: String,
    /// Display name; equals `username` when the token carries no name.
    pub name: String,
}

#[derive(Deserialize)]
struct Claims {
    sub: Option<String>,
    username: Option<String>,
    name: Option<String>,
}

/// Decodes the identity from an access token, or returns `None`.
///
/// Total: any malformed input (wrong segment count, bad base64, bad UTF-8,
/// non-JSON payload, no subject) yields `None` and a `warn` log line.
pub fn decode_token(token: &str) -> Option<Identity> {
    match parse_token(token) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::warn!(error = %e, "token decode failed");
            None
        }
    }
}

/// Like [`decode_token`], but reports why decoding failed.
pub fn parse_token(token: &str) -> Result<Identity, SessionError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(SessionError::MalformedToken(
            "expected three dot-separated segments".into(),
        ));
    };

    // Padding is optional in JWTs; accept both forms.
    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('='))
        .map_err(|e| {
            SessionError::MalformedToken(format!("payload is not base64url: {e}"))
        })?;

    let claims: Claims = serde_json::from_slice(&bytes).map_err(|e| {
        SessionError::MalformedToken(format!("payload is not a claims object: {e}"))
    })?;

    let present = |claim: Option<String>| claim.filter(|v| !v.is_empty());
    let sub = present(claims.sub);
    let username = sub
        .clone()
        .or_else(|| present(claims.username))
        .ok_or_else(|| {
            SessionError::MalformedToken("payload has no subject".into())
        })?;
    let name = present(claims.name)
        .or(sub)
        .unwrap_or_else(|| username.clone());

    Ok(Identity { username, name })
}
