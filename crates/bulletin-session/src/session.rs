//! The session record: what the client knows about its login.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Identity;

/// The authentication state of the client.
///
/// Serialized with the same camelCase keys the stored record has always
/// used: `isAuthenticated`, `user`, `accessToken`, `refreshToken`.
///
/// Two shapes are valid:
///
/// ```text
///   empty          is_authenticated=false, everything else None
///   authenticated  is_authenticated=true,  both tokens Some, user optional
/// ```
///
/// `user` may be `None` while authenticated: that happens when a refreshed
/// access token could not be decoded.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<Identity>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    /// The logged-out session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an authenticated session from a token pair.
    ///
    /// An empty token counts as missing, so a pair with an empty half
    /// yields the empty session instead of a half-authenticated one.
    pub fn authenticated(
        access_token: String,
        refresh_token: String,
        user: Option<Identity>,
    ) -> Self {
        if access_token.is_empty() || refresh_token.is_empty() {
            return Self::empty();
        }
        Self {
            is_authenticated: true,
            user,
            access_token: Some(access_token),
            refresh_token: Some(refresh_token),
        }
    }

    /// Returns `true` if this record is one of the two valid shapes.
    ///
    /// An authenticated record needs two non-empty tokens; `""` is not a
    /// credential.
    pub fn is_consistent(&self) -> bool {
        let present = |t: &Option<String>| t.as_deref().is_some_and(|t| !t.is_empty());
        if self.is_authenticated {
            present(&self.access_token) && present(&self.refresh_token)
        } else {
            *self == Self::empty()
        }
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |t: &Option<String>| t.as_ref().map(|_| "<redacted>");
        f.debug_struct("Session")
            .field("is_authenticated", &self.is_authenticated)
            .field("user", &self.user)
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}
