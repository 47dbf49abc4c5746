//! Unified error type for the Bulletin client, and the mapping from
//! errors to what the user is told.

use std::fmt;

use bulletin_protocol::ProtocolError;
use bulletin_session::SessionError;
use bulletin_transport::TransportError;

use crate::validation::ValidationError;

/// Why a token refresh could not recover a request.
///
/// Any of these ends the session: the gateway has already logged out and
/// redirected to the login page by the time the caller sees one.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// There was no refresh token to exchange.
    #[error("no refresh token stored")]
    MissingRefreshToken,

    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected with status {status}")]
    Rejected { status: u16 },

    /// The refresh call got no response.
    #[error("refresh request failed: {0}")]
    Transport(#[source] TransportError),

    /// The refresh response could not be used.
    #[error("refresh response unusable: {0}")]
    Protocol(#[source] ProtocolError),
}

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A transport-level error (no response at all).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response arrived but could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (token carries no identity).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The form was rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server rejected the sign-in credentials.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The session could not be renewed and has been cleared.
    #[error("session expired: {0}")]
    Refresh(#[from] RefreshError),

    /// The request still got no response after a successful refresh, so
    /// the session was cleared. The transport error is kept as the source.
    #[error("session ended, retried request failed: {0}")]
    SessionEnded(#[source] TransportError),

    /// Client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// The categories failures are reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Bad form input; nothing was sent.
    Validation,
    /// Wrong username or password at sign-in.
    Credentials,
    /// The access token was rejected and could not be renewed.
    Authorization,
    /// 409, e.g. an e-mail that is already registered.
    Conflict,
    /// 404, e.g. a deleted post.
    NotFound,
    /// Everything else: transport failures, 5xx, undecodable responses.
    Generic,
}

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A message for the user, ready to be shown as a toast or banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl ClientError {
    /// Classifies this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::InvalidCredentials => FailureKind::Credentials,
            Self::Refresh(_) | Self::SessionEnded(_) => FailureKind::Authorization,
            Self::Status { status: 401, .. } => FailureKind::Authorization,
            Self::Status { status: 409, .. } => FailureKind::Conflict,
            Self::Status { status: 404, .. } => FailureKind::NotFound,
            _ => FailureKind::Generic,
        }
    }

    /// The notice a caller should show for this error.
    pub fn notice(&self) -> Notice {
        match self.kind() {
            FailureKind::Validation => Notice::warning(self.to_string()),
            FailureKind::Credentials => {
                Notice::error("Incorrect username or password.")
            }
            FailureKind::Authorization => {
                Notice::error("Your session has expired. Please log in again.")
            }
            FailureKind::Conflict => {
                Notice::error("This email address is already in use.")
            }
            FailureKind::NotFound => Notice::error("The post could not be found."),
            FailureKind::Generic => {
                Notice::error("Something went wrong. Please try again.")
            }
        }
    }
}
