//! # Bulletin
//!
//! Client for a bulletin-board API with persisted sessions and automatic
//! access-token refresh.
//!
//! Log in once and every board call carries the access token. When the
//! server rejects that token, the client exchanges the refresh token for a
//! new one and retries the call a single time. If that fails too, the
//! session is cleared and the [`Navigator`] is told to send the user back
//! to the login page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bulletin::prelude::*;
//!
//! # async fn run() -> Result<(), ClientError> {
//! let client = BulletinClient::builder()
//!     .config(ClientConfig::from_env()?)
//!     .build()?;
//!
//! client
//!     .login(&LoginRequest {
//!         username: "me@example.com".into(),
//!         password: "s3cret!pw".into(),
//!     })
//!     .await?;
//!
//! let page = client.list_boards(0, DEFAULT_PAGE_SIZE).await?;
//! for board in page.content {
//!     println!("{} {}", board.id, board.title);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod client;
mod config;
mod error;
mod gateway;
mod logging;
mod navigator;
mod routes;
pub mod validation;

pub use cache::CachePolicy;
pub use client::{BulletinClient, BulletinClientBuilder, DEFAULT_PAGE_SIZE};
pub use config::{
    ClientConfig, ENV_BASE_URL, ENV_STORAGE_DIR, ENV_STORAGE_KEY, ENV_TIMEOUT_SECS,
};
pub use error::{ClientError, FailureKind, Notice, NoticeLevel, RefreshError};
pub use gateway::{Gateway, PendingRequest, is_authorization_failure};
pub use logging::init_logging;
pub use navigator::{Navigator, NoopNavigator};
pub use routes::{GuardOutcome, HOME_ROUTE, LOGIN_ROUTE, RouteGuard};
pub use validation::ValidationError;

pub use bulletin_protocol as protocol;
pub use bulletin_session as session;
pub use bulletin_transport as transport;

/// Everything a typical caller needs.
pub mod prelude {
    pub use crate::{
        BulletinClient, BulletinClientBuilder, CachePolicy, ClientConfig, ClientError,
        DEFAULT_PAGE_SIZE, FailureKind, GuardOutcome, Navigator, NoopNavigator,
        Notice, NoticeLevel, RouteGuard, ValidationError, init_logging,
    };
    pub use bulletin_protocol::{
        Attachment, Board, BoardCategory, BoardDraft, BoardId, BoardPage,
        BoardSummary, Categories, LoginRequest, SignupRequest,
    };
    pub use bulletin_session::{Identity, Session, SessionStore};
}
