//! Authentication session management for Bulletin.
//!
//! This crate owns the client's login state:
//!
//! 1. **Identity**: who the user is, read out of the access token's
//!    payload ([`decode_token`]). Signatures are never verified: the
//!    identity is for display, and the server remains the trust boundary.
//! 2. **Session store**: the single source of truth for tokens and
//!    identity ([`SessionStore`]), shared by explicit handle.
//! 3. **Persistence**: every mutation is written through a
//!    [`SessionStorage`] backend and rehydrated at startup.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client / Gateway (above)  ← reads tokens, calls login/logout/set_tokens
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Durable storage (below)  ← FileStorage, MemoryStorage
//! ```

mod error;
mod identity;
mod session;
mod storage;
mod store;

pub use error::SessionError;
pub use identity::{Identity, decode_token, parse_token};
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{DEFAULT_STORAGE_KEY, SessionStore};
