//! Wire protocol for the Bulletin API.
//!
//! This crate defines what the client and the board server exchange:
//!
//! - **Types** ([`LoginRequest`], [`AuthResponse`], [`Board`],
//!   [`BoardPage`], ...): the JSON messages of the auth and board
//!   endpoints.
//! - **Bodies** ([`json_body`], [`BoardDraft::to_form`]): how those
//!   messages become transport request bodies.
//! - **Paths** ([`paths`]): where each endpoint lives.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): bytes in, types out.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (HttpRequest/HttpResponse) → Protocol (typed messages) → Client
//! ```

mod body;
mod codec;
mod error;
mod types;

pub mod paths;

#[cfg(feature = "json")]
pub use body::json_body;
pub use body::{BOARD_FILE_PART, BOARD_REQUEST_PART};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Attachment, AuthResponse, Board, BoardCategory, BoardDraft, BoardFields,
    BoardId, BoardPage, BoardSummary, Categories, LoginRequest, Pageable,
    RefreshRequest, SignupRequest, SortState,
};
