//! Endpoint paths of the board API, relative to the base URL.

use crate::BoardId;

pub const SIGNUP: &str = "/auth/signup";
pub const SIGNIN: &str = "/auth/signin";
pub const REFRESH: &str = "/auth/refresh";
pub const BOARDS: &str = "/boards";
pub const CATEGORIES: &str = "/boards/categories";

/// `/boards/{id}`
pub fn board(id: BoardId) -> String {
    format!("{BOARDS}/{id}")
}
