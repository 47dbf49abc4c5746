//! Message types for the auth and board endpoints.
//!
//! Field names follow the server's JSON (`camelCase`), which serde maps
//! onto snake_case Rust fields via `rename_all`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Auth messages
// ---------------------------------------------------------------------------

/// Body of `POST /auth/signup`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// The account e-mail address; also the login name.
    pub username: String,
    /// Display name.
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body of `POST /auth/signin`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Passwords never reach logs through `{:?}`.
impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by sign-in and refresh.
///
/// Sign-in always includes both tokens. Refresh may omit `refreshToken`
/// when the server does not rotate it; the caller then keeps the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Board identity and category
// ---------------------------------------------------------------------------

/// Server-assigned identifier of a board post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The category a post is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardCategory {
    Notice,
    Free,
    Qna,
    Etc,
}

impl BoardCategory {
    pub const ALL: [BoardCategory; 4] =
        [Self::Notice, Self::Free, Self::Qna, Self::Etc];

    /// The wire name (`NOTICE`, `FREE`, `QNA`, `ETC`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "NOTICE",
            Self::Free => "FREE",
            Self::Qna => "QNA",
            Self::Etc => "ETC",
        }
    }
}

impl fmt::Display for BoardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardCategory {
    type Err = ProtocolError;

    /// Parses a wire name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ProtocolError::InvalidMessage(format!("unknown category: {s}"))
            })
    }
}

/// `GET /boards/categories`: category key → display label.
pub type Categories = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Board responses
// ---------------------------------------------------------------------------

/// A full post, as returned by `GET /boards/{id}` and by create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub content: String,
    pub board_category: BoardCategory,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: String,
}

/// One row of the paginated list. Note the list uses `category`, not
/// `boardCategory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: BoardId,
    pub title: String,
    pub category: BoardCategory,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub unsorted: bool,
    pub sorted: bool,
    pub empty: bool,
}

/// Page position echoed back by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pageable {
    pub page_number: u32,
    pub page_size: u32,
    pub offset: u64,
    pub unpaged: bool,
    pub paged: bool,
    pub sort: SortState,
}

/// `GET /boards?page=&size=`: one page of posts plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPage {
    pub content: Vec<BoardSummary>,
    #[serde(default)]
    pub pageable: Pageable,
    pub total_pages: u32,
    pub total_elements: u64,
    pub last: bool,
    pub first: bool,
    pub number_of_elements: u32,
    pub size: u32,
    pub number: u32,
    pub empty: bool,
    #[serde(default)]
    pub sort: SortState,
}

// ---------------------------------------------------------------------------
// Board input
// ---------------------------------------------------------------------------

/// A file uploaded alongside a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// The JSON `request` part of a create/update form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFields {
    pub title: String,
    pub content: String,
    pub category: BoardCategory,
}

/// Input for creating or updating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDraft {
    pub title: String,
    pub content: String,
    pub category: BoardCategory,
    pub attachment: Option<Attachment>,
}

impl BoardDraft {
    /// A draft without an attachment.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: BoardCategory,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// The fields that go into the JSON part.
    pub fn fields(&self) -> BoardFields {
        BoardFields {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category,
        }
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_serializes_confirm_password_in_camel_case() {
        let req = SignupRequest {
            username: "a@b.com".into(),
            name: "A".into(),
            password: "secret1!".into(),
            confirm_password: "secret1!".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["confirmPassword"], "secret1!");
        assert!(value.get("confirm_password").is_none());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let req = LoginRequest {
            username: "a@b.com".into(),
            password: "hunter2".into(),
        };
        let printed = format!("{req:?}");
        assert!(printed.contains("a@b.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_refresh_request_uses_refresh_token_key() {
        let value = serde_json::to_value(RefreshRequest {
            refresh_token: "R1".into(),
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "refreshToken": "R1" }));
    }

    #[test]
    fn test_auth_response_without_rotated_refresh_token() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"accessToken":"T2"}"#).unwrap();
        assert_eq!(resp.access_token, "T2");
        assert!(resp.refresh_token.is_none());
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_value(BoardCategory::Qna).unwrap(),
            serde_json::json!("QNA")
        );
        let parsed: BoardCategory = serde_json::from_str(r#""NOTICE""#).unwrap();
        assert_eq!(parsed, BoardCategory::Notice);
    }

    #[test]
    fn test_category_from_str_ignores_case() {
        assert_eq!("free".parse::<BoardCategory>().unwrap(), BoardCategory::Free);
        assert!(matches!(
            "misc".parse::<BoardCategory>(),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_board_detail_decodes_optional_image() {
        let board: Board = serde_json::from_str(
            r#"{"id":7,"title":"hi","content":"body","boardCategory":"FREE","createdAt":"2024-05-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(board.id, BoardId(7));
        assert_eq!(board.board_category, BoardCategory::Free);
        assert!(board.image_url.is_none());
    }

    #[test]
    fn test_board_page_decodes_server_response() {
        let json = r#"{
            "content": [
                {"id": 2, "title": "second", "category": "QNA", "createdAt": "2024-05-02T09:00:00"},
                {"id": 1, "title": "first", "category": "NOTICE", "createdAt": "2024-05-01T09:00:00"}
            ],
            "pageable": {
                "pageNumber": 0, "pageSize": 10, "offset": 0,
                "unpaged": false, "paged": true,
                "sort": {"unsorted": true, "sorted": false, "empty": true}
            },
            "totalPages": 1, "totalElements": 2, "last": true, "first": true,
            "numberOfElements": 2, "size": 10, "number": 0, "empty": false,
            "sort": {"unsorted": true, "sorted": false, "empty": true}
        }"#;
        let page: BoardPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].category, BoardCategory::Qna);
        assert_eq!(page.pageable.page_size, 10);
        assert!(page.sort.unsorted);
        assert_eq!(page.total_elements, 2);
    }

    #[test]
    fn test_board_draft_fields_drop_attachment() {
        let draft = BoardDraft::new("t", "c", BoardCategory::Etc).with_attachment(
            Attachment {
                file_name: "a.txt".into(),
                content_type: "text/plain".into(),
                data: b"x".to_vec(),
            },
        );
        let value = serde_json::to_value(draft.fields()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"title": "t", "content": "c", "category": "ETC"})
        );
    }
}
