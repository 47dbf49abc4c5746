//! HTTP transport abstraction layer for Bulletin.
//!
//! Provides the [`HttpTransport`] trait plus the plain request/response
//! values that travel through it. Everything above this crate (auth calls,
//! board calls, the refresh gateway) talks to the remote API only through
//! this trait, so tests can swap the real client for a scripted one.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): HTTP transport via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "reqwest")]
mod http;

pub use error::TransportError;
#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;

use std::fmt;
use std::sync::Arc;

/// Name of the header that carries the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// The HTTP methods the board API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// The form field name (`request`, `file`, ...).
    pub name: String,
    /// Set for file uploads; the server sees it as the original file name.
    pub file_name: Option<String>,
    /// MIME type of `data`.
    pub content_type: String,
    pub data: Vec<u8>,
}

/// The body of an outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Already-encoded JSON bytes. Sent with `Content-Type: application/json`.
    Json(Vec<u8>),
    /// A `multipart/form-data` body. The boundary is chosen by the transport.
    Multipart(Vec<FormPart>),
}

/// A transport-agnostic outbound HTTP request.
///
/// `path` is relative to the transport's base URL (e.g. `/boards/7`).
/// Requests are plain values: cloning one and re-sending it is how the
/// gateway retries after a token refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl HttpRequest {
    /// Creates a request with no query, headers, or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a query parameter.
    pub fn with_query(
        mut self,
        name: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Sets a header, replacing any existing header with the same name.
    ///
    /// Header names are compared case-insensitively, as HTTP requires.
    pub fn set_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Returns the value of a header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Attaches `Authorization: Bearer <token>`.
    pub fn set_bearer(&mut self, token: &str) {
        self.set_header(AUTHORIZATION, format!("Bearer {token}"));
    }

    /// Returns the bearer token currently attached, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header(AUTHORIZATION)?.strip_prefix("Bearer ")
    }
}

/// A received HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests to the remote API and returns whatever comes back.
///
/// Implementations must NOT interpret status codes: a 401 is returned as
/// `Ok(HttpResponse { status: 401, .. })`. Only failures with no response
/// at all become `Err`.
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends one request and waits for the full response.
    async fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    async fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut req = HttpRequest::get("/boards");
        req.set_header("authorization", "Bearer old");
        req.set_header("Authorization", "Bearer new");

        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("AUTHORIZATION"), Some("Bearer new"));
    }

    #[test]
    fn test_bearer_token_round_trips_through_header() {
        let mut req = HttpRequest::get("/boards");
        assert_eq!(req.bearer_token(), None);

        req.set_bearer("T1");

        assert_eq!(req.header(AUTHORIZATION), Some("Bearer T1"));
        assert_eq!(req.bearer_token(), Some("T1"));
    }

    #[test]
    fn test_bearer_token_ignores_other_schemes() {
        let mut req = HttpRequest::get("/boards");
        req.set_header(AUTHORIZATION, "Basic dTpw");
        assert_eq!(req.bearer_token(), None);
    }

    #[test]
    fn test_with_query_keeps_order() {
        let req = HttpRequest::get("/boards")
            .with_query("page", 0)
            .with_query("size", 10);
        assert_eq!(
            req.query,
            vec![
                ("page".to_string(), "0".to_string()),
                ("size".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_response_is_success_covers_2xx_only() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(401, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn test_network_error_classification() {
        assert!(TransportError::Network("refused".into()).is_network());
        assert!(!TransportError::Body("eof".into()).is_network());
        assert!(!TransportError::InvalidUrl("x".into()).is_network());
    }
}
