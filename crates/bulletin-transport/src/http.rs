//! HTTP transport implementation using `reqwest`.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use crate::{
    Body, FormPart, HttpRequest, HttpResponse, HttpTransport, Method,
    TransportError,
};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A `reqwest`-backed [`HttpTransport`] bound to one API base URL.
///
/// Cloning is cheap: `reqwest::Client` is a handle to a shared pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base: String,
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport for the given base URL with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a transport for the given base URL and request timeout.
    ///
    /// The base URL may carry a path prefix (`https://host/api`); request
    /// paths are appended to it rather than resolved against it.
    pub fn with_timeout(
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        tracing::debug!(base_url, "HTTP transport ready");
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        };
        Url::parse(&joined)
            .map_err(|e| TransportError::InvalidUrl(format!("{joined}: {e}")))
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(bytes) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            Body::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_vec();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            "HTTP response received"
        );
        Ok(HttpResponse { status, body })
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for part in parts {
        let mut p = Part::bytes(part.data.clone())
            .mime_str(&part.content_type)
            .map_err(|e| TransportError::Request(e.to_string()))?;
        if let Some(file_name) = &part.file_name {
            p = p.file_name(file_name.clone());
        }
        form = form.part(part.name.clone(), p);
    }
    Ok(form)
}

/// Builder errors are our fault; everything else means the request went
/// out (or tried to) and no response came back.
fn classify(e: reqwest::Error) -> TransportError {
    if e.is_builder() {
        TransportError::Request(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = ReqwestTransport::new("not a url");
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_for_keeps_base_path_prefix() {
        let t = ReqwestTransport::new("http://localhost:8080/api/").unwrap();
        let url = t.url_for("/boards/3").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/boards/3");
    }

    #[test]
    fn test_url_for_accepts_relative_path() {
        let t = ReqwestTransport::new("http://localhost:8080").unwrap();
        let url = t.url_for("auth/signin").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/auth/signin");
    }
}
