/// Errors that can occur in the transport layer.
///
/// A transport error always means "no usable HTTP response". A response
/// with a failing status code (401, 404, 500...) is NOT a transport error;
/// it comes back as an ordinary [`HttpResponse`](crate::HttpResponse) and
/// the layers above decide what it means.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (connection refused, reset,
    /// DNS failure, timeout). The real status, if any, is unknown.
    #[error("network error: {0}")]
    Network(String),

    /// The configured base URL plus the request path is not a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The request could not be built (bad header, bad content type).
    #[error("request failed: {0}")]
    Request(String),

    /// A response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    /// Returns `true` for failures where no response object exists at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
