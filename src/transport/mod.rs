//! HTTP transport abstraction.
//!
//! # Data Flow
//! ```text
//! api clients build an ApiRequest (method, path segments, query, headers, JSON body)
//!     → HttpTransport::send
//!     → 2xx: ApiResponse { status, body }
//!     → anything else: TransportError (Status / Network / InvalidUrl / Decode)
//! ```
//!
//! # Design Decisions
//! - Non-2xx statuses are errors at this layer, so callers classify on
//!   `TransportError::status()` instead of poking at library error types
//! - No retries, no timeouts: one `send` is one network exchange

pub mod http;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

pub use http::ReqwestTransport;

/// Failure of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request URL could not be built from the base URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// Connection, TLS or I/O failure before a status was received.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body did not have the expected shape.
    #[error("could not decode response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// One outbound request, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments appended to the base URL (unencoded).
    pub path: Vec<String>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            path: path.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// "/a/b" form of the path, for logs.
    pub fn path_string(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Performs a single HTTP exchange against the configured backend.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::get(["builds"])
            .query("featured", true)
            .header("Address", "0xabc");

        assert_eq!(req.path_string(), "/builds");
        assert_eq!(req.query_value("featured"), Some("true"));
        assert_eq!(req.query_value("missing"), None);
        assert_eq!(req.header_value("address"), Some("0xabc"));
        assert!(req.body.is_none());
    }

    #[test]
    fn test_status_helpers() {
        let err = TransportError::Status {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));

        let err = TransportError::Network("connection refused".into());
        assert!(!err.is_unauthorized());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_response_json_decode_error() {
        let resp = ApiResponse::new(200, "not json");
        let err = resp.json::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}
