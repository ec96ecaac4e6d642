//! reqwest-backed transport.
//!
//! # Responsibilities
//! - Join path segments onto the base URL (percent-encoded)
//! - Attach a fresh `x-request-id` to every request
//! - Turn non-2xx statuses into `TransportError::Status`

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::observability::metrics;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, TransportError};

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Production transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport with a default client.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self::with_client(Client::new(), parse_base_url(base_url)?))
    }

    /// Create a transport from API configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, parse_base_url(&config.base_url)?))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::InvalidUrl(format!("'{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(request.path.iter());
        Ok(url)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, TransportError> {
    base_url
        .parse()
        .map_err(|e| TransportError::InvalidUrl(format!("'{}': {}", base_url, e)))
}

/// Error for a response whose body could not be read. Non-2xx keeps its status.
fn body_read_failure(status: StatusCode, reason: String) -> TransportError {
    if status.is_success() {
        TransportError::Network(reason)
    } else {
        TransportError::Status {
            status: status.as_u16(),
            body: String::new(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint(&request)?;
        let request_id = Uuid::new_v4();
        let method = request.method.clone();

        let mut builder = self
            .client
            .request(method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(
            %request_id,
            method = %method,
            path = %request.path_string(),
            "Sending request"
        );

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                metrics::record_request(method.as_str(), 0);
                tracing::warn!(%request_id, error = %e, "Request failed before a response");
                return Err(TransportError::Network(e.to_string()));
            }
        };

        let status = resp.status();
        metrics::record_request(method.as_str(), status.as_u16());

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%request_id, status = status.as_u16(), error = %e, "Failed to read response body");
                return Err(body_read_failure(status, e.to_string()));
            }
        };

        tracing::debug!(%request_id, status = status.as_u16(), "Response received");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let transport = ReqwestTransport::new("http://localhost:49832").unwrap();
        let req = ApiRequest::get(["builds", "42"]);
        assert_eq!(
            transport.endpoint(&req).unwrap().as_str(),
            "http://localhost:49832/builds/42"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let transport = ReqwestTransport::new("https://example.org/api/").unwrap();
        let req = ApiRequest::get(["builders", "update-socials"]);
        assert_eq!(
            transport.endpoint(&req).unwrap().as_str(),
            "https://example.org/api/builders/update-socials"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let transport = ReqwestTransport::new("http://localhost").unwrap();
        let req = ApiRequest::get(["builds", "a/b c"]);
        assert_eq!(
            transport.endpoint(&req).unwrap().as_str(),
            "http://localhost/builds/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ReqwestTransport::new("not a url").unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }

    #[test]
    fn test_cannot_be_base_url() {
        let transport = ReqwestTransport::new("mailto:ops@example.org").unwrap();
        let err = transport.endpoint(&ApiRequest::get(["builds"])).unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }

    #[test]
    fn test_body_read_failure_keeps_error_status() {
        let err = body_read_failure(StatusCode::UNAUTHORIZED, "connection reset".into());
        assert!(err.is_unauthorized());
        assert_eq!(
            err,
            TransportError::Status {
                status: 401,
                body: String::new()
            }
        );

        let err = body_read_failure(StatusCode::OK, "connection reset".into());
        assert_eq!(err, TransportError::Network("connection reset".into()));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let transport = ReqwestTransport::new("http://127.0.0.1:1").unwrap();
        let err = transport.send(ApiRequest::get(["events"])).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
