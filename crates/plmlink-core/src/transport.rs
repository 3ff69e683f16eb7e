//! HTTP transport seam.
//!
//! The connector talks to the backend through the [`Transport`] trait so
//! that tests can substitute a scripted backend (see [`crate::mock`]).
//! [`HttpTransport`] is the production implementation over `reqwest`.
//!
//! Every request carries an explicit total timeout; the client adds a
//! connect timeout on top. There is no cancellation beyond these timeouts:
//! a request completes, times out, or errors.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Connect timeout applied to every outbound request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
/// Total timeout for token requests.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(30);
/// Total timeout for catalog search requests.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);
/// Total timeout for data fetch requests.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Transport-level failures, before they are given connector context.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The HTTP client could not be built.
    #[error("HTTP client initialization failed: {0}")]
    Init(String),

    /// The endpoint could not be reached (DNS, TCP, TLS, or timeout).
    #[error("{url} not reachable: {message}")]
    Unreachable {
        /// The request URL.
        url: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The response status code.
        status: u16,
        /// The request URL.
        url: String,
    },
}

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Blocking-free HTTP operations the connector needs from a backend.
///
/// One method per request shape the backend uses: an empty-body POST for
/// token minting, a text GET for JSON documents, and a raw-bytes GET for
/// event batches.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST with an empty body; returns the response body on success.
    async fn post(&self, url: &str, timeout: Duration) -> TransportResult<String>;

    /// GET returning the response body on success.
    async fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> TransportResult<String>;

    /// GET returning the raw response bytes on success.
    async fn get_bytes(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> TransportResult<Bytes>;
}

/// Production transport over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with the standard connect timeout.
    pub fn new() -> TransportResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Init(e.to_string()))?;
        Ok(Self { client })
    }

    /// Build a transport around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> TransportResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, timeout: Duration) -> TransportResult<String> {
        let request = self
            .client
            .post(url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json");
        let response = self.send(request, url).await?;
        response
            .text()
            .await
            .map_err(|e| TransportError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> TransportResult<String> {
        let mut request = self
            .client
            .get(url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = self.send(request, url).await?;
        response
            .text()
            .await
            .map_err(|e| TransportError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn get_bytes(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> TransportResult<Bytes> {
        let mut request = self
            .client
            .get(url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = self.send(request, url).await?;
        response
            .bytes()
            .await
            .map_err(|e| TransportError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status {
            status: 503,
            url: "https://plm.example/api/bkd/aggr".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from https://plm.example/api/bkd/aggr");

        let err = TransportError::Unreachable {
            url: "https://plm.example".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("not reachable"));
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new().is_ok());
    }
}
