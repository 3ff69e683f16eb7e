//! Mock transport for testing.
//!
//! [`MockTransport`] serves scripted responses in FIFO order and records
//! every request it sees, so tests can drive the whole connector without a
//! live backend and assert on the exact URLs, methods, and bearer tokens
//! that went over the wire.
//!
//! The mock is a cheap handle over shared state: clone it, hand one clone
//! to the connector, and keep the other to inspect recorded requests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::transport::{Transport, TransportError, TransportResult};

/// One request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// `"POST"` or `"GET"`.
    pub method: &'static str,
    /// The full request URL.
    pub url: String,
    /// The bearer token, when one was attached.
    pub bearer: Option<String>,
}

enum Scripted {
    Body(String),
    Error(TransportError),
}

#[derive(Default)]
struct Inner {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A scripted stand-in for [`crate::HttpTransport`].
#[derive(Default, Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

impl MockTransport {
    /// Create an empty mock. Script responses with [`push_body`] and
    /// [`push_error`] before use.
    ///
    /// [`push_body`]: MockTransport::push_body
    /// [`push_error`]: MockTransport::push_error
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn push_body(&self, body: impl Into<String>) {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(Scripted::Body(body.into()));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(Scripted::Error(error));
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// Number of responses still queued.
    pub fn remaining(&self) -> usize {
        self.inner.responses.lock().unwrap().len()
    }

    fn record(&self, method: &'static str, url: &str, bearer: Option<&str>) {
        self.inner.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            bearer: bearer.map(str::to_string),
        });
    }

    fn next_response(&self, url: &str) -> TransportResult<String> {
        match self.inner.responses.lock().unwrap().pop_front() {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::Error(error)) => Err(error),
            None => Err(TransportError::Unreachable {
                url: url.to_string(),
                message: "mock transport has no scripted response".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("remaining", &self.remaining())
            .field("requests", &self.inner.requests.lock().unwrap().len())
            .finish()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, url: &str, _timeout: Duration) -> TransportResult<String> {
        self.record("POST", url, None);
        self.next_response(url)
    }

    async fn get(
        &self,
        url: &str,
        bearer: Option<&str>,
        _timeout: Duration,
    ) -> TransportResult<String> {
        self.record("GET", url, bearer);
        self.next_response(url)
    }

    async fn get_bytes(
        &self,
        url: &str,
        bearer: Option<&str>,
        _timeout: Duration,
    ) -> TransportResult<Bytes> {
        self.record("GET", url, bearer);
        self.next_response(url).map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_served_in_order() {
        let mock = MockTransport::new();
        mock.push_body("first");
        mock.push_body("second");

        assert_eq!(
            mock.post("https://a", Duration::from_secs(1)).await.unwrap(),
            "first"
        );
        assert_eq!(
            mock.get("https://b", Some("tok"), Duration::from_secs(1))
                .await
                .unwrap(),
            "second"
        );

        let requests = mock.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[1].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockTransport::new();
        let handle = mock.clone();
        mock.push_body("scripted");

        handle
            .get_bytes("https://a", None, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(mock.requests().len(), 1);
        assert_eq!(mock.remaining(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_script_errors() {
        let mock = MockTransport::new();
        let err = mock
            .get_bytes("https://a", None, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no scripted response"));
    }
}
