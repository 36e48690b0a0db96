//! Injectable HTTP transport.
//!
//! The module uses a trait-based design for testability:
//!
//! - [`Transport`] - trait performing a single GET request
//! - [`ReqwestTransport`] - real HTTP implementation using reqwest, behind
//!   the on-by-default `default-transport` feature
//! - [`mock::MockTransport`] - recording mock for unit tests (behind the
//!   `test-utils` feature)
//!
//! A context that injects no transport falls back to a process-wide
//! [`ReqwestTransport`] which is only constructed the first time a request
//! is actually sent. When the crate is built without `default-transport`,
//! that fallback does not exist and the client fails lazily at send time.

use async_trait::async_trait;
use serde_json::Value;

/// Boxed error type used by transport implementations. Transport failures
/// pass through to the caller unmodified.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single-shot HTTP GET transport.
///
/// Headers are passed as ordered pairs; when two entries share a name, the
/// later one must win on the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request and return the raw response.
    ///
    /// # Errors
    ///
    /// Any network-level failure, surfaced unmodified.
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<TransportResponse, BoxError>;
}

/// Raw response produced by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    status: u16,
    status_text: String,
    body: Vec<u8>,
}

impl TransportResponse {
    /// Build a response from its parts. Useful for test transports.
    #[must_use]
    pub fn new(status: u16, status_text: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// Numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Status text, e.g. `Not Found`.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Success flag: true for 2xx status codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// The underlying parse error, surfaced unmodified.
    pub fn into_json(self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP transport backed by a shared [`reqwest::Client`].
#[cfg(feature = "default-transport")]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "default-transport")]
impl ReqwestTransport {
    /// Create a transport with a default reqwest client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport with a custom `reqwest::Client` (for custom
    /// timeouts, proxies, etc.).
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "default-transport")]
impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "default-transport")]
#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<TransportResponse, BoxError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse::new(status.as_u16(), status_text, body))
    }
}

/// The process-wide fallback transport, if this build has one.
///
/// Constructed on first use so that neither client construction nor
/// context validation requires a working HTTP stack.
#[cfg(feature = "default-transport")]
pub(crate) fn default_transport() -> Option<std::sync::Arc<dyn Transport>> {
    use std::sync::{Arc, OnceLock};

    static DEFAULT: OnceLock<Arc<dyn Transport>> = OnceLock::new();
    Some(Arc::clone(
        DEFAULT.get_or_init(|| Arc::new(ReqwestTransport::new())),
    ))
}

#[cfg(not(feature = "default-transport"))]
pub(crate) fn default_transport() -> Option<std::sync::Arc<dyn Transport>> {
    None
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod mock {
    //! Recording mock transport for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{BoxError, Transport, TransportResponse};

    /// One captured call to [`MockTransport::get`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedRequest {
        pub url: String,
        pub headers: Vec<(String, String)>,
    }

    /// Mock implementation of [`Transport`] for unit tests.
    ///
    /// Queue responses with `push_response`/`push_error` and inspect the
    /// captured requests with `calls()`. When the queue is empty, calls
    /// succeed with an empty JSON object.
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<TransportResponse, String>>>,
        calls: Mutex<Vec<RecordedRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Shortcut for a transport whose next response is 200 with the
        /// given JSON body.
        pub fn ok_json(body: &Value) -> Self {
            let transport = Self::new();
            transport.push_response(TransportResponse::new(
                200,
                "OK",
                body.to_string().into_bytes(),
            ));
            transport
        }

        /// Queue a response for a future call.
        pub fn push_response(&self, response: TransportResponse) {
            self.responses.lock().unwrap().push_back(Ok(response));
        }

        /// Queue a transport-level failure for a future call.
        pub fn push_error(&self, message: impl Into<String>) {
            self.responses.lock().unwrap().push_back(Err(message.into()));
        }

        /// All captured requests, in call order.
        pub fn calls(&self) -> Vec<RecordedRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<TransportResponse, BoxError> {
            self.calls.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                headers: headers.to_vec(),
            });

            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(message.into()),
                None => Ok(TransportResponse::new(200, "OK", b"{}".to_vec())),
            }
        }
    }
}
