//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! A thin wrapper around `wiremock` for declarative HTTP stubbing. Use it
//! to stub the query endpoint in integration tests without real network
//! calls.
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(500)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(5))`
//! - **Request verification**: `.expect_times(1)` to assert call count

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wrapper around a running `wiremock` server.
pub struct MockHttpServer {
    inner: MockServer,
}

impl MockHttpServer {
    /// Start a mock server on a random local port.
    pub async fn start() -> Self {
        Self {
            inner: MockServer::start().await,
        }
    }

    /// Base URL of the running server, e.g. `http://127.0.0.1:53412`.
    pub fn url(&self) -> String {
        self.inner.uri()
    }

    /// The underlying `wiremock` server, for mounting raw `Mock`s when a
    /// test needs matchers this wrapper does not expose.
    pub fn inner(&self) -> &MockServer {
        &self.inner
    }

    /// Begin stubbing a GET request for the given path.
    pub fn expect_get(&self, request_path: &str) -> GetStub<'_> {
        GetStub {
            server: &self.inner,
            path: request_path.to_string(),
            headers: Vec::new(),
            status: 200,
            json: None,
            body: None,
            delay: None,
            times: None,
        }
    }

    /// Assert that all mounted expectations were met.
    pub async fn verify(&self) {
        self.inner.verify().await;
    }
}

/// Builder for a stubbed GET endpoint.
pub struct GetStub<'a> {
    server: &'a MockServer,
    path: String,
    headers: Vec<(String, String)>,
    status: u16,
    json: Option<Value>,
    body: Option<String>,
    delay: Option<Duration>,
    times: Option<u64>,
}

impl GetStub<'_> {
    /// Only match requests carrying this exact header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Respond with a JSON body (status defaults to 200).
    pub fn respond_with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    /// Respond with a raw string body (status defaults to 200).
    pub fn respond_with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Respond with the given status code.
    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Delay the response, e.g. to trigger client timeouts.
    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Expect the stub to be hit exactly this many times (checked by
    /// [`MockHttpServer::verify`] or on server drop).
    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    /// Mount the stub on the server.
    pub async fn mount(self) {
        let mut builder = Mock::given(method("GET")).and(path(self.path));
        for (name, value) in &self.headers {
            builder = builder.and(header(name.as_str(), value.as_str()));
        }

        let mut template = ResponseTemplate::new(self.status);
        if let Some(json) = self.json {
            template = template.set_body_json(json);
        }
        if let Some(body) = self.body {
            template = template.set_body_string(body);
        }
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = builder.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(self.server).await;
    }
}
