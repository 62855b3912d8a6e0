//! Transport boundary: the four-verb request contract and its HTTP implementation.
//!
//! The orchestration core only ever sees [`Transport`]. It relies on two
//! properties: each call resolves to the response of exactly that request, and
//! failures are returned as [`TransportError`] rather than swallowed. Nothing
//! is assumed about completion order, which is why every consumer sequences its
//! calls with epochs.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::casing::{transcode, WireCase};
use crate::error::{TransportError, TransportResult};

/// HTTP verb of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single service call: verb, path, query pairs and an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), params: Vec::new(), body: None }
    }

    pub fn with_params(mut self, params: &[(&str, &str)]) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Issues requests against the search service.
///
/// Implementors provide [`Transport::request`]; the verb helpers are built on it.
/// Payloads are returned as raw JSON with keys already in the client's
/// snake_case convention.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs `request` and returns the decoded JSON payload.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] for network failures, timeouts, non-success
    /// statuses and undecodable bodies.
    async fn request(&self, request: Request) -> TransportResult<Value>;

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> TransportResult<Value> {
        self.request(Request::new(Method::Get, path).with_params(params)).await
    }

    async fn post(&self, path: &str, body: Value) -> TransportResult<Value> {
        self.request(Request::new(Method::Post, path).with_body(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> TransportResult<Value> {
        self.request(Request::new(Method::Put, path).with_body(body)).await
    }

    async fn delete(&self, path: &str) -> TransportResult<Value> {
        self.request(Request::new(Method::Delete, path)).await
    }
}

/// [`Transport`] over HTTP using a shared `reqwest::Client`.
///
/// Outgoing bodies are transcoded to `wire_case`; incoming payloads are always
/// transcoded back to snake_case before they leave this type.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    wire_case: WireCase,
}

impl HttpTransport {
    /// Builds a transport rooted at `base_url` (e.g. `http://localhost:3030`).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the underlying client cannot be
    /// constructed (TLS backend initialisation failure).
    pub fn new(
        base_url: impl Into<String>,
        wire_case: WireCase,
        timeout: Duration,
    ) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client, base_url: base_url.into(), wire_case })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: Request) -> TransportResult<Value> {
        let url = self.url(&request.path);
        tracing::debug!(method = ?request.method, %url, "sending request");

        let mut builder = self.client.request(request.method.as_reqwest(), &url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = request.body {
            builder = builder.json(&transcode(body, self.wire_case));
        }

        let response = builder.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status: status.as_u16(), body });
        }

        let payload: Value = response.json().await.map_err(TransportError::from_reqwest)?;
        Ok(transcode(payload, WireCase::Snake))
    }
}

/// Joins a base URL and a request path with exactly one slash between them.
fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
