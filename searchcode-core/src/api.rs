//! Typed client for the search service endpoints.
//!
//! Wraps a shared [`Transport`] and turns raw JSON envelopes into domain types.
//! Cheap to clone; spawned request tasks each take their own handle.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{TransportError, TransportResult};
use crate::transport::Transport;
use crate::types::{
    Envelope, FileContentRequest, HealthResponse, ItemKey, RepoInfo, ResultItem, SearchRequest,
};

pub const HEALTH_PATH: &str = "/api/health";
pub const SEARCH_PATH: &str = "/api/search";
pub const FILE_CONTENT_PATH: &str = "/api/file/content";
pub const REPOS_PATH: &str = "/api/repos";

#[derive(Clone)]
pub struct SearchApi {
    transport: Arc<dyn Transport>,
}

impl SearchApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Probes `GET /api/health`.
    pub async fn health(&self) -> TransportResult<HealthResponse> {
        let payload = self.transport.get(HEALTH_PATH, &[]).await?;
        require(unwrap_envelope(payload)?, "health")
    }

    /// Runs a search and returns hits in the order the service ranked them.
    ///
    /// # Errors
    ///
    /// A missing `data` field without an `error` is treated as a decode failure;
    /// an empty hit list must be sent as `[]`.
    pub async fn search(&self, request: &SearchRequest) -> TransportResult<Vec<ResultItem>> {
        let body = encode(request)?;
        let payload = self.transport.post(SEARCH_PATH, body).await?;
        require(unwrap_envelope(payload)?, "search")
    }

    /// Fetches the raw text of one file.
    ///
    /// `Ok(None)` is the service's "absent" indicator and is not an error.
    pub async fn file_content(&self, key: &ItemKey) -> TransportResult<Option<String>> {
        let body = encode(&FileContentRequest::from(key))?;
        let payload = self.transport.post(FILE_CONTENT_PATH, body).await?;
        unwrap_envelope(payload)
    }

    /// Lists the repositories the service has indexed.
    pub async fn repos(&self) -> TransportResult<Vec<RepoInfo>> {
        let payload = self.transport.get(REPOS_PATH, &[]).await?;
        Ok(unwrap_envelope(payload)?.unwrap_or_default())
    }
}

fn encode<T: serde::Serialize>(body: &T) -> TransportResult<Value> {
    serde_json::to_value(body).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Decodes the `{data, error, time_taken}` envelope.
///
/// A non-null `error` wins over any `data` that came with it.
fn unwrap_envelope<T: DeserializeOwned>(payload: Value) -> TransportResult<Option<T>> {
    let envelope: Envelope<T> =
        serde_json::from_value(payload).map_err(|e| TransportError::Decode(e.to_string()))?;
    if let Some(message) = envelope.error {
        return Err(TransportError::Service(message));
    }
    Ok(envelope.data)
}

fn require<T>(data: Option<T>, what: &str) -> TransportResult<T> {
    data.ok_or_else(|| TransportError::Decode(format!("{what} response has no data")))
}
