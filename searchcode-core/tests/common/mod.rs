//! Shared fixtures for session integration tests.
//!
//! [`ScriptedTransport`] parks every request until the test answers it, so tests
//! decide exactly when (and in which order) responses arrive.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use searchcode_core::{
    CoreEvent, Failure, Request, Session, SessionConfig, Transport, TransportError,
    TransportResult,
};

struct Call {
    request: Request,
    reply: Option<oneshot::Sender<TransportResult<Value>>>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.calls.lock().unwrap().iter().map(|c| c.request.clone()).collect()
    }

    /// Number of requests made against `path`.
    pub fn count(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.request.path == path).count()
    }

    /// Index of the first request matching `pred`.
    pub fn position(&self, pred: impl Fn(&Request) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .position(|c| pred(&c.request))
            .expect("no matching request")
    }

    /// Index of the search request for `query`.
    pub fn search_for(&self, query: &str) -> usize {
        self.position(|r| {
            r.path == searchcode_core::api::SEARCH_PATH
                && r.body.as_ref().and_then(|b| b.get("query")) == Some(&json!(query))
        })
    }

    /// Index of the content request for `repo`/`path`.
    pub fn content_for(&self, repo: &str, path: &str) -> usize {
        self.position(|r| {
            r.path == searchcode_core::api::FILE_CONTENT_PATH
                && r.body.as_ref() == Some(&json!({ "repo_name": repo, "path": path }))
        })
    }

    /// Resolves request `index` with `result`.
    pub fn respond(&self, index: usize, result: TransportResult<Value>) {
        let reply = self.calls.lock().unwrap()[index].reply.take().expect("request already answered");
        let _ = reply.send(result);
    }

    /// Yields until at least `n` requests have arrived.
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..1000 {
            if self.calls.lock().unwrap().len() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {n} requests, saw {}", self.calls.lock().unwrap().len());
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: Request) -> TransportResult<Value> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(Call { request, reply: Some(tx) });
        rx.await.unwrap_or_else(|_| Err(TransportError::Network("reply dropped".to_owned())))
    }
}

pub fn session(transport: &Arc<ScriptedTransport>) -> Session {
    Session::new(transport.clone(), SessionConfig::default())
}

/// A search hit as the service would send it.
pub fn hit(repo: &str, path: &str, score: f64) -> Value {
    let name = path.rsplit('/').next().unwrap_or(path);
    let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or_default();
    json!({
        "_score": score,
        "repo_name": repo,
        "file_name": name,
        "file_path": path,
        "file_ext": ext,
        "file_size": 42,
    })
}

/// Wraps `data` in the service response envelope.
pub fn envelope(data: Value) -> TransportResult<Value> {
    Ok(json!({ "data": data, "error": null, "time_taken": 1 }))
}

/// Waits (in paused time) for the next core event.
pub async fn next_event(session: &mut Session) -> CoreEvent {
    tokio::time::timeout(Duration::from_secs(30), session.next_event())
        .await
        .expect("timed out waiting for a core event")
        .expect("event channel closed")
}

/// Receives and applies exactly one event.
pub async fn pump(session: &mut Session) -> Option<Failure> {
    let event = next_event(session).await;
    session.handle_event(event)
}

/// Asserts that no event arrives within a generous window.
pub async fn assert_quiet(session: &mut Session) {
    let waited = tokio::time::timeout(Duration::from_secs(30), session.next_event()).await;
    assert!(waited.is_err(), "unexpected event: {waited:?}");
}
