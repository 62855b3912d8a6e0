//! Wire and domain types shared by the orchestration core and the terminal client.
//!
//! Field names follow the client's snake_case convention. The transport layer
//! transcodes keys to and from the service's wire casing (see [`crate::casing`]),
//! so nothing in this module knows which convention the service speaks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single search hit returned by the service.
///
/// Identity is `(repo_name, file_path)`; see [`ResultItem::key`]. Two items with
/// the same key are the same hit even if their scores differ between searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Relevance score assigned by the service. Higher is better.
    #[serde(rename = "_score")]
    pub score: f64,
    /// Repository identifier the file belongs to.
    pub repo_name: String,
    /// Path of the repository on the service host.
    #[serde(default)]
    pub repo_path: Option<String>,
    /// Repository backend type (e.g. `"fs"`).
    #[serde(default)]
    pub repo_type: Option<String>,
    /// Bare file name, e.g. `Math.java`.
    pub file_name: String,
    /// Repository-relative path, e.g. `src/util/Math.java`.
    pub file_path: String,
    /// Extension without the dot; used as the language hint.
    #[serde(default)]
    pub file_ext: String,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: u64,
    /// Last-modified time as reported by the service.
    #[serde(default)]
    pub file_last_updated: Option<Timestamp>,
}

impl ResultItem {
    /// Returns the identity key of this hit.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.repo_name, &self.file_path)
    }

    /// Returns `true` when `key` identifies this hit.
    pub fn has_key(&self, key: &ItemKey) -> bool {
        self.repo_name == key.repo_name && self.file_path == key.file_path
    }

    /// Directory part of `file_path`, including the trailing slash.
    ///
    /// Empty for files at the repository root.
    pub fn directory(&self) -> &str {
        match self.file_path.rfind('/') {
            Some(idx) => &self.file_path[..=idx],
            None => "",
        }
    }
}

/// Identity key of a [`ResultItem`]: repository plus path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub repo_name: String,
    pub file_path: String,
}

impl ItemKey {
    pub fn new(repo_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self { repo_name: repo_name.into(), file_path: file_path.into() }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repo_name, self.file_path)
    }
}

/// Last-modified timestamp.
///
/// The service has shipped both Unix seconds and preformatted strings for this
/// field, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Seconds since the Unix epoch.
    Unix(u64),
    /// Any textual representation, shown verbatim.
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Unix(secs) => write!(f, "{secs}"),
            Timestamp::Text(text) => f.write_str(text),
        }
    }
}

/// Response envelope wrapping every service payload.
///
/// A non-null `error` means the call failed even when the HTTP status was 2xx.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    /// Server-side processing time in milliseconds.
    #[serde(default)]
    pub time_taken: Option<u64>,
}

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Restrict the search to these repositories. Empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<String>,
    /// Restrict the search to these file extensions. Empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
}

/// Body of `POST /api/file/content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContentRequest {
    pub repo_name: String,
    pub path: String,
}

impl From<&ItemKey> for FileContentRequest {
    fn from(key: &ItemKey) -> Self {
        Self { repo_name: key.repo_name.clone(), path: key.file_path.clone() }
    }
}

/// Payload of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// One indexed repository as listed by `GET /api/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub repo_type: String,
    #[serde(default)]
    pub last_indexed_time: Option<u64>,
    #[serde(default)]
    pub number_of_indexed_files: Option<u64>,
    #[serde(default)]
    pub indexing_status: String,
}
