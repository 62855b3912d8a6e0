//! Configuration: TOML file plus command-line overrides.
//!
//! The file lives at `$XDG_CONFIG_HOME/searchcode/config.toml` (falling back to
//! `~/.config/searchcode/config.toml`). Every key is optional. A missing file at
//! the default location means "all defaults"; a file named with `--config`
//! must exist. Command-line flags win over file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;

use searchcode_core::{SearchParams, SessionConfig, WireCase};

/// Command-line arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "searchcode")]
#[command(about = "Interactive terminal client for a searchcode server")]
#[command(version)]
pub struct Cli {
    /// Query to run on startup
    pub query: Option<String>,

    /// Base URL of the search service
    #[arg(long, short = 's', env = "SEARCHCODE_SERVER", value_name = "URL")]
    pub server: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Color theme (dark, catppuccin-mocha)
    #[arg(long, short = 't')]
    pub theme: Option<String>,

    /// Quiet period before a typed query is sent
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Restrict searches to this repository (repeatable)
    #[arg(long = "repo", short = 'r', value_name = "NAME")]
    pub repos: Vec<String>,

    /// Restrict searches to this file extension (repeatable)
    #[arg(long = "file-type", short = 'f', value_name = "EXT")]
    pub file_types: Vec<String>,

    /// Write logs here instead of the default state directory
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// On-disk configuration. Absent keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server_url: String,
    pub debounce_ms: u64,
    /// Maximum hits per search; `0` leaves the limit to the server.
    pub search_limit: usize,
    pub repos: Vec<String>,
    pub file_types: Vec<String>,
    pub request_timeout_secs: u64,
    pub wire_case: WireCase,
    pub theme: String,
    pub log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3030".to_owned(),
            debounce_ms: 500,
            search_limit: 200,
            repos: Vec::new(),
            file_types: Vec::new(),
            request_timeout_secs: 30,
            wire_case: WireCase::Snake,
            theme: "catppuccin-mocha".to_owned(),
            log_file: None,
        }
    }
}

/// Fully resolved settings the binary runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub session: SessionConfig,
    pub request_timeout: Duration,
    pub wire_case: WireCase,
    pub theme: String,
    pub log_file: PathBuf,
    pub initial_query: Option<String>,
}

impl Config {
    /// Reads the config file (if any) and applies `cli` on top.
    ///
    /// # Errors
    ///
    /// Fails when an explicit `--config` file is missing, or when any config
    /// file exists but cannot be read or parsed.
    pub fn load(cli: Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => read_file(path)?,
            None => {
                let path = config_path();
                if path.exists() { read_file(&path)? } else { FileConfig::default() }
            }
        };
        Ok(Self::merge(file, cli))
    }

    /// Combines file values with command-line overrides.
    pub fn merge(file: FileConfig, cli: Cli) -> Self {
        let repos = if cli.repos.is_empty() { file.repos } else { cli.repos };
        let file_types = if cli.file_types.is_empty() { file.file_types } else { cli.file_types };
        let debounce_ms = cli.debounce_ms.unwrap_or(file.debounce_ms);

        Self {
            server_url: cli.server.unwrap_or(file.server_url),
            session: SessionConfig {
                debounce: Duration::from_millis(debounce_ms),
                search: SearchParams {
                    limit: (file.search_limit > 0).then_some(file.search_limit),
                    repos,
                    file_types,
                },
            },
            request_timeout: Duration::from_secs(file.request_timeout_secs.max(1)),
            wire_case: file.wire_case,
            theme: cli.theme.unwrap_or(file.theme),
            log_file: cli.log_file.or(file.log_file).unwrap_or_else(default_log_path),
            initial_query: cli.query.filter(|q| !q.trim().is_empty()),
        }
    }
}

fn read_file(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Resolves `$<var>/searchcode`, falling back to `~/<fallback>/searchcode`.
fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    let base = std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback));
    base.join("searchcode")
}

/// Returns the path to the searchcode config file.
///
/// Prefers `$XDG_CONFIG_HOME/searchcode/config.toml`; falls back to
/// `~/.config/searchcode/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("config.toml")
}

fn default_log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("searchcode.log")
}
