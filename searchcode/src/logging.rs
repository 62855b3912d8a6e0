//! Tracing setup.
//!
//! The TUI owns the terminal, so log output goes to a file only. Filtering is
//! controlled by `SEARCHCODE_LOG` using `EnvFilter` directive syntax.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context as _;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "SEARCHCODE_LOG";

const DEFAULT_DIRECTIVES: &str = "searchcode=info,searchcode_core=info";

/// Installs the global subscriber, appending to `path`.
///
/// # Errors
///
/// Fails if the log file (or its directory) cannot be created, or if a global
/// subscriber is already installed.
pub fn init(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
