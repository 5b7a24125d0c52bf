//! Devcap CLI support
//!
//! Reference-file loading and the check run behind `devcap check`, kept out
//! of `main.rs` so they can be tested without spawning the binary.

pub mod references;
pub mod run;

pub use references::{load_references, SymbolReference};
pub use run::{check_references, CheckRun};

use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] devcap_check::ConfigError),

    #[error("invalid api docs response: {0}")]
    ApiDocs(#[from] devcap_apidocs::ApiDocsError),
}

pub type CliResult<T> = Result<T, CliError>;

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Default is `info`, with per-diagnostic events from the checker at `debug`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,devcap_check=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
