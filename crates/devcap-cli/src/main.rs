//! Devcap - checks resolved symbol references against a device denylist
//!
//! Reads references produced by a host that has already bound names, applies
//! the per-file levels from a `CheckConfig`, and prints the diagnostics.

use clap::{Parser, Subcommand, ValueEnum};
use devcap_apidocs::{validate_response, ApiDocsResponse};
use devcap_check::{CheckConfig, Denylist, DeviceRevision, MemberRule};
use devcap_cli::{check_references, init_logging, load_references, CliError, CliResult};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "devcap")]
#[command(about = "Check library API uses against a device revision's capabilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a file of resolved references
    Check {
        /// JSON array of resolved references
        references: PathBuf,

        /// CheckConfig YAML (defaults to micro:bit V1, warning level)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory the reference paths are relative to, for source snippets
        #[arg(long)]
        sources: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print a revision's denylist
    Denylist {
        #[arg(long, value_enum, default_value = "v1")]
        device: Device,
    },

    /// Validate a saved api docs response
    Apidocs {
        /// JSON response of a `pyright/apidocs` request
        response: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Device {
    V1,
    V2,
}

impl From<Device> for DeviceRevision {
    fn from(device: Device) -> Self {
        match device {
            Device::V1 => DeviceRevision::V1,
            Device::V2 => DeviceRevision::V2,
        }
    }
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            references,
            config,
            sources,
            format,
        } => run_check(&references, config.as_deref(), sources.as_deref(), format),
        Command::Denylist { device } => {
            print_denylist(device.into());
            Ok(true)
        }
        Command::Apidocs { response } => run_apidocs(&response),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when any error-level diagnostic was produced.
fn run_check(
    references: &Path,
    config: Option<&Path>,
    sources: Option<&Path>,
    format: OutputFormat,
) -> CliResult<bool> {
    let config = match config {
        Some(path) => CheckConfig::load(path)?,
        None => CheckConfig::default(),
    };
    info!("Checking {} for {}", references.display(), config.device);

    let references = load_references(references)?;
    let run = check_references(&config, &references, sources);

    match format {
        OutputFormat::Text => {
            if !run.diagnostics.is_empty() {
                println!("{}", run.render());
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(run.diagnostics.diagnostics())?;
            println!("{json}");
        }
    }

    Ok(!run.has_errors())
}

fn print_denylist(revision: DeviceRevision) {
    let denylist = Denylist::for_revision(revision);
    println!("# {}", revision);
    for rule in denylist.rules() {
        match rule.members {
            MemberRule::All => println!("{}: *", rule.module),
            MemberRule::Only(members) => println!("{}: {}", rule.module, members.join(", ")),
        }
    }
}

fn run_apidocs(path: &Path) -> CliResult<bool> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let response: ApiDocsResponse =
        serde_json::from_str(&content).map_err(|source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_response(&response)?;

    let entries: usize = response.values().map(|entry| entry.walk().count()).sum();
    info!("{}: {} trees, {} entries", path.display(), response.len(), entries);
    Ok(true)
}
