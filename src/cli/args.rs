//! Command line arguments for plan-check.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "plan-check", version, about = "Automated treatment plan checks")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the plan captured in a snapshot file
    Check(CheckArgs),
    /// List every rule in the catalog
    List,
    /// Print version information
    Version,
}

/// Interactive output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Result grid
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Plan snapshot (JSON) to check
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Configuration file (default: <config dir>/plan-check/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Folder for the persisted report
    #[arg(long, value_name = "DIR", conflicts_with = "no_report")]
    pub report_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not persist a report
    #[arg(long)]
    pub no_report: bool,

    /// Do not wait for Enter before saving the report
    #[arg(long)]
    pub no_wait: bool,

    /// Hide informational rows (counts are unchanged)
    #[arg(short, long)]
    pub quiet: bool,

    /// Fixed DVH settle delay used when the host cannot report readiness
    #[arg(long, value_name = "MS")]
    pub dvh_settle_ms: Option<u64>,

    /// Also write logs to plan-check.log in this folder
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}
