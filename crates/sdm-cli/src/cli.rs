//! CLI argument definitions using clap derive API

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sdm - apply versioned SQL migrations exactly once
#[derive(Parser, Debug)]
#[command(name = "sdm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// DuckDB database file (":memory:" for an in-memory database)
    #[arg(long, global = true, env = "SDM_DATABASE")]
    pub database: Option<String>,

    /// Tracking table name (overrides SDM_OWN_TABLE)
    #[arg(short, long, global = true)]
    pub table: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations
    Migrate(MigrateArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Print the statements a migration file splits into
    Split(SplitArgs),
}

/// Where migration units come from
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["dir", "manifest"])))]
pub struct SourceArgs {
    /// Folder containing *.sql migration files
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Resource manifest path, resolved under --resource-root
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Root directory that resource paths are resolved against [default: .]
    #[arg(long, conflicts_with = "dir")]
    pub resource_root: Option<PathBuf>,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Migration file to split
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
