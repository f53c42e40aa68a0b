//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Flowline - column-level lineage extraction from dbt artifacts
#[derive(Parser, Debug)]
#[command(name = "flowline")]
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
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract models, sources and column lineage into a single document
    Extract(ExtractArgs),
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to the dbt manifest.json artifact
    #[arg(long, default_value = "target/manifest.json")]
    pub manifest: String,

    /// Path to the dbt catalog.json artifact (optional; enriches types and stats)
    #[arg(long)]
    pub catalog: Option<String>,

    /// Path the lineage document is written to
    #[arg(short, long, default_value = "lineage.json")]
    pub output: String,

    /// SQL dialect the compiled models are written in
    #[arg(short, long, default_value = "clickhouse")]
    pub dialect: String,

    /// Commit SHA recorded in the document metadata
    #[arg(long, env = "GITHUB_SHA", default_value = "local")]
    pub commit_sha: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
