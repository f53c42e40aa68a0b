//! Flowline CLI - column-level lineage extraction for dbt projects

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod document;

use cli::Cli;
use commands::extract;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Extract(args) => extract::execute(args, &cli.global).await,
    }
}
