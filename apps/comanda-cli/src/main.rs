//! # Comanda Entry Point
//!
//! ```text
//! comanda [--db restaurant.db] <command>
//!     │
//!     ├── ok  ──► pretty JSON on stdout, exit 0
//!     └── err ──► "[CODE] message" on stderr, exit 1
//! ```
//!
//! A database that cannot be migrated fails here before any command runs.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use comanda_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    comanda_cli::init_tracing();

    match try_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output = comanda_cli::run(cli).await?;

    let text = serde_json::to_string_pretty(&output).context("encoding command output")?;
    println!("{}", text);
    Ok(())
}
