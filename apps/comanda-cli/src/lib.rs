//! # Comanda Command Line
//!
//! Library half of the `comanda` binary. `main.rs` only parses arguments
//! and reports the outcome; everything else lives here so it can be tested.
//!
//! ## Module Organization
//! ```text
//! comanda_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap definitions (closed Command enum)
//! ├── commands.rs     ◄─── One match over Command
//! ├── config.rs       ◄─── AppConfig (defaults + COMANDA_* env)
//! ├── context.rs      ◄─── AppContext { db, config }
//! ├── receipt.rs      ◄─── HTML tickets
//! ├── report.rs       ◄─── Daily sales CSV
//! └── error.rs        ◄─── ApiError for command failures
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ──► tracing-subscriber, stderr, RUST_LOG         │
//! │  2. Load Configuration ──► defaults + COMANDA_* + --db                  │
//! │  3. Open Database ───────► pool + migrations (fatal on failure)         │
//! │  4. Execute Command ─────► JSON result on stdout                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod receipt;
pub mod report;

use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::AppConfig;
use context::AppContext;
use error::ApiError;

/// Loads configuration, opens the database and runs the parsed command.
pub async fn run(cli: Cli) -> Result<Value, ApiError> {
    let mut config = AppConfig::from_env()?;
    if let Some(path) = cli.db {
        config = config.with_database_path(path);
    }

    let ctx = AppContext::open(config).await?;
    info!(command = cli.command.name(), "Running command");

    let outcome = commands::execute(&ctx, cli.command).await;
    ctx.db.close().await;
    outcome
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=comanda_db=trace` - Trace the database layer only
/// - Default: INFO, DEBUG for comanda crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,comanda=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
