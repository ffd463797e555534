//! Command line definitions. Dispatch lives in [`commands`](crate::commands).

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use comanda_core::OrderItemStatus;

#[derive(Parser, Debug)]
#[clap(
    name = "comanda",
    version = env!("CARGO_PKG_VERSION"),
    about = "Restaurant point of sale: tables, orders, kitchen status, receipts and daily sales."
)]
pub struct Cli {
    /// Database file (overrides COMANDA_DB_PATH)
    #[clap(long, short = 'd', global = true)]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create the schema and seed staff, tables, menu and a demo reservation
    Bootstrap,

    /// Check a staff member's credentials
    Login {
        #[clap(long, short = 'u')]
        username: String,
        #[clap(long, short = 'p')]
        password: String,
    },

    /// List tables with their status and waiter
    Tables,

    /// List the menu
    Menu,

    /// List open orders, newest first
    Orders,

    /// List the items of an order with their prices
    Items {
        order_id: i64,
    },

    /// List reservations by time
    Reservations,

    /// Book a table
    Reserve {
        #[clap(long)]
        table: i64,
        #[clap(long)]
        name: String,
        #[clap(long)]
        phone: Option<String>,
        /// Local time, "YYYY-MM-DD HH:MM"
        #[clap(long, value_parser = parse_datetime)]
        at: NaiveDateTime,
        #[clap(long)]
        notes: Option<String>,
    },

    /// Open an order on a table
    OpenOrder {
        #[clap(long)]
        table: i64,
        #[clap(long)]
        waiter: i64,
    },

    /// Add a dish to an order
    AddItem {
        order_id: i64,
        menu_item_id: i64,
        #[clap(long)]
        notes: Option<String>,
    },

    /// Move an item to requested, in_preparation, ready or served
    SetItemStatus {
        item_id: i64,
        status: OrderItemStatus,
    },

    /// Compute an order's totals and write its receipt
    Settle {
        order_id: i64,
        /// Tip as a fraction of the subtotal, e.g. 0.1
        #[clap(long, default_value_t = 0.0)]
        tip: f64,
        /// Absolute amount taken off the total
        #[clap(long, default_value_t = 0.0)]
        discount: f64,
        /// Also close the order and free its table
        #[clap(long)]
        close: bool,
    },

    /// Close an order and free its table
    CloseOrder {
        order_id: i64,
    },

    /// Write the daily sales CSV (default: today, UTC)
    ExportReport {
        #[clap(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

impl Command {
    /// Subcommand name as typed on the command line. Safe to log: carries
    /// no arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Bootstrap => "bootstrap",
            Command::Login { .. } => "login",
            Command::Tables => "tables",
            Command::Menu => "menu",
            Command::Orders => "orders",
            Command::Items { .. } => "items",
            Command::Reservations => "reservations",
            Command::Reserve { .. } => "reserve",
            Command::OpenOrder { .. } => "open-order",
            Command::AddItem { .. } => "add-item",
            Command::SetItemStatus { .. } => "set-item-status",
            Command::Settle { .. } => "settle",
            Command::CloseOrder { .. } => "close-order",
            Command::ExportReport { .. } => "export-report",
        }
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .ok_or_else(|| format!("expected \"YYYY-MM-DD HH:MM\", got '{}'", raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM-DD, got '{}'", raw))
}
