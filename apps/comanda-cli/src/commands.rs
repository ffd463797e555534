//! # Command Dispatch
//!
//! Every [`Command`] is handled in [`execute`], which returns the JSON
//! value printed by `main`. Handlers only call `OrderLifecycle` and the
//! repositories; they never touch SQL.
//!
//! ```text
//! Command ──► execute(&AppContext) ──► OrderLifecycle / XRepository
//!                    │
//!                    ├── settle        ──► receipt::write  (receipts/ticket_<id>.html)
//!                    └── export-report ──► report::write   (reports/sales_<date>.csv)
//! ```

use chrono::Utc;
use comanda_core::NewReservation;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::cli::Command;
use crate::context::AppContext;
use crate::error::ApiError;
use crate::{receipt, report};

pub type CommandResult = Result<Value, ApiError>;

/// Runs one command against the open database.
pub async fn execute(ctx: &AppContext, command: Command) -> CommandResult {
    match command {
        Command::Bootstrap => bootstrap(ctx).await,
        Command::Login { username, password } => {
            to_json(ctx.db.users().authenticate(&username, &password).await?)
        }
        Command::Tables => to_json(ctx.db.tables().list().await?),
        Command::Menu => to_json(ctx.db.menu().list().await?),
        Command::Orders => to_json(ctx.db.orders().list_open().await?),
        Command::Items { order_id } => {
            if ctx.db.orders().get_by_id(order_id).await?.is_none() {
                return Err(ApiError::not_found("Order", &order_id.to_string()));
            }
            to_json(ctx.db.orders().list_priced_items(order_id).await?)
        }
        Command::Reservations => to_json(ctx.db.reservations().list().await?),
        Command::Reserve {
            table,
            name,
            phone,
            at,
            notes,
        } => {
            let booking = NewReservation {
                table_id: table,
                customer_name: name,
                customer_phone: phone,
                reserved_at: at,
                notes,
            };
            to_json(ctx.db.reservations().create(&booking).await?)
        }
        Command::OpenOrder { table, waiter } => {
            to_json(ctx.lifecycle().create_order(table, waiter).await?)
        }
        Command::AddItem {
            order_id,
            menu_item_id,
            notes,
        } => to_json(
            ctx.lifecycle()
                .add_item(order_id, menu_item_id, notes.as_deref())
                .await?,
        ),
        Command::SetItemStatus { item_id, status } => {
            ctx.lifecycle().update_item_status(item_id, status).await?;
            Ok(json!({ "itemId": item_id, "status": status }))
        }
        Command::Settle {
            order_id,
            tip,
            discount,
            close,
        } => settle(ctx, order_id, tip, discount, close).await,
        Command::CloseOrder { order_id } => to_json(ctx.lifecycle().close_order(order_id).await?),
        Command::ExportReport { date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let rows = ctx.db.reports().daily_sales(date).await?;
            let path = report::write(&ctx.config.report_dir, date, &rows)?;

            info!(%date, rows = rows.len(), path = %path.display(), "Sales report exported");
            Ok(json!({ "path": path, "rows": rows.len() }))
        }
    }
}

async fn bootstrap(ctx: &AppContext) -> CommandResult {
    let migrations = ctx.db.run_migrations().await?;
    let seeded = ctx.db.seed_baseline().await?;

    Ok(json!({
        "schemaVersion": migrations.to_version,
        "migrationsApplied": migrations.applied,
        "seeded": seeded,
    }))
}

// The receipt is written before the optional close; a failed close
// leaves the receipt on disk and the order as it was.
async fn settle(
    ctx: &AppContext,
    order_id: i64,
    tip: f64,
    discount: f64,
    close: bool,
) -> CommandResult {
    let lifecycle = ctx.lifecycle();
    let settlement = lifecycle.close_and_settle(order_id, tip, discount).await?;

    let items = ctx.db.orders().list_priced_items(order_id).await?;
    let html = receipt::render(order_id, &items, &settlement, &ctx.config);
    let path = receipt::write(&ctx.config.receipt_dir, order_id, &html)?;
    info!(order_id, path = %path.display(), "Receipt written");

    let closed = if close {
        Some(lifecycle.close_order(order_id).await?)
    } else {
        None
    };

    Ok(json!({
        "settlement": settlement,
        "receipt": path,
        "order": closed,
    }))
}

fn to_json<T: Serialize>(value: T) -> CommandResult {
    Ok(serde_json::to_value(value)?)
}
