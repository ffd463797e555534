//! # Baseline Seed
//!
//! Staff accounts, tables, a starter menu and one demo reservation for a
//! brand-new restaurant database.
//!
//! Every row is inserted only when no row with the same natural key
//! (username, table name, dish name, customer name) exists, so seeding
//! an already seeded store changes nothing. The whole seed runs in one
//! transaction.

use chrono::{Duration, Local};
use comanda_core::auth::hash_password;
use comanda_core::{Role, TableStatus};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};

/// Number of tables created by the baseline seed.
pub const SEED_TABLES: i64 = 10;

const SEED_USERS: &[(&str, Role, &str)] = &[
    ("admin", Role::Admin, "admin123"),
    ("waiter1", Role::Waiter, "waiter123"),
    ("waiter2", Role::Waiter, "waiter123"),
];

// (name, category, price, cost, stock)
const SEED_MENU: &[(&str, &str, f64, f64, i64)] = &[
    ("Milanesa", "Main", 3500.0, 1500.0, 20),
    ("Salad", "Starter", 2100.0, 800.0, 15),
    ("Soup of the Day", "Starter", 1800.0, 600.0, 10),
    ("Gnocchi", "Main", 3200.0, 1400.0, 25),
    ("Ravioli", "Main", 3300.0, 1500.0, 18),
    ("Pizza Margherita", "Main", 3600.0, 1700.0, 20),
    ("Gourmet Burger", "Main", 3400.0, 1600.0, 30),
    ("Flan", "Dessert", 1500.0, 500.0, 12),
    ("Ice Cream", "Dessert", 1600.0, 600.0, 20),
    ("Coffee", "Drink", 900.0, 200.0, 100),
];

const DEMO_CUSTOMER: &str = "Demo Customer";

/// Rows inserted by one seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: u64,
    pub tables: u64,
    pub menu_items: u64,
    pub reservations: u64,
}

impl SeedReport {
    pub fn total(&self) -> u64 {
        self.users + self.tables + self.menu_items + self.reservations
    }
}

/// Seeds the baseline data where missing.
pub async fn seed_baseline(pool: &SqlitePool) -> DbResult<SeedReport> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    match seed_in(&mut *tx).await {
        Ok(report) => {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            info!(
                users = report.users,
                tables = report.tables,
                menu_items = report.menu_items,
                reservations = report.reservations,
                "Baseline seed applied"
            );
            Ok(report)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

async fn seed_in(conn: &mut SqliteConnection) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    for (username, role, password) in SEED_USERS {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
            .bind(*username)
            .fetch_one(&mut *conn)
            .await?;
        if exists > 0 {
            continue;
        }

        debug!(username = %username, "Seeding user");
        let password_hash = hash_password(password)?;
        report.users += sqlx::query(
            "INSERT INTO users (username, role, password_hash) VALUES (?1, ?2, ?3)",
        )
        .bind(*username)
        .bind(*role)
        .bind(password_hash)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    for number in 1..=SEED_TABLES {
        let name = format!("Table {number}");
        report.tables += sqlx::query(
            r#"
            INSERT INTO tables (name, status)
            SELECT ?1, ?2
            WHERE NOT EXISTS (SELECT 1 FROM tables WHERE name = ?1)
            "#,
        )
        .bind(&name)
        .bind(TableStatus::Free)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    for (name, category, price, cost, stock) in SEED_MENU {
        report.menu_items += sqlx::query(
            r#"
            INSERT INTO menu_items (name, category, price, cost, stock)
            SELECT ?1, ?2, ?3, ?4, ?5
            WHERE NOT EXISTS (SELECT 1 FROM menu_items WHERE name = ?1)
            "#,
        )
        .bind(*name)
        .bind(*category)
        .bind(*price)
        .bind(*cost)
        .bind(*stock)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    let tomorrow = Local::now().naive_local() + Duration::days(1);
    report.reservations += sqlx::query(
        r#"
        INSERT INTO reservations (table_id, customer_name, customer_phone, reserved_at, notes)
        SELECT t.id, ?1, ?2, ?3, ?4
        FROM tables t
        WHERE t.name = 'Table 1'
          AND NOT EXISTS (SELECT 1 FROM reservations WHERE customer_name = ?1)
        "#,
    )
    .bind(DEMO_CUSTOMER)
    .bind("123456789")
    .bind(tomorrow)
    .bind("Window seat")
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(report)
}

// =============================================================================
// Unit Tests
// =============================================================================
