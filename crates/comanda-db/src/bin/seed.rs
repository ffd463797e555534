//! # Baseline Seeder
//!
//! Creates (or tops up) a restaurant database with the baseline staff,
//! tables, menu and demo reservation.
//!
//! ## Usage
//! ```bash
//! # Seed ./restaurant.db (default)
//! cargo run -p comanda-db --bin seed
//!
//! # Specify database path
//! cargo run -p comanda-db --bin seed -- --db ./data/restaurant.db
//! ```
//!
//! Running it again on a seeded database inserts nothing.

use std::env;

use comanda_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./restaurant.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Comanda Baseline Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./restaurant.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Comanda Baseline Seeder");
    println!("=======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, schema at version {}", db.schema_version().await?);

    let report = db.seed_baseline().await?;
    if report.total() == 0 {
        println!("✓ Already seeded, nothing to insert");
    } else {
        println!("✓ Users:        {}", report.users);
        println!("✓ Tables:       {}", report.tables);
        println!("✓ Menu items:   {}", report.menu_items);
        println!("✓ Reservations: {}", report.reservations);
    }

    db.close().await;
    Ok(())
}
