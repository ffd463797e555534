//! Daily sales export: `<report_dir>/sales_<YYYY-MM-DD>.csv`.
//!
//! One line per order with its gross subtotal (menu prices only).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use comanda_core::DailySalesRow;

pub const CSV_HEADER: &str = "order_id,table,waiter,gross_subtotal";

/// Renders the report rows as CSV, header first.
pub fn render_csv(rows: &[DailySalesRow]) -> String {
    let mut csv = String::with_capacity(64 * (rows.len() + 1));
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{:.2}\n",
            row.order_id,
            field(&row.table_name),
            field(&row.waiter_name),
            row.gross_subtotal
        ));
    }
    csv
}

/// Writes the CSV for `date`, replacing any previous export of that day.
pub fn write(dir: &Path, date: NaiveDate, rows: &[DailySalesRow]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("sales_{}.csv", date.format("%Y-%m-%d")));
    fs::write(&path, render_csv(rows))?;
    Ok(path)
}

// Quote when the value would break the row.
fn field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(order_id: i64, table: &str, gross: f64) -> DailySalesRow {
        DailySalesRow {
            order_id,
            table_name: table.to_string(),
            waiter_name: "waiter1".to_string(),
            gross_subtotal: gross,
        }
    }

    #[test]
    fn test_empty_report_has_header_only() {
        assert_eq!(render_csv(&[]), "order_id,table,waiter,gross_subtotal\n");
    }

    #[test]
    fn test_rows_and_quoting() {
        let csv = render_csv(&[row(1, "Table 1", 7000.0), row(2, "Patio, \"north\"", 900.5)]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[1], "1,Table 1,waiter1,7000.00");
        assert_eq!(lines[2], "2,\"Patio, \"\"north\"\"\",waiter1,900.50");
    }

    #[test]
    fn test_write_names_file_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        let path = write(dir.path(), date, &[row(1, "Table 1", 10.0)]).unwrap();
        assert_eq!(path, dir.path().join("sales_2026-10-17.csv"));
        assert!(fs::read_to_string(path).unwrap().starts_with(CSV_HEADER));
    }
}
