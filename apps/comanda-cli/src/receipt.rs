//! # Receipts
//!
//! Renders a settled order as a small HTML ticket and writes it to
//! `<receipt_dir>/ticket_<order_id>.html`.
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Ticket #12               │
//! │ Milanesa      ARS 3500.00│
//! │ Milanesa      ARS 3500.00│
//! │ ──────────────────────── │
//! │ Subtotal      ARS 7000.00│
//! │ IVA           ARS 1470.00│
//! │ Propina       ARS  700.00│
//! │ Descuento     ARS    0.00│
//! │ Total         ARS 9170.00│
//! └──────────────────────────┘
//! ```

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use comanda_core::{PricedOrderItem, Settlement};

use crate::config::AppConfig;

struct Labels {
    ticket: &'static str,
    subtotal: &'static str,
    tax: &'static str,
    tip: &'static str,
    discount: &'static str,
    total: &'static str,
}

const SPANISH: Labels = Labels {
    ticket: "Ticket",
    subtotal: "Subtotal",
    tax: "IVA",
    tip: "Propina",
    discount: "Descuento",
    total: "Total",
};

const ENGLISH: Labels = Labels {
    ticket: "Receipt",
    subtotal: "Subtotal",
    tax: "Tax",
    tip: "Tip",
    discount: "Discount",
    total: "Total",
};

fn labels(locale: &str) -> &'static Labels {
    if locale.starts_with("es") {
        &SPANISH
    } else {
        &ENGLISH
    }
}

/// Renders the ticket for one order.
pub fn render(
    order_id: i64,
    items: &[PricedOrderItem],
    settlement: &Settlement,
    config: &AppConfig,
) -> String {
    let l = labels(&config.locale);
    let money = |amount: f64| escape(&config.format_currency(amount));

    let mut html = String::new();
    let _ = write!(html, "<html><body><h1>{} #{}</h1>", l.ticket, order_id);

    html.push_str("<table>");
    for item in items {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&item.name),
            money(item.price)
        );
    }
    html.push_str("</table><hr><table>");

    for (label, amount) in [
        (l.subtotal, settlement.subtotal),
        (l.tax, settlement.tax),
        (l.tip, settlement.tip),
        (l.discount, settlement.discount),
    ] {
        let _ = write!(html, "<tr><td>{}</td><td>{}</td></tr>", label, money(amount));
    }
    let _ = write!(
        html,
        "<tr><th>{}</th><th>{}</th></tr></table></body></html>\n",
        l.total,
        money(settlement.total)
    );

    html
}

/// Writes a rendered ticket, creating the directory if needed.
pub fn write(dir: &Path, order_id: i64, html: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("ticket_{}.html", order_id));
    fs::write(&path, html)?;
    Ok(path)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
