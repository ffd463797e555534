//! # Application Configuration
//!
//! Read once at startup and passed down through [`AppContext`](crate::context::AppContext).
//!
//! ## Configuration Sources (Priority Order)
//! 1. `--db` command line flag (database path only)
//! 2. Environment variables (`COMANDA_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after loading, so no lock is involved.

use std::path::PathBuf;

use comanda_core::{TaxRate, DEFAULT_TAX_RATE};
use serde::Serialize;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Receipt language ("es" or "en")
    pub locale: String,

    /// Currency code printed on receipts (ISO 4217)
    pub currency: String,

    /// Tax rate as a fraction, e.g. 0.21
    pub tax_rate: f64,

    /// Directory receipts are written to
    pub receipt_dir: PathBuf,

    /// Directory CSV reports are written to
    pub report_dir: PathBuf,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: `restaurant.db`
    /// - Locale: `es`, currency `ARS`
    /// - Tax: 21%
    /// - Output: `receipts/`, `reports/`
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("restaurant.db"),
            locale: "es".to_string(),
            currency: "ARS".to_string(),
            tax_rate: DEFAULT_TAX_RATE,
            receipt_dir: PathBuf::from("receipts"),
            report_dir: PathBuf::from("reports"),
        }
    }
}

impl AppConfig {
    /// Loads the defaults overridden by the process environment.
    ///
    /// ## Environment Variables
    /// - `COMANDA_DB_PATH`: database file
    /// - `COMANDA_TAX_RATE`: tax fraction (e.g. "0.21")
    /// - `COMANDA_CURRENCY`: currency code
    /// - `COMANDA_LOCALE`: receipt language
    /// - `COMANDA_RECEIPT_DIR`: receipt directory
    /// - `COMANDA_REPORT_DIR`: report directory
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = non_empty(&lookup, "COMANDA_DB_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(raw) = non_empty(&lookup, "COMANDA_TAX_RATE") {
            config.tax_rate = parse_tax_rate(&raw)?;
        }

        if let Some(currency) = non_empty(&lookup, "COMANDA_CURRENCY") {
            config.currency = currency;
        }

        if let Some(locale) = non_empty(&lookup, "COMANDA_LOCALE") {
            config.locale = locale.to_lowercase();
        }

        if let Some(dir) = non_empty(&lookup, "COMANDA_RECEIPT_DIR") {
            config.receipt_dir = PathBuf::from(dir);
        }

        if let Some(dir) = non_empty(&lookup, "COMANDA_REPORT_DIR") {
            config.report_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Replaces the database path (the `--db` flag).
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// The configured rate as the engine's tax type.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_fraction(self.tax_rate)
    }

    /// Formats an amount with the configured currency.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(9170.0), "ARS 9170.00");
    /// ```
    pub fn format_currency(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{} {:.2}", self.currency, amount.abs())
        } else {
            format!("{} {:.2}", self.currency, amount)
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_tax_rate(raw: &str) -> Result<f64, ConfigError> {
    const KEY: &str = "COMANDA_TAX_RATE";

    let rate: f64 = raw
        .parse()
        .map_err(|_| ConfigError::invalid(KEY, raw, "not a number"))?;

    if !rate.is_finite() || rate < 0.0 {
        return Err(ConfigError::invalid(KEY, raw, "must be a non-negative fraction"));
    }
    if rate > 1.0 {
        return Err(ConfigError::invalid(
            KEY,
            raw,
            "expected a fraction such as 0.21, not a percentage",
        ));
    }

    Ok(rate)
}
