//! Configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first if present. Every
//! setting has a default, so an empty environment yields a working demo.

use crate::domain::{LoanPolicy, DEFAULT_ANNUAL_RATE, DEFAULT_PREMIUM_FEE};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Annual interest rate in percent
    pub annual_rate: f64,
    /// Flat fee for the priority review add-on
    pub premium_fee: u64,
    /// File receiving tracing output; the terminal belongs to the UI
    pub log_file: PathBuf,
    /// Filter used when RUST_LOG is not set
    pub log_level: String,
    /// Default directory for exports
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            annual_rate: DEFAULT_ANNUAL_RATE,
            premium_fee: DEFAULT_PREMIUM_FEE,
            log_file: PathBuf::from("microloan.log"),
            log_level: "info".to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let annual_rate = match lookup("MICROLOAN_ANNUAL_RATE") {
            Some(raw) => {
                let rate = raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidValue {
                    key: "MICROLOAN_ANNUAL_RATE",
                    value: raw.clone(),
                    reason: "not a number",
                })?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        key: "MICROLOAN_ANNUAL_RATE",
                        value: raw,
                        reason: "must be a non-negative percentage",
                    });
                }
                rate
            }
            None => defaults.annual_rate,
        };

        let premium_fee = match lookup("MICROLOAN_PREMIUM_FEE") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "MICROLOAN_PREMIUM_FEE",
                value: raw.clone(),
                reason: "must be a whole amount",
            })?,
            None => defaults.premium_fee,
        };

        let log_file = lookup("MICROLOAN_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let log_level = lookup("RUST_LOG").unwrap_or(defaults.log_level);

        let export_dir = lookup("MICROLOAN_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Ok(Config {
            annual_rate,
            premium_fee,
            log_file,
            log_level,
            export_dir,
        })
    }

    pub fn policy(&self) -> LoanPolicy {
        LoanPolicy {
            annual_rate: self.annual_rate,
            premium_fee: self.premium_fee,
        }
    }
}
