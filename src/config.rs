//! ledgerfile configuration
//!
//! Loaded from a JSON file. Every field is optional; missing fields take the
//! defaults below, and running without a config file is the same as loading
//! `{}`.
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "accounts_file": "accounts.bin",
//!   "books_file": "books.bin",
//!   "minimum_deposit": 50,
//!   "minimum_withdrawal": 10,
//!   "sync_writes": true,
//!   "currency_symbol": "$",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::BankRules;
use crate::display::DisplayOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        "LEDGER_CONFIG_ERROR"
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding both record files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,

    #[serde(default = "default_books_file")]
    pub books_file: String,

    #[serde(default = "default_minimum_deposit")]
    pub minimum_deposit: Decimal,

    #[serde(default = "default_minimum_withdrawal")]
    pub minimum_withdrawal: Decimal,

    /// fsync after every write
    #[serde(default = "default_true")]
    pub sync_writes: bool,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_accounts_file() -> String {
    "accounts.bin".to_string()
}
fn default_books_file() -> String {
    "books.bin".to_string()
}
fn default_minimum_deposit() -> Decimal {
    Decimal::from(50)
}
fn default_minimum_withdrawal() -> Decimal {
    Decimal::from(10)
}
fn default_true() -> bool {
    true
}
fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            accounts_file: default_accounts_file(),
            books_file: default_books_file(),
            minimum_deposit: default_minimum_deposit(),
            minimum_withdrawal: default_minimum_withdrawal(),
            sync_writes: default_true(),
            currency_symbol: default_currency_symbol(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.minimum_deposit <= Decimal::ZERO {
            return Err(ConfigError::Invalid("minimum_deposit must be > 0".into()));
        }
        if self.minimum_withdrawal <= Decimal::ZERO {
            return Err(ConfigError::Invalid("minimum_withdrawal must be > 0".into()));
        }
        for (name, value) in [
            ("accounts_file", &self.accounts_file),
            ("books_file", &self.books_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }
        if self.accounts_file == self.books_file {
            return Err(ConfigError::Invalid(format!(
                "accounts_file and books_file must differ, both are '{}'",
                self.accounts_file
            )));
        }
        Ok(())
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(&self.accounts_file)
    }

    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }

    pub fn bank_rules(&self) -> BankRules {
        BankRules {
            minimum_deposit: self.minimum_deposit,
            minimum_withdrawal: self.minimum_withdrawal,
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions::new(self.currency_symbol.clone())
    }
}
