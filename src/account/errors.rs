//! Account service error types
//!
//! Error codes:
//! - LEDGER_ACCOUNT_VALIDATION
//! - LEDGER_ACCOUNT_INSUFFICIENT_FUNDS
//! - store codes pass through unchanged

use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::StoreError;

/// Errors raised by account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A caller-supplied value breaks an account rule. Raised before any I/O.
    #[error("invalid account operation: {0}")]
    Validation(String),

    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AccountError::Validation(msg.into())
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::Validation(_) => "LEDGER_ACCOUNT_VALIDATION",
            AccountError::InsufficientFunds { .. } => "LEDGER_ACCOUNT_INSUFFICIENT_FUNDS",
            AccountError::Store(e) => e.code(),
        }
    }
}

pub type AccountResult<T> = Result<T, AccountError>;
