//! Bank accounts
//!
//! - `account`: the account record, tiers and bonus-point rules
//! - `storage`: the persistence seam and its backends
//! - `iban`: identifier sources for new accounts
//! - `bank`: validated account operations

#[allow(clippy::module_inception)]
mod account;
mod bank;
mod errors;
mod iban;
mod storage;

pub use account::{Account, Tier, MAX_BONUS_POINTS};
pub use bank::{Bank, BankRules};
pub use errors::{AccountError, AccountResult};
pub use iban::{IbanGenerator, SequentialIbanGenerator, UuidIbanGenerator};
pub use storage::{AccountStorage, MemoryAccountStore};
