//! Account persistence seam
//!
//! The bank talks to storage only through [`AccountStorage`]. The binary
//! record file is the production backend; [`MemoryAccountStore`] keeps the
//! same contract in a `Vec` for tests and dry runs.

use rust_decimal::Decimal;

use super::account::Account;
use crate::storage::{Record, RecordStore, StoreError, StoreResult};

/// Keyed account persistence.
pub trait AccountStorage {
    /// Stores a new account. `DuplicateKey` if the IBAN is taken.
    fn add_account(&mut self, account: &Account) -> StoreResult<()>;

    /// Loads the account with `iban`. `NotFound` if absent.
    fn get_account(&self, iban: &str) -> StoreResult<Account>;

    /// Deletes the account with `iban` and returns its final balance.
    fn remove_account(&mut self, iban: &str) -> StoreResult<Decimal>;

    /// Persists new balance and bonus points of an existing account.
    fn save_account(&mut self, account: &Account) -> StoreResult<()>;
}

impl AccountStorage for RecordStore<Account> {
    fn add_account(&mut self, account: &Account) -> StoreResult<()> {
        self.add(account)
    }

    fn get_account(&self, iban: &str) -> StoreResult<Account> {
        self.get(iban)
    }

    fn remove_account(&mut self, iban: &str) -> StoreResult<Decimal> {
        Ok(self.remove(iban)?.balance())
    }

    fn save_account(&mut self, account: &Account) -> StoreResult<()> {
        self.save(account)
    }
}

/// In-memory account storage, kept in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryAccountStore {
    accounts: Vec<Account>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    fn position(&self, iban: &str) -> StoreResult<usize> {
        self.accounts
            .iter()
            .position(|a| a.iban() == iban)
            .ok_or_else(|| StoreError::NotFound(iban.to_string()))
    }
}

impl AccountStorage for MemoryAccountStore {
    fn add_account(&mut self, account: &Account) -> StoreResult<()> {
        if self.accounts.iter().any(|a| a.iban() == account.iban()) {
            return Err(StoreError::DuplicateKey(account.iban().to_string()));
        }
        self.accounts.push(account.clone());
        Ok(())
    }

    fn get_account(&self, iban: &str) -> StoreResult<Account> {
        let idx = self.position(iban)?;
        Ok(self.accounts[idx].clone())
    }

    fn remove_account(&mut self, iban: &str) -> StoreResult<Decimal> {
        let idx = self.position(iban)?;
        Ok(self.accounts.remove(idx).balance())
    }

    fn save_account(&mut self, account: &Account) -> StoreResult<()> {
        let idx = self.position(account.iban())?;
        if !self.accounts[idx].same_layout(account) {
            return Err(StoreError::LayoutMismatch(account.iban().to_string()));
        }
        self.accounts[idx] = account.clone();
        Ok(())
    }
}
