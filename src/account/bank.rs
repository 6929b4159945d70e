//! Bank service
//!
//! Validates amounts, applies them to an [`Account`] and persists the result
//! through an [`AccountStorage`]. Every rule check happens before storage is
//! touched.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::account::{Account, Tier};
use super::errors::{AccountError, AccountResult};
use super::iban::{IbanGenerator, UuidIbanGenerator};
use super::storage::AccountStorage;

/// Amount limits enforced by the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankRules {
    pub minimum_deposit: Decimal,
    pub minimum_withdrawal: Decimal,
}

impl Default for BankRules {
    fn default() -> Self {
        Self {
            minimum_deposit: Decimal::from(50),
            minimum_withdrawal: Decimal::from(10),
        }
    }
}

/// Account operations over a storage backend.
///
/// New IBANs come from `G`, random UUIDs unless replaced with
/// [`Bank::with_generator`].
pub struct Bank<S, G = UuidIbanGenerator> {
    storage: S,
    rules: BankRules,
    ibans: G,
}

impl<S: AccountStorage> Bank<S> {
    /// Creates a bank with the default minimums (deposit 50, withdrawal 10).
    pub fn new(storage: S) -> Self {
        Self::with_rules(storage, BankRules::default())
    }

    pub fn with_rules(storage: S, rules: BankRules) -> Self {
        Self {
            storage,
            rules,
            ibans: UuidIbanGenerator,
        }
    }
}

impl<S: AccountStorage, G: IbanGenerator> Bank<S, G> {
    /// Replaces the IBAN source.
    pub fn with_generator<H: IbanGenerator>(self, ibans: H) -> Bank<S, H> {
        Bank {
            storage: self.storage,
            rules: self.rules,
            ibans,
        }
    }

    pub fn rules(&self) -> &BankRules {
        &self.rules
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn check_deposit(&self, amount: Decimal) -> AccountResult<()> {
        if amount < self.rules.minimum_deposit {
            return Err(AccountError::validation(format!(
                "minimum deposit amount is {}, got {}",
                self.rules.minimum_deposit, amount
            )));
        }
        Ok(())
    }

    fn check_withdrawal(&self, amount: Decimal) -> AccountResult<()> {
        if amount < self.rules.minimum_withdrawal {
            return Err(AccountError::validation(format!(
                "minimum withdrawal amount is {}, got {}",
                self.rules.minimum_withdrawal, amount
            )));
        }
        Ok(())
    }

    /// Opens an account for `holder` funded with `start_balance`.
    ///
    /// The tier is picked from `start_balance`; the account starts empty and
    /// receives the start balance as its first deposit. Returns the new IBAN.
    pub fn open_account(&mut self, holder: &str, start_balance: Decimal) -> AccountResult<String> {
        if holder.trim().is_empty() {
            return Err(AccountError::validation("holder must not be blank"));
        }
        self.check_deposit(start_balance)?;

        let tier = Tier::for_balance(start_balance);
        let mut account = Account::empty(self.ibans.next_iban(), holder, tier)?;
        account.deposit(start_balance)?;
        self.storage.add_account(&account)?;

        info!(
            iban = account.iban(),
            tier = %tier,
            balance = %account.balance(),
            "account opened"
        );
        Ok(account.iban().to_string())
    }

    /// Deposits `amount` and returns the new balance.
    pub fn deposit(&mut self, iban: &str, amount: Decimal) -> AccountResult<Decimal> {
        self.check_deposit(amount)?;

        let mut account = self.storage.get_account(iban)?;
        account.deposit(amount)?;
        self.storage.save_account(&account)?;

        info!(iban, amount = %amount, balance = %account.balance(), "deposit made");
        Ok(account.balance())
    }

    /// Withdraws `amount` and returns the new balance.
    pub fn withdraw(&mut self, iban: &str, amount: Decimal) -> AccountResult<Decimal> {
        self.check_withdrawal(amount)?;

        let mut account = self.storage.get_account(iban)?;
        account.withdraw(amount)?;
        self.storage.save_account(&account)?;

        info!(iban, amount = %amount, balance = %account.balance(), "withdrawal made");
        Ok(account.balance())
    }

    /// Closes the account and returns its final balance.
    pub fn close_account(&mut self, iban: &str) -> AccountResult<Decimal> {
        let balance = self.storage.remove_account(iban)?;
        info!(iban, balance = %balance, "account closed");
        Ok(balance)
    }

    pub fn account(&self, iban: &str) -> AccountResult<Account> {
        debug!(iban, "account lookup");
        Ok(self.storage.get_account(iban)?)
    }
}
