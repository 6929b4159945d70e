//! Bank Service Tests
//!
//! Drives `Bank` over the binary record file and checks the persisted
//! state after each operation.

use std::fs;

use ledgerfile::account::{Account, AccountError, Bank, BankRules, SequentialIbanGenerator, Tier};
use ledgerfile::storage::{Record, RecordStore, StoreError};
use rust_decimal::Decimal;
use tempfile::TempDir;

fn file_bank(dir: &TempDir) -> Bank<RecordStore<Account>> {
    let store = RecordStore::open(dir.path().join("accounts.bin"))
        .unwrap()
        .with_sync(false);
    Bank::new(store)
}

#[test]
fn test_open_accounts_pick_tiers() {
    let temp_dir = TempDir::new().unwrap();
    let mut bank = file_bank(&temp_dir);

    let standard = bank.open_account("Ann", Decimal::from(1000)).unwrap();
    let gold = bank.open_account("Bob", Decimal::from(1001)).unwrap();
    let platinum = bank.open_account("Cid", Decimal::from(5001)).unwrap();

    assert_eq!(bank.account(&standard).unwrap().tier(), Tier::Standard);
    assert_eq!(bank.account(&gold).unwrap().tier(), Tier::Gold);
    assert_eq!(bank.account(&platinum).unwrap().tier(), Tier::Platinum);
    assert_ne!(standard, gold);
}

#[test]
fn test_operations_persist_across_instances() {
    let temp_dir = TempDir::new().unwrap();
    let iban = {
        let mut bank = file_bank(&temp_dir);
        let iban = bank.open_account("Jane Doe", Decimal::from(5000)).unwrap();
        bank.deposit(&iban, Decimal::from(5000)).unwrap();
        bank.withdraw(&iban, Decimal::from(2000)).unwrap();
        iban
    };

    let bank = file_bank(&temp_dir);
    let account = bank.account(&iban).unwrap();
    assert_eq!(account.balance(), Decimal::from(8000));
    // 4.5 + 4.5 - 1.0
    assert_eq!(account.bonus_points(), 8.0);
    assert_eq!(account.tier(), Tier::Gold);
}

#[test]
fn test_balance_updates_never_change_file_length() {
    let temp_dir = TempDir::new().unwrap();
    let mut bank = file_bank(&temp_dir);
    let first = bank.open_account("Ann", Decimal::from(100)).unwrap();
    bank.open_account("Bob", Decimal::from(200)).unwrap();
    let len = bank.storage().file_len().unwrap();

    for _ in 0..5 {
        bank.deposit(&first, Decimal::new(123_456, 2)).unwrap();
    }
    bank.withdraw(&first, Decimal::from(10)).unwrap();

    assert_eq!(bank.storage().file_len().unwrap(), len);
}

#[test]
fn test_rejected_operations_leave_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let mut bank = file_bank(&temp_dir);
    let iban = bank.open_account("Ann", Decimal::from(100)).unwrap();
    let before = fs::read(bank.storage().path()).unwrap();

    assert!(matches!(
        bank.deposit(&iban, Decimal::from(10)),
        Err(AccountError::Validation(_))
    ));
    assert!(matches!(
        bank.withdraw(&iban, Decimal::from(5)),
        Err(AccountError::Validation(_))
    ));
    assert!(matches!(
        bank.withdraw(&iban, Decimal::from(500)),
        Err(AccountError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        bank.open_account("Bob", Decimal::from(20)),
        Err(AccountError::Validation(_))
    ));

    assert_eq!(fs::read(bank.storage().path()).unwrap(), before);
}

#[test]
fn test_close_account_compacts_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut bank = file_bank(&temp_dir);
    let first = bank.open_account("Ann", Decimal::from(100)).unwrap();
    let second = bank.open_account("Bob", Decimal::from(5000)).unwrap();

    assert_eq!(bank.close_account(&first).unwrap(), Decimal::from(100));

    let remaining = bank.account(&second).unwrap();
    assert_eq!(
        bank.storage().file_len().unwrap(),
        remaining.encoded_len() as u64
    );
    assert!(matches!(
        bank.close_account(&first),
        Err(AccountError::Store(StoreError::NotFound(_)))
    ));
}

#[test]
fn test_configured_minimums() {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::open(temp_dir.path().join("accounts.bin"))
        .unwrap()
        .with_sync(false);
    let mut bank = Bank::with_rules(
        store,
        BankRules {
            minimum_deposit: Decimal::from(500),
            minimum_withdrawal: Decimal::from(100),
        },
    );

    assert!(bank.open_account("Ann", Decimal::from(499)).is_err());
    let iban = bank.open_account("Ann", Decimal::from(500)).unwrap();
    assert!(bank.withdraw(&iban, Decimal::from(99)).is_err());
    assert_eq!(
        bank.withdraw(&iban, Decimal::from(100)).unwrap(),
        Decimal::from(400)
    );
}

#[test]
fn test_sequential_ibans_over_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut bank = file_bank(&temp_dir).with_generator(SequentialIbanGenerator::new("IBAN"));

    assert_eq!(bank.open_account("Alice", Decimal::from(100)).unwrap(), "IBAN1");
    assert_eq!(bank.open_account("Bob", Decimal::from(5000)).unwrap(), "IBAN2");
    bank.close_account("IBAN1").unwrap();

    let store = bank.storage();
    assert!(!store.contains("IBAN1").unwrap());
    assert_eq!(store.get("IBAN2").unwrap().tier(), Tier::Gold);
}
