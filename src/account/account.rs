//! Bank account record
//!
//! On-disk layout:
//!
//! ```text
//! [iban: string][owner: string][balance: decimal 16][bonus: f32 4][tier: string]
//! ```
//!
//! Balance and bonus points form the 20-byte mutable block. The tier tag is
//! fixed when the account is opened and never rewritten.

use std::fmt;
use std::io::{self, Read};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use super::errors::{AccountError, AccountResult};
use crate::display::DisplayOptions;
use crate::storage::{
    decode_decimal, decode_f32, decode_string, encode_decimal, encode_f32, encode_string,
    string_len, Record, DECIMAL_LEN,
};

/// Upper bound of bonus points.
pub const MAX_BONUS_POINTS: f32 = 100.0;

/// Amount a deposit or withdrawal is scaled against when earning points.
const EFFECTIVE_AMOUNT: f32 = 10_000.0;

/// Account tier, chosen from the opening balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Standard,
    Gold,
    Platinum,
}

impl Tier {
    /// Picks the tier for an opening balance:
    /// up to 1000 Standard, up to 5000 Gold, above that Platinum.
    pub fn for_balance(balance: Decimal) -> Self {
        if balance <= Decimal::from(1000) {
            Tier::Standard
        } else if balance <= Decimal::from(5000) {
            Tier::Gold
        } else {
            Tier::Platinum
        }
    }

    /// Weight of the account balance in bonus calculations.
    pub fn balance_value(self) -> u8 {
        match self {
            Tier::Standard => 1,
            Tier::Gold => 5,
            Tier::Platinum => 10,
        }
    }

    /// Extra weight a deposit earns on top of the balance weight.
    pub fn deposit_value(self) -> u8 {
        match self {
            Tier::Standard => 3,
            Tier::Gold => 4,
            Tier::Platinum => 5,
        }
    }

    /// Points earned by depositing `amount`.
    pub fn deposit_points(self, amount: Decimal) -> f32 {
        scaled(amount) * f32::from(self.balance_value() + self.deposit_value())
    }

    /// Points lost by withdrawing `amount`.
    pub fn withdrawal_points(self, amount: Decimal) -> f32 {
        scaled(amount) * f32::from(self.balance_value())
    }

    /// Discriminator written to disk.
    pub fn tag(self) -> &'static str {
        match self {
            Tier::Standard => "Standard",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Standard" => Some(Tier::Standard),
            "Gold" => Some(Tier::Gold),
            "Platinum" => Some(Tier::Platinum),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn scaled(amount: Decimal) -> f32 {
    amount.to_f32().unwrap_or_default() / EFFECTIVE_AMOUNT
}

/// Clamps to `[0, MAX_BONUS_POINTS]` and rounds to two decimals.
fn normalize_points(points: f32) -> f32 {
    let clamped = points.clamp(0.0, MAX_BONUS_POINTS);
    (clamped * 100.0).round() / 100.0
}

/// A bank account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    iban: String,
    owner: String,
    balance: Decimal,
    bonus_points: f32,
    tier: Tier,
}

impl Account {
    /// Builds an account from stored or caller-supplied values.
    ///
    /// # Errors
    ///
    /// `Validation` if the IBAN or owner is blank, or bonus points are
    /// outside `[0, 100]`.
    pub fn new(
        iban: impl Into<String>,
        owner: impl Into<String>,
        balance: Decimal,
        bonus_points: f32,
        tier: Tier,
    ) -> AccountResult<Self> {
        let iban = iban.into();
        let owner = owner.into();

        if iban.trim().is_empty() {
            return Err(AccountError::validation("IBAN must not be blank"));
        }
        if owner.trim().is_empty() {
            return Err(AccountError::validation("owner must not be blank"));
        }
        if !(0.0..=MAX_BONUS_POINTS).contains(&bonus_points) {
            return Err(AccountError::validation(format!(
                "bonus points must be between 0 and {}, got {}",
                MAX_BONUS_POINTS, bonus_points
            )));
        }

        Ok(Self {
            iban,
            owner,
            balance,
            bonus_points,
            tier,
        })
    }

    /// An empty account: zero balance, zero points.
    pub fn empty(iban: impl Into<String>, owner: impl Into<String>, tier: Tier) -> AccountResult<Self> {
        Self::new(iban, owner, Decimal::ZERO, 0.0, tier)
    }

    pub fn iban(&self) -> &str {
        &self.iban
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn bonus_points(&self) -> f32 {
        self.bonus_points
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Adds `amount` to the balance and earns deposit points.
    pub fn deposit(&mut self, amount: Decimal) -> AccountResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| AccountError::validation("balance overflow"))?;
        self.bonus_points = normalize_points(self.bonus_points + self.tier.deposit_points(amount));
        Ok(())
    }

    /// Takes `amount` from the balance and loses withdrawal points.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` if `amount` exceeds the balance; the account is
    /// left unchanged.
    pub fn withdraw(&mut self, amount: Decimal) -> AccountResult<()> {
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        self.bonus_points =
            normalize_points(self.bonus_points - self.tier.withdrawal_points(amount));
        Ok(())
    }

    /// Multi-line summary using explicit display options.
    pub fn describe(&self, options: &DisplayOptions) -> String {
        format!(
            "IBAN: {}\nOwner: {}\nBalance: {}\nBonus points: {}",
            self.iban,
            self.owner,
            options.currency(self.balance),
            self.bonus_points
        )
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&DisplayOptions::default()))
    }
}

fn invalid_data(e: impl fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

impl Record for Account {
    const KIND: &'static str = "account";
    const MUTABLE_LEN: usize = DECIMAL_LEN + 4;

    fn key(&self) -> &str {
        &self.iban
    }

    fn encoded_len(&self) -> usize {
        self.mutable_offset() + Self::MUTABLE_LEN + string_len(self.tier.tag())
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        encode_string(buf, &self.iban);
        encode_string(buf, &self.owner);
        self.encode_mutable(buf);
        encode_string(buf, self.tier.tag());
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let iban = decode_string(reader)?;
        let owner = decode_string(reader)?;
        let balance = decode_decimal(reader)?;
        let bonus_points = decode_f32(reader)?;
        let tag = decode_string(reader)?;

        let tier = Tier::from_tag(&tag)
            .ok_or_else(|| invalid_data(format!("Unknown account tier tag \"{}\"", tag)))?;
        Account::new(iban, owner, balance, bonus_points, tier).map_err(invalid_data)
    }

    fn mutable_offset(&self) -> usize {
        string_len(&self.iban) + string_len(&self.owner)
    }

    fn encode_mutable(&self, buf: &mut Vec<u8>) {
        encode_decimal(buf, self.balance);
        encode_f32(buf, self.bonus_points);
    }

    fn same_layout(&self, other: &Self) -> bool {
        self.iban == other.iban && self.owner == other.owner && self.tier == other.tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(Tier::for_balance(dec("50")), Tier::Standard);
        assert_eq!(Tier::for_balance(dec("1000")), Tier::Standard);
        assert_eq!(Tier::for_balance(dec("1000.01")), Tier::Gold);
        assert_eq!(Tier::for_balance(dec("5000")), Tier::Gold);
        assert_eq!(Tier::for_balance(dec("5000.01")), Tier::Platinum);
    }

    #[test]
    fn test_tier_tags() {
        for tier in [Tier::Standard, Tier::Gold, Tier::Platinum] {
            assert_eq!(Tier::from_tag(tier.tag()), Some(tier));
        }
        assert_eq!(Tier::from_tag("standard"), None);
        assert_eq!(Tier::from_tag("BankAccountSystem.GoldAccount"), None);
    }

    #[test]
    fn test_deposit_points_per_tier() {
        let mut standard = Account::empty("a", "Ann", Tier::Standard).unwrap();
        standard.deposit(dec("100")).unwrap();
        assert_eq!(standard.bonus_points(), 0.04);

        let mut gold = Account::empty("b", "Bob", Tier::Gold).unwrap();
        gold.deposit(dec("5000")).unwrap();
        assert_eq!(gold.bonus_points(), 4.5);

        let mut platinum = Account::empty("c", "Cid", Tier::Platinum).unwrap();
        platinum.deposit(dec("10000")).unwrap();
        assert_eq!(platinum.bonus_points(), 15.0);
    }

    #[test]
    fn test_withdrawal_points_and_floor() {
        let mut account = Account::empty("a", "Ann", Tier::Gold).unwrap();
        account.deposit(dec("2000")).unwrap();
        assert_eq!(account.bonus_points(), 1.8);

        account.withdraw(dec("1000")).unwrap();
        assert_eq!(account.balance(), dec("1000"));
        assert_eq!(account.bonus_points(), 1.3);

        account.withdraw(dec("1000")).unwrap();
        assert_eq!(account.bonus_points(), 0.8);
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_points_clamp_at_max() {
        let mut account = Account::empty("a", "Ann", Tier::Platinum).unwrap();
        account.deposit(dec("1000000")).unwrap();
        assert_eq!(account.bonus_points(), MAX_BONUS_POINTS);
    }

    #[test]
    fn test_points_never_negative() {
        let mut account = Account::new("a", "Ann", dec("500"), 0.0, Tier::Platinum).unwrap();
        account.withdraw(dec("500")).unwrap();
        assert_eq!(account.bonus_points(), 0.0);
    }

    #[test]
    fn test_overdraw_leaves_account_unchanged() {
        let mut account = Account::new("a", "Ann", dec("100"), 1.0, Tier::Standard).unwrap();
        let err = account.withdraw(dec("100.01")).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientFunds { .. }));
        assert_eq!(account.balance(), dec("100"));
        assert_eq!(account.bonus_points(), 1.0);
    }

    #[test]
    fn test_new_rejects_invalid_values() {
        assert!(Account::new(" ", "Ann", Decimal::ZERO, 0.0, Tier::Gold).is_err());
        assert!(Account::new("a", "", Decimal::ZERO, 0.0, Tier::Gold).is_err());
        assert!(Account::new("a", "Ann", Decimal::ZERO, -0.5, Tier::Gold).is_err());
        assert!(Account::new("a", "Ann", Decimal::ZERO, 100.5, Tier::Gold).is_err());
        assert!(Account::new("a", "Ann", Decimal::ZERO, f32::NAN, Tier::Gold).is_err());
    }

    #[test]
    fn test_record_layout() {
        let account = Account::new("IBAN1", "Jane Doe", dec("5000.00"), 4.5, Tier::Gold).unwrap();
        let bytes = account.encode();

        assert_eq!(bytes.len(), account.encoded_len());
        assert_eq!(account.encoded_len(), 6 + 9 + 16 + 4 + 5);
        assert_eq!(&bytes[..6], b"\x05IBAN1");
        assert_eq!(account.mutable_offset(), 15);
        assert_eq!(&bytes[bytes.len() - 5..], b"\x04Gold");

        let decoded = Account::decode(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(decoded, account);
        assert_eq!(decoded.balance().scale(), 2);
    }

    #[test]
    fn test_decode_rejects_unknown_tier() {
        let mut bytes = Vec::new();
        encode_string(&mut bytes, "IBAN1");
        encode_string(&mut bytes, "Jane");
        encode_decimal(&mut bytes, dec("10"));
        encode_f32(&mut bytes, 0.0);
        encode_string(&mut bytes, "Diamond");

        let err = Account::decode(&mut Cursor::new(&bytes)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_rejects_out_of_range_points() {
        let mut bytes = Vec::new();
        encode_string(&mut bytes, "IBAN1");
        encode_string(&mut bytes, "Jane");
        encode_decimal(&mut bytes, dec("10"));
        encode_f32(&mut bytes, 250.0);
        encode_string(&mut bytes, "Gold");

        let err = Account::decode(&mut Cursor::new(&bytes)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_same_layout_ignores_mutable_fields() {
        let a = Account::new("IBAN1", "Jane", dec("10"), 0.0, Tier::Standard).unwrap();
        let b = Account::new("IBAN1", "Jane", dec("99999.99"), 42.0, Tier::Standard).unwrap();
        let c = Account::new("IBAN1", "Janet", dec("10"), 0.0, Tier::Standard).unwrap();
        assert!(a.same_layout(&b));
        assert!(!a.same_layout(&c));
    }

    #[test]
    fn test_describe() {
        let account = Account::new("IBAN1", "Jane Doe", dec("5000"), 4.5, Tier::Gold).unwrap();
        assert_eq!(
            account.describe(&DisplayOptions::default()),
            "IBAN: IBAN1\nOwner: Jane Doe\nBalance: $5,000.00\nBonus points: 4.5"
        );
    }
}
