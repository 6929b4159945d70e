//! Human-readable rendering options
//!
//! Formatting never consults process-wide locale state. Callers build a
//! [`DisplayOptions`] (usually from the loaded config) and pass it to every
//! display function.

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// Options controlling how amounts and dates are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Symbol placed in front of currency amounts
    pub currency_symbol: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

impl DisplayOptions {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Renders `amount` as `<symbol><grouped integer>.<2 digits>`,
    /// e.g. `$5,000.00`. Negative amounts get a leading `-`.
    pub fn currency(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{}{}{}.{}",
            sign,
            self.currency_symbol,
            group_thousands(int_part),
            frac_part
        )
    }

    /// Renders the date part as `M/D/YYYY` without zero padding.
    pub fn short_date(&self, date: &NaiveDateTime) -> String {
        format!("{}/{}/{}", date.month(), date.day(), date.year())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
