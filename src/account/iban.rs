//! IBAN sources for newly opened accounts

use uuid::Uuid;

/// Produces the identifier of each new account.
pub trait IbanGenerator {
    fn next_iban(&mut self) -> String;
}

/// Random UUID v4 strings. The default for [`Bank`](super::Bank).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIbanGenerator;

impl IbanGenerator for UuidIbanGenerator {
    fn next_iban(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `{prefix}{n}` with `n` counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIbanGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIbanGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IbanGenerator for SequentialIbanGenerator {
    fn next_iban(&mut self) -> String {
        let iban = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        iban
    }
}
