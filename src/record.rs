// 👤 Customer Record - one row of the customer book
//
// Account number is the identity, everything else is a value captured at
// creation time. Records are never mutated once persisted.

use serde::{Deserialize, Serialize};

/// A single bank customer.
///
/// The PIN is kept in plain text. The store does no hashing or masking, so
/// anything that renders records must decide for itself what to hide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Unique within a store (enforced on insert only)
    pub account_number: String,

    pub name: String,

    pub pin: String,

    /// Any finite value, negatives included
    pub balance: f64,
}

impl CustomerRecord {
    pub fn new(
        account_number: impl Into<String>,
        name: impl Into<String>,
        pin: impl Into<String>,
        balance: f64,
    ) -> Self {
        CustomerRecord {
            account_number: account_number.into(),
            name: name.into(),
            pin: pin.into(),
            balance,
        }
    }

    /// Line shown in customer listings: account, name and a two-decimal balance.
    pub fn display_line(&self, currency_symbol: &str) -> String {
        format!(
            "{} | {} | {}{:.2}",
            self.account_number, self.name, currency_symbol, self.balance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_line_two_decimals() {
        let record = CustomerRecord::new("001", "Alice", "1234", 100.0);
        assert_eq!(record.display_line("$"), "001 | Alice | $100.00");
    }

    #[test]
    fn test_display_line_keeps_sign() {
        let record = CustomerRecord::new("007", "Bond", "0070", -12.5);
        assert_eq!(record.display_line("€"), "007 | Bond | €-12.50");
    }

    #[test]
    fn test_display_line_never_shows_pin() {
        let record = CustomerRecord::new("002", "Bob", "9999", 1.0);
        assert!(!record.display_line("$").contains("9999"));
    }
}
