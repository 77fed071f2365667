use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the payer settles the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Card,
    DirectDebit,
    BankTransfer,
    Ussd,
}

impl PaymentMethod {
    pub const ALL: &'static [PaymentMethod] = &[
        PaymentMethod::Card,
        PaymentMethod::DirectDebit,
        PaymentMethod::BankTransfer,
        PaymentMethod::Ussd,
    ];

    /// Human-readable name shown on receipts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::DirectDebit => "Direct Debit",
            Self::BankTransfer => "Bank Transfer",
            Self::Ussd => "USSD",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "direct-debit" => Ok(Self::DirectDebit),
            "bank" => Ok(Self::BankTransfer),
            "ussd" => Ok(Self::Ussd),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Receipt returned by the payment rail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentConfirmation {
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub message: String,
}
