use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::sanitize::sanitize_string;

lazy_static! {
    /// Transaction references: alphanumeric plus hyphen/underscore, 6-20 chars.
    static ref REFERENCE_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]{6,20}$").unwrap();
    /// Service identifiers: non-empty lowercase alphanumeric/hyphen.
    static ref SERVICE_ID: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// Largest amount the wizard will carry into the payment step.
pub const MAX_AMOUNT: Decimal = dec!(999999.99);

/// Format check for a transaction reference, applied after sanitization.
pub fn is_valid_reference_id(id: &str) -> bool {
    REFERENCE_ID.is_match(&sanitize_string(id))
}

/// Format check for a service identifier, applied after sanitization.
pub fn is_valid_service_id(id: &str) -> bool {
    SERVICE_ID.is_match(&sanitize_string(id))
}

/// Range check for a monetary amount.
///
/// `Decimal` cannot be NaN or infinite, so the range is the whole rule.
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount >= Decimal::ZERO && amount <= MAX_AMOUNT
}
