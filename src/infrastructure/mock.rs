//! Mock collaborators standing in for the external services the wizard
//! consumes: reference verification, billing data and the payment rail.

use crate::domain::batch::BatchRow;
use crate::domain::payment::{PaymentConfirmation, PaymentMethod};
use crate::domain::ports::{BatchSource, PaymentProcessor, ReferenceValidator};
use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use std::io;
use std::time::Duration;

/// Stand-in for the remote reference-verification API.
///
/// Accepts any reference longer than three characters after a fixed delay.
pub struct MockReferenceValidator {
    delay: Duration,
}

impl MockReferenceValidator {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_secs(1))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockReferenceValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReferenceValidator for MockReferenceValidator {
    async fn validate(&self, reference: &str) -> io::Result<bool> {
        tokio::time::sleep(self.delay).await;
        Ok(reference.len() > 3)
    }
}

/// Customer names assigned to generated rows.
const CUSTOMER_NAMES: &[&str] = &[
    "Adebayo Johnson",
    "Fatima Mohammed",
    "Chinedu Okafor",
    "Aisha Bello",
    "Emeka Nwosu",
    "Kemi Adeleke",
    "Ibrahim Yakubu",
    "Ngozi Okoro",
    "Musa Abdullahi",
    "Folake Adeyemi",
    "Usman Garba",
    "Chioma Eze",
    "Ahmed Hassan",
    "Funmi Oladele",
    "Sani Musa",
    "Blessing Udo",
];

/// Stand-in for the authoritative billing data source.
///
/// Fees and charges are whole-unit amounts drawn uniformly from fixed ranges;
/// names are picked at random from a fixed list.
#[derive(Default)]
pub struct MockBatchSource;

#[async_trait]
impl BatchSource for MockBatchSource {
    async fn generate(&self, references: &[String]) -> io::Result<Vec<BatchRow>> {
        let mut rng = rand::thread_rng();
        Ok(references
            .iter()
            .enumerate()
            .map(|(index, reference)| {
                let application_fee = Decimal::from(rng.gen_range(500..=2000));
                let charges = Decimal::from(rng.gen_range(100..=800));
                let customer = CUSTOMER_NAMES[rng.gen_range(0..CUSTOMER_NAMES.len())];
                BatchRow::new(
                    format!("batch_{index}_{reference}"),
                    reference.clone(),
                    customer,
                    application_fee,
                    charges,
                )
            })
            .collect())
    }
}

/// Stand-in for the payment rail: confirms without settling anything.
#[derive(Default)]
pub struct MockPaymentProcessor;

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn submit(
        &self,
        method: PaymentMethod,
        amount: Decimal,
    ) -> io::Result<PaymentConfirmation> {
        Ok(PaymentConfirmation {
            method,
            amount,
            message: format!("Processing payment of {amount} via {method}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_validator_verdict_by_length() {
        let validator = MockReferenceValidator::with_delay(Duration::ZERO);
        assert!(validator.validate("TXN001").await.unwrap());
        assert!(!validator.validate("AB").await.unwrap());
    }

    #[tokio::test]
    async fn test_batch_rows_follow_references() {
        let references: Vec<String> = ["TXN001", "TXN002", "TXN003"]
            .iter()
            .map(|r| r.to_string())
            .collect();
        let rows = MockBatchSource.generate(&references).await.unwrap();

        assert_eq!(rows.len(), 3);
        for (index, row) in rows.iter().enumerate() {
            assert_eq!(row.reference_id, references[index]);
            assert_eq!(row.id, format!("batch_{index}_{}", references[index]));
            assert_eq!(row.sub_total, row.application_fee + row.charges);
            assert!(row.application_fee >= dec!(500) && row.application_fee <= dec!(2000));
            assert!(row.charges >= dec!(100) && row.charges <= dec!(800));
            assert!(CUSTOMER_NAMES.contains(&row.customer_name.as_str()));
        }
    }

    #[tokio::test]
    async fn test_processor_confirms() {
        let confirmation = MockPaymentProcessor
            .submit(PaymentMethod::Card, dec!(3800))
            .await
            .unwrap();
        assert_eq!(confirmation.amount, dec!(3800));
        assert_eq!(confirmation.message, "Processing payment of 3800 via Card");
    }
}
