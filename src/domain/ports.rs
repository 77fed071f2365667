use super::batch::BatchRow;
use super::payment::{PaymentConfirmation, PaymentMethod};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::io;

/// Key/value storage medium underneath the secure store.
///
/// Implementations model browser storage areas: a persistent one for
/// encrypted records and a session-scoped one for key material. Values are
/// opaque strings; namespacing is the caller's concern.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, key: &str) -> io::Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> io::Result<()>;
    async fn remove(&self, key: &str) -> io::Result<()>;
    async fn keys(&self) -> io::Result<Vec<String>>;
}

/// Remote verification of a submitted transaction reference.
#[async_trait]
pub trait ReferenceValidator: Send + Sync {
    async fn validate(&self, reference: &str) -> io::Result<bool>;
}

/// Authoritative billing data for a set of verified references.
#[async_trait]
pub trait BatchSource: Send + Sync {
    async fn generate(&self, references: &[String]) -> io::Result<Vec<BatchRow>>;
}

/// The payment rail the final submission goes to.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn submit(
        &self,
        method: PaymentMethod,
        amount: Decimal,
    ) -> io::Result<PaymentConfirmation>;
}

pub type RecordStoreBox = Box<dyn RecordStore>;
pub type ReferenceValidatorBox = Box<dyn ReferenceValidator>;
pub type BatchSourceBox = Box<dyn BatchSource>;
pub type PaymentProcessorBox = Box<dyn PaymentProcessor>;
