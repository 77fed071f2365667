use thiserror::Error;

use crate::application::wizard::WizardStep;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cryptographic operation failed")]
    Crypto,
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("reference must not be empty")]
    EmptyReference,
    #[error("no more than {0} references per batch")]
    ReferenceLimit(usize),
    #[error("reference already added: {0}")]
    DuplicateReference(String),
    #[error("no such reference entry: {0}")]
    UnknownReference(String),
    #[error("at least one verified reference is required")]
    NoVerifiedReferences,
    #[error("amount out of range: {0}")]
    InvalidAmount(rust_decimal::Decimal),
    #[error("missing data for this step, returning to {0}")]
    MissingPrerequisite(WizardStep),
}

impl PaymentError {
    /// True for rejected user input that left the wizard state untouched.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyReference
                | Self::ReferenceLimit(_)
                | Self::DuplicateReference(_)
                | Self::UnknownService(_)
                | Self::InvalidAmount(_)
        )
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, PaymentError>;
