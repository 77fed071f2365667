/// A transaction reference submitted by the payer.
///
/// `key` identifies the entry within the active set for list operations;
/// `value` is the reference itself. The verification flags are flipped by the
/// wizard once the asynchronous check resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReference {
    pub key: String,
    pub value: String,
    pub is_valid: bool,
    pub is_validating: bool,
}

impl TransactionReference {
    /// A freshly submitted entry awaiting its verification verdict.
    pub fn pending(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_valid: false,
            is_validating: true,
        }
    }

    /// An entry restored from a later step; it was verified in a prior pass.
    pub fn restored(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_valid: true,
            is_validating: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_starts_unverified() {
        let entry = TransactionReference::pending("ref_1", "TXN001");
        assert!(!entry.is_valid);
        assert!(entry.is_validating);
    }

    #[test]
    fn test_restored_skips_verification() {
        let entry = TransactionReference::restored("restored_0_TXN001", "TXN001");
        assert!(entry.is_valid);
        assert!(!entry.is_validating);
    }
}
