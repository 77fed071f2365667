//! Application layer containing the wizard flow orchestration.
//!
//! This module defines the `PaymentWizard` which walks a payer through
//! service selection, reference entry, batch review and payment, keeping
//! cross-step state in the secure store.

pub mod wizard;
