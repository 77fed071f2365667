use crate::domain::batch::{BatchRow, batch_total};
use crate::domain::payment::{PaymentConfirmation, PaymentMethod};
use crate::domain::ports::{BatchSourceBox, PaymentProcessorBox, ReferenceValidatorBox};
use crate::domain::reference::TransactionReference;
use crate::domain::sanitize::{sanitize_string, sanitize_value};
use crate::domain::service::{Service, find_service};
use crate::domain::validate::{is_valid_amount, is_valid_service_id};
use crate::error::{PaymentError, Result};
use crate::infrastructure::secure_store::SecureStore;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Most references a single batch will accept.
pub const MAX_REFERENCES: usize = 20;

/// Storage slots shared between steps.
const SELECTED_SERVICE_KEY: &str = "selectedServiceId";
const VALID_REFERENCES_KEY: &str = "validTransactionIds";
const BATCH_DATA_KEY: &str = "batchData";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    ServiceSelection,
    ReferenceEntry,
    BatchReview,
    Payment,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ServiceSelection => "service selection",
            Self::ReferenceEntry => "reference entry",
            Self::BatchReview => "batch review",
            Self::Payment => "payment",
        };
        f.write_str(name)
    }
}

/// Multi-step payment flow engine.
///
/// Each step mutates in-memory state through payer actions, then hands the
/// sanitized result to the secure store at the step boundary where the next
/// step picks it up. A step entered without its prerequisite state redirects
/// back to the step that produces it.
pub struct PaymentWizard {
    store: SecureStore,
    validator: ReferenceValidatorBox,
    batch_source: BatchSourceBox,
    processor: PaymentProcessorBox,
    step: WizardStep,
    service: Option<&'static Service>,
    references: Vec<TransactionReference>,
    next_reference_key: u64,
    batch: Vec<BatchRow>,
    search: String,
    selected_rows: HashSet<String>,
    payment_total: Option<Decimal>,
}

impl PaymentWizard {
    pub fn new(
        store: SecureStore,
        validator: ReferenceValidatorBox,
        batch_source: BatchSourceBox,
        processor: PaymentProcessorBox,
    ) -> Self {
        Self {
            store,
            validator,
            batch_source,
            processor,
            step: WizardStep::ServiceSelection,
            service: None,
            references: Vec::new(),
            next_reference_key: 0,
            batch: Vec::new(),
            search: String::new(),
            selected_rows: HashSet::new(),
            payment_total: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn service(&self) -> Option<&'static Service> {
        self.service
    }

    /// Access to the underlying secure store.
    pub fn store_mut(&mut self) -> &mut SecureStore {
        &mut self.store
    }

    /// Redirect target when a step is entered without its prerequisite state.
    fn redirect(&mut self, step: WizardStep) -> PaymentError {
        warn!(%step, "missing prerequisite state, redirecting");
        self.step = step;
        PaymentError::MissingPrerequisite(step)
    }

    /// Sanitizes and persists `value` under `key`, JSON-encoded.
    async fn put_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let sanitized = sanitize_value(serde_json::to_value(value)?);
        self.store.put(key, &serde_json::to_string(&sanitized)?).await
    }

    /// Loads and sanitizes the JSON value under `key`.
    ///
    /// A value that decodes but no longer matches the expected shape reads
    /// as missing, which sends the caller down the same redirect path as
    /// absent data.
    async fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
            warn!(key, "stored value is not JSON");
            return Ok(None);
        };
        match serde_json::from_value(sanitize_value(value)) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(_) => {
                warn!(key, "stored value has unexpected shape");
                Ok(None)
            }
        }
    }

    /// Step 1: choose the service the batch pays for.
    pub fn select_service(&mut self, id: &str) -> Result<()> {
        let id = sanitize_string(id);
        if !is_valid_service_id(&id) {
            return Err(PaymentError::UnknownService(id));
        }
        let service =
            find_service(&id).ok_or_else(|| PaymentError::UnknownService(id.clone()))?;
        self.service = Some(service);
        self.step = WizardStep::ReferenceEntry;
        info!(service = service.id, "service selected");
        Ok(())
    }

    /// Submits a reference for verification.
    ///
    /// The entry is inserted pending and [`resolve_reference`] applies the
    /// verification verdict. Rejected submissions leave the set untouched.
    ///
    /// [`resolve_reference`]: Self::resolve_reference
    pub fn add_reference(&mut self, input: &str) -> Result<String> {
        let value = input.trim().to_string();
        if value.is_empty() {
            return Err(PaymentError::EmptyReference);
        }
        if self.references.len() >= MAX_REFERENCES {
            return Err(PaymentError::ReferenceLimit(MAX_REFERENCES));
        }
        if self.references.iter().any(|entry| entry.value == value) {
            return Err(PaymentError::DuplicateReference(value));
        }
        let key = format!("ref_{}", self.next_reference_key);
        self.next_reference_key += 1;
        self.references
            .push(TransactionReference::pending(key.clone(), value));
        Ok(key)
    }

    /// Resolves the outstanding verification for the entry under `key`.
    ///
    /// The verdict is applied at most once; an already-resolved entry keeps
    /// its state and reports it back without another verification call.
    pub async fn resolve_reference(&mut self, key: &str) -> Result<bool> {
        let Some(position) = self.references.iter().position(|entry| entry.key == key) else {
            return Err(PaymentError::UnknownReference(key.to_string()));
        };
        if !self.references[position].is_validating {
            return Ok(self.references[position].is_valid);
        }
        let value = self.references[position].value.clone();
        let verdict = self.validator.validate(&value).await?;
        let entry = &mut self.references[position];
        entry.is_validating = false;
        entry.is_valid = verdict;
        if !verdict {
            warn!(reference = %value, "reference failed verification");
        }
        Ok(verdict)
    }

    /// Adds and immediately resolves a reference; the non-interactive path.
    pub async fn submit_reference(&mut self, input: &str) -> Result<bool> {
        let key = self.add_reference(input)?;
        self.resolve_reference(&key).await
    }

    /// Drops the entry under `key`; unknown keys are a no-op.
    pub fn remove_reference(&mut self, key: &str) {
        self.references.retain(|entry| entry.key != key);
    }

    pub fn references(&self) -> &[TransactionReference] {
        &self.references
    }

    pub fn valid_references(&self) -> Vec<&TransactionReference> {
        self.references.iter().filter(|entry| entry.is_valid).collect()
    }

    /// Whether the flow can advance to batch review.
    pub fn can_continue(&self) -> bool {
        self.references.iter().any(|entry| entry.is_valid)
    }

    /// Re-entry from batch review: the values were verified in a prior pass.
    pub fn restore_references(&mut self, values: &[String]) {
        self.references = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                TransactionReference::restored(format!("restored_{index}_{value}"), value.clone())
            })
            .collect();
        self.step = WizardStep::ReferenceEntry;
    }

    /// Step 2 boundary: persist the verified references and move to review.
    pub async fn save_references(&mut self) -> Result<()> {
        let valid: Vec<String> = self
            .references
            .iter()
            .filter(|entry| entry.is_valid)
            .map(|entry| entry.value.clone())
            .collect();
        if valid.is_empty() {
            return Err(PaymentError::NoVerifiedReferences);
        }
        let Some(service) = self.service else {
            return Err(self.redirect(WizardStep::ServiceSelection));
        };
        self.put_json(VALID_REFERENCES_KEY, &valid).await?;
        self.store.put(SELECTED_SERVICE_KEY, service.id).await?;
        self.step = WizardStep::BatchReview;
        info!(count = valid.len(), "references saved");
        Ok(())
    }

    /// Step 3 entry: load prior-step output and ensure a batch exists.
    ///
    /// The stored batch is reused only while its row count still matches the
    /// reference count; any mismatch regenerates from scratch, discarding
    /// prior rows.
    pub async fn load_batch(&mut self) -> Result<()> {
        let references: Vec<String> = match self.get_json(VALID_REFERENCES_KEY).await? {
            Some(references) => references,
            None => return Err(self.redirect(WizardStep::ReferenceEntry)),
        };
        if references.is_empty() {
            return Err(self.redirect(WizardStep::ReferenceEntry));
        }
        let stored: Option<Vec<BatchRow>> = self.get_json(BATCH_DATA_KEY).await?;
        self.batch = match stored {
            Some(rows) if rows.len() == references.len() => {
                debug!(rows = rows.len(), "reusing stored batch");
                rows
            }
            _ => {
                let rows = self.batch_source.generate(&references).await?;
                self.put_json(BATCH_DATA_KEY, &rows).await?;
                info!(rows = rows.len(), "generated batch");
                rows
            }
        };
        self.search.clear();
        self.selected_rows.clear();
        self.step = WizardStep::BatchReview;
        Ok(())
    }

    pub fn batch(&self) -> &[BatchRow] {
        &self.batch
    }

    /// Review-table filter; an empty term shows everything.
    pub fn set_search(&mut self, term: &str) {
        self.search = sanitize_string(term);
    }

    /// Rows matching the current search term: case-insensitive on the
    /// reference and customer name, substring on the displayed figures.
    pub fn filtered_rows(&self) -> Vec<&BatchRow> {
        if self.search.is_empty() {
            return self.batch.iter().collect();
        }
        let needle = self.search.to_lowercase();
        self.batch
            .iter()
            .filter(|row| {
                row.reference_id.to_lowercase().contains(&needle)
                    || row.customer_name.to_lowercase().contains(&needle)
                    || row.application_fee.to_string().contains(&self.search)
                    || row.charges.to_string().contains(&self.search)
                    || row.sub_total.to_string().contains(&self.search)
            })
            .collect()
    }

    /// Sum of `sub_total` over the rows currently visible.
    pub fn total(&self) -> Decimal {
        batch_total(self.filtered_rows())
    }

    pub fn select_row(&mut self, row_id: &str, selected: bool) {
        if selected {
            self.selected_rows.insert(row_id.to_string());
        } else {
            self.selected_rows.remove(row_id);
        }
    }

    /// Selects or clears every currently visible row.
    pub fn select_all(&mut self, selected: bool) {
        if selected {
            self.selected_rows = self
                .filtered_rows()
                .iter()
                .map(|row| row.id.clone())
                .collect();
        } else {
            self.selected_rows.clear();
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected_rows.len()
    }

    /// Drops the selected rows and persists what is left.
    pub async fn delete_selected(&mut self) -> Result<usize> {
        let before = self.batch.len();
        let selected = std::mem::take(&mut self.selected_rows);
        self.batch.retain(|row| !selected.contains(&row.id));
        let deleted = before - self.batch.len();
        let rows = self.batch.clone();
        self.put_json(BATCH_DATA_KEY, &rows).await?;
        info!(deleted, "deleted selected rows");
        Ok(deleted)
    }

    /// Step 3 boundary: carry the visible total into payment.
    pub fn proceed_to_payment(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Err(self.redirect(WizardStep::ReferenceEntry));
        }
        let total = self.total();
        if !is_valid_amount(total) {
            return Err(PaymentError::InvalidAmount(total));
        }
        self.payment_total = Some(total);
        self.step = WizardStep::Payment;
        Ok(())
    }

    /// Step 4 entry: the carried total, or a recomputation from the stored
    /// batch when the step is entered cold.
    pub async fn load_payment_amount(&mut self) -> Result<Decimal> {
        if let Some(total) = self.payment_total
            && is_valid_amount(total)
        {
            self.step = WizardStep::Payment;
            return Ok(total);
        }
        let rows: Vec<BatchRow> = match self.get_json(BATCH_DATA_KEY).await? {
            Some(rows) => rows,
            None => return Err(self.redirect(WizardStep::ReferenceEntry)),
        };
        let total = batch_total(&rows);
        if total == Decimal::ZERO {
            return Err(self.redirect(WizardStep::BatchReview));
        }
        self.payment_total = Some(total);
        self.step = WizardStep::Payment;
        Ok(total)
    }

    /// The service identifier persisted at the reference-entry boundary.
    pub async fn stored_service_id(&mut self) -> Result<Option<String>> {
        self.store.get(SELECTED_SERVICE_KEY).await
    }

    /// Final step: hand the total to the payment rail.
    pub async fn submit_payment(&mut self, method: PaymentMethod) -> Result<PaymentConfirmation> {
        let amount = match self.payment_total {
            Some(amount) => amount,
            None => self.load_payment_amount().await?,
        };
        let confirmation = self.processor.submit(method, amount).await?;
        info!(%amount, method = method.display_name(), "payment submitted");
        Ok(confirmation)
    }

    /// Clears all persisted and in-memory state back to the first step.
    pub async fn reset(&mut self) -> Result<()> {
        self.store.clear().await?;
        self.service = None;
        self.references.clear();
        self.batch.clear();
        self.search.clear();
        self.selected_rows.clear();
        self.payment_total = None;
        self.step = WizardStep::ServiceSelection;
        Ok(())
    }
}
