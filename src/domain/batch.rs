use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One reviewed transaction in the payment batch.
///
/// `sub_total` is derived from the fee components and never supplied by the
/// caller; field names in the serialized form match the stored batch records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    pub id: String,
    pub reference_id: String,
    pub customer_name: String,
    pub application_fee: Decimal,
    pub charges: Decimal,
    pub sub_total: Decimal,
}

impl BatchRow {
    pub fn new(
        id: impl Into<String>,
        reference_id: impl Into<String>,
        customer_name: impl Into<String>,
        application_fee: Decimal,
        charges: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            reference_id: reference_id.into(),
            customer_name: customer_name.into(),
            application_fee,
            charges,
            sub_total: application_fee + charges,
        }
    }
}

/// Sum of `sub_total` over `rows`.
pub fn batch_total<'a>(rows: impl IntoIterator<Item = &'a BatchRow>) -> Decimal {
    rows.into_iter().map(|row| row.sub_total).sum()
}
