use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of the reference intake file.
#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    reference: String,
}

/// Reads transaction references from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<String>`. Whitespace is trimmed so hand-edited files work.
pub struct ReferenceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ReferenceReader<R> {
    /// Creates a new `ReferenceReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily yields the references in file order.
    pub fn references(self) -> impl Iterator<Item = Result<String>> {
        self.reader
            .into_deserialize::<ReferenceRecord>()
            .map(|result| {
                result
                    .map(|record| record.reference)
                    .map_err(PaymentError::from)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "reference\nTXN001\n TXN002 ";
        let reader = ReferenceReader::new(data.as_bytes());
        let references: Vec<Result<String>> = reader.references().collect();

        assert_eq!(references.len(), 2);
        assert_eq!(references[0].as_ref().unwrap(), "TXN001");
        assert_eq!(references[1].as_ref().unwrap(), "TXN002");
    }

    #[test]
    fn test_reader_missing_column() {
        let data = "id\nTXN001";
        let reader = ReferenceReader::new(data.as_bytes());
        let references: Vec<Result<String>> = reader.references().collect();

        assert!(references[0].is_err());
    }
}
