use crate::domain::batch::{BatchRow, batch_total};
use crate::error::Result;
use std::io::Write;

/// Writes the reviewed batch as CSV, followed by a total row.
pub struct BatchWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BatchWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(target),
        }
    }

    pub fn write_batch(&mut self, rows: &[BatchRow]) -> Result<()> {
        self.writer.write_record([
            "reference_id",
            "customer_name",
            "application_fee",
            "charges",
            "sub_total",
        ])?;
        for row in rows {
            let application_fee = row.application_fee.to_string();
            let charges = row.charges.to_string();
            let sub_total = row.sub_total.to_string();
            self.writer.write_record([
                row.reference_id.as_str(),
                row.customer_name.as_str(),
                application_fee.as_str(),
                charges.as_str(),
                sub_total.as_str(),
            ])?;
        }
        let total = batch_total(rows).to_string();
        self.writer
            .write_record(["total", "", "", "", total.as_str()])?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_batch_with_total_row() {
        let rows = vec![
            BatchRow::new("batch_0_TXN001", "TXN001", "Aisha Bello", dec!(1500), dec!(300)),
            BatchRow::new("batch_1_TXN002", "TXN002", "Sani Musa", dec!(500), dec!(100)),
        ];

        let mut output = Vec::new();
        BatchWriter::new(&mut output).write_batch(&rows).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "reference_id,customer_name,application_fee,charges,sub_total"
        );
        assert_eq!(lines[1], "TXN001,Aisha Bello,1500,300,1800");
        assert_eq!(lines[2], "TXN002,Sani Musa,500,100,600");
        assert_eq!(lines[3], "total,,,,2400");
    }
}
