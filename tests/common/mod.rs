use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn write_references_csv(path: &Path, references: &[&str]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["reference"])?;
    for reference in references {
        wtr.write_record([*reference])?;
    }

    wtr.flush()?;
    Ok(())
}
