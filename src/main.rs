use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payflow::application::wizard::PaymentWizard;
use payflow::domain::payment::PaymentMethod;
use payflow::domain::ports::RecordStoreBox;
use payflow::infrastructure::in_memory::InMemoryRecordStore;
use payflow::infrastructure::mock::{
    MockBatchSource, MockPaymentProcessor, MockReferenceValidator,
};
use payflow::infrastructure::secure_store::SecureStore;
use payflow::interfaces::csv::batch_writer::BatchWriter;
use payflow::interfaces::csv::reference_reader::ReferenceReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input references CSV file (header: reference)
    input: PathBuf,

    /// Service to pay for
    #[arg(long, default_value = "service1")]
    service: String,

    /// Payment method: card, direct-debit, bank or ussd
    #[arg(long, default_value = "card")]
    method: PaymentMethod,

    /// Simulated verification delay per reference, in milliseconds
    #[arg(long, default_value_t = 1000)]
    validation_delay_ms: u64,

    /// Path to persistent record database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store = SecureStore::new(records_store(&cli)?, Box::new(InMemoryRecordStore::new()));
    let mut wizard = PaymentWizard::new(
        store,
        Box::new(MockReferenceValidator::with_delay(Duration::from_millis(
            cli.validation_delay_ms,
        ))),
        Box::new(MockBatchSource),
        Box::new(MockPaymentProcessor),
    );

    wizard.select_service(&cli.service).into_diagnostic()?;

    // Feed references through the wizard; rejected or unverifiable entries
    // are reported and skipped, the rest of the file still goes through.
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = ReferenceReader::new(file);
    for reference in reader.references() {
        match reference {
            Ok(value) => match wizard.submit_reference(&value).await {
                Ok(true) => {}
                Ok(false) => eprintln!("Reference failed verification: {value}"),
                Err(error) if error.is_input_rejection() => {
                    eprintln!("Reference rejected: {error}");
                }
                Err(error) => return Err(error).into_diagnostic(),
            },
            Err(error) => eprintln!("Error reading reference: {error}"),
        }
    }

    wizard.save_references().await.into_diagnostic()?;
    wizard.load_batch().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BatchWriter::new(stdout.lock());
    writer.write_batch(wizard.batch()).into_diagnostic()?;

    wizard.proceed_to_payment().into_diagnostic()?;
    let confirmation = wizard.submit_payment(cli.method).await.into_diagnostic()?;
    println!("{}", confirmation.message);

    Ok(())
}

fn records_store(cli: &Cli) -> Result<RecordStoreBox> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(path) = &cli.db_path {
        let store =
            payflow::infrastructure::rocksdb::RocksDbRecordStore::open(path).into_diagnostic()?;
        return Ok(Box::new(store));
    }
    #[cfg(not(feature = "storage-rocksdb"))]
    let _ = cli;
    Ok(Box::new(InMemoryRecordStore::new()))
}
