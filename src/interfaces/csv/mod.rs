pub mod batch_writer;
pub mod reference_reader;
