pub mod csv_reader;
pub mod csv_writer;
pub mod error;

// Re-export commonly used types
pub use csv_reader::CsvRecordStream;
pub use csv_writer::{ReportWriter, write_report};
pub use error::IoError;
