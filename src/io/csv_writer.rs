use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::IoError;
use crate::domain::SequencedOutcome;

const HEADER: [&str; 4] = ["seq", "valid", "error_count", "errors"];

/// CSV report sink that writes each row as soon as its outcome arrives
///
/// Columns are `seq,valid,error_count,errors`. `seq` is the input position
/// carried by the outcome, so rows stay attributable when outcomes arrive
/// out of order. `errors` joins every recorded error with `"; "`.
///
/// # Example
/// ```rust,ignore
/// let mut report = ReportWriter::new(tokio::io::stdout());
/// while let Some(outcome) = outcomes.next().await {
///     report.write(&outcome?).await?;
/// }
/// report.finish().await?;
/// ```
pub struct ReportWriter<W> {
    writer: W,
    header_written: bool,
}

impl<W> ReportWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Write one row, preceded by the header on the first call
    pub async fn write(&mut self, outcome: &SequencedOutcome) -> Result<(), IoError> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(Vec::new());
        if !self.header_written {
            csv_writer.write_record(HEADER)?;
        }

        let errors = outcome
            .outcome
            .errors()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");

        csv_writer.write_record([
            outcome.seq.to_string(),
            outcome.outcome.is_valid().to_string(),
            outcome.outcome.error_count().to_string(),
            errors,
        ])?;

        self.write_buffer(csv_writer).await?;
        self.header_written = true;
        Ok(())
    }

    /// Flush and hand back the writer; an empty report still gets its header
    pub async fn finish(mut self) -> Result<W, IoError> {
        if !self.header_written {
            let mut csv_writer = csv::WriterBuilder::new().from_writer(Vec::new());
            csv_writer.write_record(HEADER)?;
            self.write_buffer(csv_writer).await?;
        }

        self.writer.flush().await?;
        Ok(self.writer)
    }

    async fn write_buffer(&mut self, csv_writer: csv::Writer<Vec<u8>>) -> Result<(), IoError> {
        let buffer = csv_writer
            .into_inner()
            .map_err(|e| IoError::Io(e.into_error()))?;
        self.writer.write_all(&buffer).await?;
        Ok(())
    }
}

/// Write one CSV row per outcome, in the order given, then flush
pub async fn write_report<W>(outcomes: &[SequencedOutcome], writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut report = ReportWriter::new(writer);
    for outcome in outcomes {
        report.write(outcome).await?;
    }
    report.finish().await?;
    Ok(())
}
