use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;

use super::error::IoError;

/// Async stream of records deserialized from CSV input
///
/// The first row is read as a header and matched against the record's
/// field names. Fields are trimmed and rows may vary in length.
pub struct CsvRecordStream<T> {
    inner: Pin<Box<dyn Stream<Item = Result<T, IoError>> + Send>>,
}

impl<T> CsvRecordStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Create a new record stream from an async reader
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let csv_reader = AsyncReaderBuilder::new()
            .trim(csv_async::Trim::All)
            .flexible(true)
            .create_deserializer(reader);

        let stream = csv_reader
            .into_deserialize::<T>()
            .map(|result| result.map_err(IoError::from));

        Self {
            inner: Box::pin(stream),
        }
    }

    /// Create a new record stream from a file path
    ///
    /// Opens the file asynchronously and handles tokio-futures
    /// compatibility internally.
    ///
    /// # Example
    /// ```rust,ignore
    /// let signups = CsvRecordStream::<SignupRecord>::from_file("signups.csv").await?;
    /// ```
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self::new(file.compat()))
    }
}

impl<T> Stream for CsvRecordStream<T> {
    type Item = Result<T, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
