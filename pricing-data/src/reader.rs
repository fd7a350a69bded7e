use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::cost_csv::{CostImport, CsvImportError, import_cost_data};

/// Reads all of `source` as UTF-8 text and decodes it as cost data.
///
/// # Errors
///
/// * [`CsvImportError::Read`] if the source fails or is not valid UTF-8.
/// * [`CsvImportError::Parse`] if the text holds no data.
pub async fn read_cost_data<R>(mut source: R) -> Result<CostImport, CsvImportError>
where
    R: AsyncRead + Unpin,
{
    let mut text = String::new();
    source.read_to_string(&mut text).await?;
    debug!(bytes = text.len(), "read cost data");
    import_cost_data(&text)
}

pub async fn read_cost_data_from_file(path: impl AsRef<Path>) -> Result<CostImport, CsvImportError> {
    let file = tokio::fs::File::open(path.as_ref()).await?;
    read_cost_data(file).await
}
