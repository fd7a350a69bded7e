//! Generic comma-separated table decoding.
//!
//! The format is deliberately simple: no quoting and no escaping. Every line
//! is split on commas, blank lines are ignored, and the first non-blank line
//! holds the column names.
//!
//! Rows whose column count differs from the header's are dropped rather than
//! reported as errors; [`CsvTable::skipped_rows`] says how many were lost.
//!
//! ```
//! use pricing_data::codec::{decode_csv, CsvValue};
//!
//! let table = decode_csv("Name,Amount\nFlour,1.20\nshort\n").unwrap();
//!
//! assert_eq!(table.rows().len(), 1);
//! assert_eq!(table.skipped_rows(), 1);
//! assert_eq!(table.records().next().unwrap().get("Name"), Some(&CsvValue::Text("Flour".into())));
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CsvCodecError {
    #[error("No data found in CSV")]
    NoData,

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(String),
}

/// A single cell after numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvValue {
    Number(Decimal),
    Text(String),
}

impl CsvValue {
    /// Trimmed cells that parse as a finite number become [`CsvValue::Number`];
    /// everything else, including empty cells, stays text.
    ///
    /// Numbers are held as [`Decimal`], so magnitudes beyond its range
    /// (about 7.9e28) or with more than 28 fractional digits that cannot be
    /// rounded in stay text and read as a missing amount.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Text(String::new());
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(trimmed.to_string()))
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Text form of the cell; numbers are rendered back to decimal text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(t) if t.is_empty())
    }
}

impl fmt::Display for CsvValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// Decoded table: header names plus rows of coerced values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<CsvValue>>,
    skipped_rows: usize,
}

impl CsvTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CsvValue>] {
        &self.rows
    }

    /// Number of data rows dropped for having the wrong column count.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Rows paired with their header names.
    pub fn records(&self) -> impl Iterator<Item = CsvRecord<'_>> {
        self.rows.iter().map(|values| CsvRecord {
            headers: &self.headers,
            values,
        })
    }
}

/// Borrowed view of one row that allows lookup by column name.
#[derive(Debug, Clone, Copy)]
pub struct CsvRecord<'a> {
    headers: &'a [String],
    values: &'a [CsvValue],
}

impl<'a> CsvRecord<'a> {
    pub fn get(
        &self,
        column: &str,
    ) -> Option<&'a CsvValue> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
    }

    /// Cell text, or an empty string when the column does not exist.
    pub fn text(
        &self,
        column: &str,
    ) -> String {
        self.get(column).map(CsvValue::to_text).unwrap_or_default()
    }

    pub fn decimal(
        &self,
        column: &str,
    ) -> Option<Decimal> {
        self.get(column).and_then(CsvValue::as_decimal)
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

/// Decodes comma-separated text into a [`CsvTable`].
///
/// # Errors
///
/// * [`CsvCodecError::NoData`] when the input has no non-blank line.
/// * [`CsvCodecError::Csv`] when the underlying reader fails (for example on
///   invalid UTF-8).
pub fn decode_csv(input: &str) -> Result<CsvTable, CsvCodecError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // column count is checked per row below
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut records = reader.records().filter(|result| match result {
        Ok(record) => !is_blank(record),
        Err(_) => true,
    });

    let headers: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(str::to_string).collect(),
        None => return Err(CsvCodecError::NoData),
    };

    let mut rows = Vec::new();
    let mut skipped_rows = 0;
    for result in records {
        let record = result?;
        if record.len() != headers.len() {
            skipped_rows += 1;
            continue;
        }
        rows.push(record.iter().map(CsvValue::parse).collect());
    }

    if skipped_rows > 0 {
        warn!(
            skipped_rows,
            expected_columns = headers.len(),
            "dropped CSV rows with mismatched column count"
        );
    }
    debug!(rows = rows.len(), columns = headers.len(), "decoded CSV");

    Ok(CsvTable {
        headers,
        rows,
        skipped_rows,
    })
}
