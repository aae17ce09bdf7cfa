//! Essential TSV parsing and serializing functionality, which wraps the
//! [`csv`] crate's deserialization method using [`serde`].

use csv::{DeserializeRecordsIntoIter, Reader, ReaderBuilder};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

use super::file::InputFile;
use crate::error::OncoRangesError;

lazy_static! {
    /// The standard matrix TSV configuration, following R/pandas.
    pub static ref MATRIX_TSV: TsvConfig = TsvConfig {
        no_value_string: "NA".to_string(),
    };
}

/// Strings read as a missing value.
pub const MISSING_VALUE_STRINGS: [&str; 5] = ["", "NA", "NaN", "nan", "."];

/// This is an extensible type to handle common
/// TSV output configurations, e.g. what to print
/// for a missing value.
pub struct TsvConfig {
    pub no_value_string: String,
}

/// Parse a numeric cell, mapping the usual missing value strings to NaN.
pub fn parse_value(cell: &str) -> Result<f64, OncoRangesError> {
    let cell = cell.trim();
    if MISSING_VALUE_STRINGS.contains(&cell) {
        return Ok(f64::NAN);
    }
    Ok(cell.parse::<f64>()?)
}

/// Build a TSV reader which ignores comment lines and works on
/// gzip-compressed files.
pub fn build_tsv_reader(
    filepath: impl Into<PathBuf>,
    has_headers: bool,
) -> Result<Reader<Box<dyn Read>>, OncoRangesError> {
    let stream = InputFile::new(filepath).raw_reader()?;
    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .comment(Some(b'#'))
        .flexible(false)
        .from_reader(stream);
    Ok(reader)
}

/// An iterator over the records of a headered TSV file, deserialized into `T`
/// by column name.
pub struct TsvRecordIterator<T> {
    inner: DeserializeRecordsIntoIter<Box<dyn Read>, T>,
}

impl<T> std::fmt::Debug for TsvRecordIterator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsvRecordIterator").finish_non_exhaustive()
    }
}

impl<T> TsvRecordIterator<T>
where
    for<'de> T: Deserialize<'de>,
{
    /// Create a new TSV reader. Lines beginning with `'#'` are skipped, and the
    /// first remaining line is the column header.
    pub fn new(filepath: impl Into<PathBuf>) -> Result<Self, OncoRangesError> {
        let reader = build_tsv_reader(filepath, true)?;
        let inner = reader.into_deserialize();
        Ok(Self { inner })
    }
}

impl<T> Iterator for TsvRecordIterator<T>
where
    for<'de> T: Deserialize<'de>,
{
    type Item = Result<T, OncoRangesError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|res| res.map_err(OncoRangesError::from))
    }
}
