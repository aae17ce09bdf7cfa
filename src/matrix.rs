//! The [`LabeledMatrix`] type: a dense `f64` matrix with row and column labels.
//!
//! This is the common tabular output of the library: gene-level copy number
//! ([`GeneValueMatrix`], samples × genes), mutation matrices, RNA-seq QC
//! tables, and expression profiles. Missing values are NaN.

use indexmap::IndexMap;
use ndarray::{Array2, ArrayView1};
use std::io::Write;
use std::path::PathBuf;

use crate::{
    error::OncoRangesError,
    io::{
        tsv::{build_tsv_reader, parse_value, TsvConfig},
        OutputFile,
    },
    traits::TsvSerialize,
};

/// A samples × genes matrix of aggregated values.
pub type GeneValueMatrix = LabeledMatrix;

#[derive(Clone, Debug, PartialEq)]
pub struct LabeledMatrix {
    /// The label written above the row label column.
    pub index_name: String,
    rows: IndexMap<String, usize>,
    cols: IndexMap<String, usize>,
    values: Array2<f64>,
}

/// Build a label → position map, rejecting duplicates.
fn index_labels(labels: Vec<String>) -> Result<IndexMap<String, usize>, OncoRangesError> {
    let mut index = IndexMap::with_capacity(labels.len());
    for (i, label) in labels.into_iter().enumerate() {
        if index.contains_key(&label) {
            return Err(OncoRangesError::DuplicateLabel(label));
        }
        index.insert(label, i);
    }
    Ok(index)
}

impl LabeledMatrix {
    /// Create a new [`LabeledMatrix`] from labels and a values array of the
    /// matching shape.
    pub fn new(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, OncoRangesError> {
        if values.nrows() != row_labels.len() {
            return Err(OncoRangesError::DimensionMismatch {
                expected: row_labels.len(),
                got: values.nrows(),
            });
        }
        if values.ncols() != col_labels.len() {
            return Err(OncoRangesError::DimensionMismatch {
                expected: col_labels.len(),
                got: values.ncols(),
            });
        }
        Ok(Self {
            index_name: String::new(),
            rows: index_labels(row_labels)?,
            cols: index_labels(col_labels)?,
            values,
        })
    }

    /// Create a new [`LabeledMatrix`] with every entry set to `fill`.
    pub fn filled(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        fill: f64,
    ) -> Result<Self, OncoRangesError> {
        let values = Array2::from_elem((row_labels.len(), col_labels.len()), fill);
        Self::new(row_labels, col_labels, values)
    }

    /// Set the name of the row label column.
    pub fn with_index_name(mut self, name: &str) -> Self {
        self.index_name = name.to_string();
        self
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn row_labels(&self) -> impl Iterator<Item = &String> {
        self.rows.keys()
    }

    pub fn col_labels(&self) -> impl Iterator<Item = &String> {
        self.cols.keys()
    }

    pub fn row_label(&self, row: usize) -> Option<&str> {
        self.rows.get_index(row).map(|(label, _)| label.as_str())
    }

    pub fn col_label(&self, col: usize) -> Option<&str> {
        self.cols.get_index(col).map(|(label, _)| label.as_str())
    }

    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.rows.get(label).copied()
    }

    pub fn col_index(&self, label: &str) -> Option<usize> {
        self.cols.get(label).copied()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[[row, col]] = value
    }

    /// Get a value by row and column labels.
    pub fn get_by_label(&self, row: &str, col: &str) -> Option<f64> {
        Some(self.values[[self.row_index(row)?, self.col_index(col)?]])
    }

    /// Whether the value at (`row`, `col`) is the missing sentinel.
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.values[[row, col]].is_nan()
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    pub fn column(&self, col: usize) -> ArrayView1<'_, f64> {
        self.values.column(col)
    }

    /// Write `values` into row `row`.
    pub fn set_row(&mut self, row: usize, values: &[f64]) -> Result<(), OncoRangesError> {
        if values.len() != self.ncols() {
            return Err(OncoRangesError::DimensionMismatch {
                expected: self.ncols(),
                got: values.len(),
            });
        }
        self.values
            .row_mut(row)
            .iter_mut()
            .zip(values)
            .for_each(|(cell, value)| *cell = *value);
        Ok(())
    }

    /// A new matrix with only the given columns, in the given order.
    pub fn select_columns(&self, labels: &[String]) -> Result<Self, OncoRangesError> {
        let mut indices = Vec::with_capacity(labels.len());
        for label in labels {
            let col = self
                .col_index(label)
                .ok_or_else(|| OncoRangesError::MissingColumn(label.clone()))?;
            indices.push(col);
        }
        let values = self.values.select(ndarray::Axis(1), &indices);
        let mut selected = Self::new(self.rows.keys().cloned().collect(), labels.to_vec(), values)?;
        selected.index_name = self.index_name.clone();
        Ok(selected)
    }

    /// Write the matrix as a TSV with a header row.
    pub fn write_tsv(&self, output: &OutputFile, config: &TsvConfig) -> Result<(), OncoRangesError> {
        let mut writer = output.writer()?;
        let mut header = vec![self.index_name.clone()];
        header.extend(self.cols.keys().cloned());
        writeln!(writer, "{}", header.join("\t"))?;
        for (label, &row) in self.rows.iter() {
            let values: Vec<f64> = self.values.row(row).to_vec();
            writeln!(writer, "{}\t{}", label, values.to_tsv(config))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a matrix TSV: a header row of column labels (the first cell names
    /// the row label column), then one labeled row per line.
    pub fn read_tsv(filepath: impl Into<PathBuf>) -> Result<Self, OncoRangesError> {
        let filepath = filepath.into();
        let mut reader = build_tsv_reader(&filepath, true)?;
        let headers = reader.headers()?.clone();
        let mut header_iter = headers.iter();
        let index_name = header_iter
            .next()
            .ok_or_else(|| {
                OncoRangesError::InvalidMatrixFile(format!("{:?} has no header", filepath))
            })?
            .to_string();
        let col_labels: Vec<String> = header_iter.map(|s| s.to_string()).collect();

        let mut row_labels = Vec::new();
        let mut flat = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut cells = record.iter();
            let label = cells.next().unwrap_or_default().to_string();
            for cell in cells {
                flat.push(parse_value(cell)?);
            }
            row_labels.push(label);
        }
        let values = Array2::from_shape_vec((row_labels.len(), col_labels.len()), flat)
            .map_err(|e| OncoRangesError::InvalidMatrixFile(e.to_string()))?;
        Ok(Self::new(row_labels, col_labels, values)?.with_index_name(&index_name))
    }
}
