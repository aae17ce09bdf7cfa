//! The [`OncoRangesError`] `enum` definition and error messages.
//!
use crate::Position;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The [`OncoRangesError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum OncoRangesError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("TSV error: {0}")]
    CsvError(#[from] csv::Error),

    // File parsing related errors
    #[error("Integer parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Float parsing error: {0}")]
    ParseFloatError(#[from] ParseFloatError),
    #[error("Genome file is invalid: {0}")]
    InvalidGenomeFile(String),
    #[error("Matrix file is invalid: {0}")]
    InvalidMatrixFile(String),
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Could not parse allele counts '{0}'")]
    InvalidAlleleCounts(String),

    // Invalid genomic range errors
    #[error("Range invalid: start ({0}) must be less than end ({1})")]
    InvalidGenomicRange(Position, Position),
    #[error("Gene '{0}' has an invalid range: start ({1}) must be less than end ({2})")]
    InvalidGeneRange(String, Position, Position),
    #[error("Sequence name '{0}' is not in the genome file")]
    MissingSequence(String),

    // Segment structure errors
    #[error("Segments for sample '{sample}' on '{chromosome}' ran out before gene '{gene}' was covered")]
    SegmentsExhausted {
        sample: String,
        chromosome: String,
        gene: String,
    },
    #[error("Segment for sample '{sample}' on '{chromosome}' starts at {start}, before the previous segment ends ({prev_end})")]
    OverlappingSegments {
        sample: String,
        chromosome: String,
        start: Position,
        prev_end: Position,
    },

    // Table consistency errors
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Duplicate label '{0}'")]
    DuplicateLabel(String),
    #[error("QC metric '{0}' is missing from the metrics table")]
    MissingQcMetric(String),
    #[error("Unknown QC threshold '{0}'")]
    UnknownQcThreshold(String),
    #[error("Sample '{sample}' does not report the same genes as '{reference}' (gene '{gene}')")]
    InconsistentGeneSet {
        sample: String,
        reference: String,
        gene: String,
    },
    #[error("Gene label '{0}' appears more than once in the gene table")]
    DuplicateGeneLabel(String),
    #[error("Sample '{sample}' has a non-positive spike-in count ({count})")]
    NonPositiveCount { sample: String, count: f64 },

    // Command line tool related errors
    #[error("Command line argument error: {0}")]
    ArgumentError(#[from] clap::error::Error),
}
