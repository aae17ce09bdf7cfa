//! Segment and gene range types.
//!
//! All ranges are 0-indexed and right-exclusive; a valid range has
//! `start < end`.

use serde::{Deserialize, Serialize};

use crate::{
    error::OncoRangesError,
    io::tsv::TsvConfig,
    traits::{GenericRange, GenomicRange, TsvSerialize},
    Position,
};

pub mod cursor;
pub mod vec;

/// One copy number measurement over a contiguous genomic interval of one
/// sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(alias = "DepMap_ID", alias = "ID", alias = "sample")]
    pub sample_id: String,
    #[serde(alias = "Chromosome", alias = "chrom", alias = "CONTIG")]
    pub chromosome: String,
    #[serde(alias = "Start", alias = "START")]
    pub start: Position,
    #[serde(alias = "End", alias = "END")]
    pub end: Position,
    #[serde(alias = "Segment_Mean", alias = "segment_mean", alias = "log2_ratio")]
    pub value: f64,
}

impl Segment {
    pub fn new(
        sample_id: &str,
        chromosome: &str,
        start: Position,
        end: Position,
        value: f64,
    ) -> Self {
        Self {
            sample_id: sample_id.to_string(),
            chromosome: chromosome.to_string(),
            start,
            end,
            value,
        }
    }

    /// Check that this segment is non-empty.
    pub fn validate(&self) -> Result<(), OncoRangesError> {
        validate_range(self.start, self.end)
    }
}

impl GenericRange for Segment {
    fn start(&self) -> Position {
        self.start
    }
    fn end(&self) -> Position {
        self.end
    }
}

impl GenomicRange for Segment {
    fn seqname(&self) -> &str {
        &self.chromosome
    }
}

impl TsvSerialize for Segment {
    fn to_tsv(&self, config: &TsvConfig) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.sample_id,
            self.chromosome,
            self.start,
            self.end,
            self.value.to_tsv(config)
        )
    }
}

/// A reference gene annotation, shared across all samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    #[serde(alias = "ensembl_id", alias = "gene")]
    pub gene_id: String,
    #[serde(default, alias = "Symbol", alias = "hugo_symbol")]
    pub symbol: Option<String>,
    #[serde(alias = "Chromosome", alias = "chrom")]
    pub chromosome: String,
    #[serde(alias = "Start")]
    pub start: Position,
    #[serde(alias = "End")]
    pub end: Position,
}

impl Gene {
    pub fn new(gene_id: &str, chromosome: &str, start: Position, end: Position) -> Self {
        Self {
            gene_id: gene_id.to_string(),
            symbol: None,
            chromosome: chromosome.to_string(),
            start,
            end,
        }
    }

    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(symbol.to_string());
        self
    }

    /// The output column label: `"<symbol> (<gene_id>)"`, or just the
    /// gene ID when there is no symbol.
    pub fn label(&self) -> String {
        match &self.symbol {
            Some(symbol) if !symbol.is_empty() => format!("{} ({})", symbol, self.gene_id),
            _ => self.gene_id.clone(),
        }
    }

    /// Check that this gene is non-empty; zero-length genes have no
    /// defined coverage.
    pub fn validate(&self) -> Result<(), OncoRangesError> {
        validate_range(self.start, self.end)
            .map_err(|_| OncoRangesError::InvalidGeneRange(self.gene_id.clone(), self.start, self.end))
    }
}

impl GenericRange for Gene {
    fn start(&self) -> Position {
        self.start
    }
    fn end(&self) -> Position {
        self.end
    }
}

impl GenomicRange for Gene {
    fn seqname(&self) -> &str {
        &self.chromosome
    }
}

/// Validates that a range is non-empty, i.e. `start < end`.
pub fn validate_range(start: Position, end: Position) -> Result<(), OncoRangesError> {
    if start >= end {
        return Err(OncoRangesError::InvalidGenomicRange(start, end));
    }
    Ok(())
}
