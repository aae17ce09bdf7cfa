//! # oncoranges
//!
//! Data-wrangling utilities for cancer genomics: gene-level copy number
//! matrices from segments, segment hygiene, MAF record manipulation, and
//! RNA-seq QC and reshaping.

pub mod commands;
pub mod copynumber;
pub mod data;
pub mod error;
pub mod io;
pub mod matrix;
pub mod mutations;
pub mod ranges;
pub mod reporting;
pub mod rna;
pub mod test_utilities;
pub mod traits;

#[cfg(not(feature = "big-position"))]
pub type Position = u32;
#[cfg(feature = "big-position")]
pub type Position = u64;

/// The missing value sentinel used in all matrices.
pub const MISSING: f64 = f64::NAN;

/// Create an [`IndexMap`] of sequence names and their lengths.
///
/// [`IndexMap`]: indexmap::IndexMap
#[macro_export]
macro_rules! seqlens {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::indexmap::indexmap!($($key.to_string() => $value),*)
    };
}

// re-exported for the seqlens! macro.
#[doc(hidden)]
pub use indexmap;

pub mod prelude {
    pub use crate::copynumber::gaps::fill_segment_gaps;
    pub use crate::copynumber::gene_matrix::{aggregate_sample, to_gene_matrix, GeneMatrixConfig};
    pub use crate::data::operations::AggregationPolicy;
    pub use crate::error::OncoRangesError;
    pub use crate::io::file::read_seqlens;
    pub use crate::matrix::{GeneValueMatrix, LabeledMatrix};
    pub use crate::ranges::{Gene, Segment};
    pub use crate::traits::GenericRange;
    pub use crate::seqlens;
    pub use crate::MISSING;
}
