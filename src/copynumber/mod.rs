//! Copy number processing: gene-level aggregation of segments, segment gap
//! filling, and quality checks.

pub mod gaps;
pub mod gene_matrix;
pub mod qc;

pub use gaps::fill_segment_gaps;
pub use gene_matrix::{
    aggregate_sample, to_gene_matrix, to_gene_matrix_lenient, GeneIndex, GeneMatrixConfig,
};
pub use qc::{check_amount_of_segments, check_gene_change_across_all, segment_counts};
