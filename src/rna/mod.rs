//! RNA-seq utilities: RNA-SeQC filtering, replicate matching, splicing
//! variant merging, count reshaping, and fusion names.

pub mod counts;
pub mod fusion;
pub mod qc;
pub mod replicates;
pub mod splicing;

pub use counts::{collapse_counts, read_slamdunk_counts, spike_in_scales, CollapsedCounts, SlamdunkRecord};
pub use fusion::rename_fusion_gene;
pub use qc::{filter_rna_from_qc, RnaQcFailure, RnaQcThresholds};
pub use replicates::{
    correlation_matrix, differences_from_correlations, find_closest_matching,
    find_miss_annotated_replicates, ReplicateAnnotation,
};
pub use splicing::merge_splicing_variants;
