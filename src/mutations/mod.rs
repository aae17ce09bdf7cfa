//! Mutation annotation (MAF) records: sample × gene matrices, merging of
//! annotation sets, and allele count filters.

pub mod filters;
pub mod maf;

pub use filters::{filter_allelic_fraction, filter_coverage, AlleleCounts, AlleleSide};
pub use maf::{find_conflicts, maf_to_matrix, merge_annotations, Conflict, ConflictPolicy, MafRecord};
