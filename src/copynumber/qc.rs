//! Quality checks on segment tables and gene-level copy number.

use indexmap::IndexMap;
use log::{info, warn};

use crate::{
    data::operations::{median, nan_variance},
    matrix::LabeledMatrix,
    ranges::Segment,
};

/// Samples with more segments than this are flagged.
pub const DEFAULT_MAX_SEGMENTS: usize = 850;

/// Genes whose variance across samples is below this are flagged.
pub const DEFAULT_MIN_GENE_VARIANCE: f64 = 0.2;

/// The number of segments of each sample, in order of first appearance.
pub fn segment_counts(segments: &[Segment]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for segment in segments {
        *counts.entry(segment.sample_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Samples with more than `threshold` segments, which usually indicates a
/// noisy copy number call.
pub fn check_amount_of_segments(segments: &[Segment], threshold: usize) -> Vec<String> {
    let counts = segment_counts(segments);
    let mut amounts: Vec<f64> = counts.values().map(|&n| n as f64).collect();
    if let Some(median) = median(&mut amounts) {
        info!("median of {} segments per sample", median);
    }
    counts
        .into_iter()
        .filter(|(sample, count)| {
            let flagged = *count > threshold;
            if flagged {
                warn!("sample '{}' has {} segments (> {})", sample, count, threshold);
            }
            flagged
        })
        .map(|(sample, _)| sample)
        .collect()
}

/// Gene columns of `matrix` (samples × genes) whose sample variance is below
/// `threshold`. NaN values are skipped; a column with fewer than two finite
/// values is never flagged.
pub fn check_gene_change_across_all(matrix: &LabeledMatrix, threshold: f64) -> Vec<String> {
    matrix
        .col_labels()
        .enumerate()
        .filter_map(|(col, label)| {
            let values = matrix.column(col).to_vec();
            match nan_variance(&values, 1) {
                Some(variance) if variance < threshold => Some(label.clone()),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_check_amount_of_segments() {
        let mut segments = Vec::new();
        for i in 0..5 {
            segments.push(Segment::new("noisy", "1", i * 10, i * 10 + 10, 0.0));
        }
        segments.push(Segment::new("clean", "1", 0, 10, 0.0));

        let counts = segment_counts(&segments);
        assert_eq!(counts.get("noisy"), Some(&5));
        assert_eq!(counts.get_index(1), Some((&"clean".to_string(), &1)));
        assert_eq!(check_amount_of_segments(&segments, 4), vec!["noisy"]);
        assert!(check_amount_of_segments(&segments, 5).is_empty());
    }

    #[test]
    fn test_check_gene_change_across_all() {
        let m = LabeledMatrix::new(
            vec!["s1".into(), "s2".into(), "s3".into()],
            vec!["flat".into(), "varied".into(), "sparse".into()],
            array![
                [1.0, -2.0, f64::NAN],
                [1.1, 0.0, 1.0],
                [f64::NAN, 2.0, f64::NAN]
            ],
        )
        .unwrap();
        assert_eq!(check_gene_change_across_all(&m, 0.2), vec!["flat"]);
    }
}
