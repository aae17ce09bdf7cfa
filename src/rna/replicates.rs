//! Matching expression profiles by correlation.
//!
//! Profiles are samples × genes [`LabeledMatrix`] tables. Correlations are
//! Pearson's r over the genes both tables share, in the order of the first
//! table.

use indexmap::IndexMap;
use log::{debug, info};

use crate::{data::operations::pearson, error::OncoRangesError, matrix::LabeledMatrix};

/// Correlations at or below this are reported as differences.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.99999999999999;

/// A correlation within this of 1 counts as a perfect match.
pub const PERFECT_MATCH_TOLERANCE: f64 = 1e-12;

fn shared_columns(a: &LabeledMatrix, b: &LabeledMatrix) -> Vec<String> {
    a.col_labels()
        .filter(|label| b.col_index(label).is_some())
        .cloned()
        .collect()
}

/// Restrict both tables to their shared genes.
fn align(
    a: &LabeledMatrix,
    b: &LabeledMatrix,
) -> Result<(LabeledMatrix, LabeledMatrix), OncoRangesError> {
    let shared = shared_columns(a, b);
    debug!("{} genes shared between profiles", shared.len());
    Ok((a.select_columns(&shared)?, b.select_columns(&shared)?))
}

/// The rows of `a` also in `b` whose correlation with their `b` counterpart
/// is below `min_similarity`, with that correlation.
pub fn differences_from_correlations(
    a: &LabeledMatrix,
    b: &LabeledMatrix,
    min_similarity: f64,
) -> Result<Vec<(String, f64)>, OncoRangesError> {
    let (a, b) = align(a, b)?;
    let mut differences = Vec::new();
    for (row, label) in a.row_labels().enumerate() {
        let other = match b.row_index(label) {
            Some(other) => other,
            None => {
                debug!("'{}' is not in the second table", label);
                continue;
            }
        };
        let r = pearson(&a.row(row).to_vec(), &b.row(other).to_vec());
        if r < min_similarity {
            differences.push((label.clone(), r));
        }
    }
    info!("found {} samples that did not match", differences.len());
    Ok(differences)
}

/// The replicates × reference table of correlations.
pub fn correlation_matrix(
    replicates: &LabeledMatrix,
    reference: &LabeledMatrix,
) -> Result<LabeledMatrix, OncoRangesError> {
    let (replicates, reference) = align(replicates, reference)?;
    let mut corr = LabeledMatrix::filled(
        replicates.row_labels().cloned().collect(),
        reference.row_labels().cloned().collect(),
        f64::NAN,
    )?;
    let reference_rows: Vec<Vec<f64>> = (0..reference.nrows())
        .map(|i| reference.row(i).to_vec())
        .collect();
    for i in 0..replicates.nrows() {
        let replicate = replicates.row(i).to_vec();
        for (j, profile) in reference_rows.iter().enumerate() {
            corr.set(i, j, pearson(&replicate, profile));
        }
    }
    Ok(corr)
}

/// The best-correlated reference profile of each replicate. Without
/// `closest`, only perfect matches are kept.
pub fn find_closest_matching(
    replicates: &LabeledMatrix,
    reference: &LabeledMatrix,
    closest: bool,
) -> Result<IndexMap<String, String>, OncoRangesError> {
    let corr = correlation_matrix(replicates, reference)?;
    let mut matches = IndexMap::new();
    for (i, replicate) in corr.row_labels().enumerate() {
        // first maximum wins; NaN correlations are never a match
        let best = corr
            .row(i)
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_nan())
            .fold(None, |best: Option<(usize, f64)>, (j, &r)| match best {
                Some((_, best_r)) if best_r >= r => best,
                _ => Some((j, r)),
            });
        if let Some((j, r)) = best {
            if closest || (1.0 - r).abs() <= PERFECT_MATCH_TOLERANCE {
                if let Some(label) = corr.col_label(j) {
                    matches.insert(replicate.clone(), label.to_string());
                }
            }
        }
    }
    Ok(matches)
}

/// How replicate annotations compare with perfect profile matches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplicateAnnotation {
    /// Replicates with no perfect match in the reference.
    pub not_in_dataset: Vec<String>,
    /// Replicates matched to a different sample than annotated:
    /// replicate → (annotated, matched).
    pub miss_annotated: IndexMap<String, (String, String)>,
    /// Matched replicates that have no annotation: replicate → matched.
    pub unmatched: IndexMap<String, String>,
}

/// Check the replicate → sample annotation `names` against perfect
/// correlation matches to the reference profiles.
pub fn find_miss_annotated_replicates(
    replicates: &LabeledMatrix,
    reference: &LabeledMatrix,
    names: &IndexMap<String, String>,
) -> Result<ReplicateAnnotation, OncoRangesError> {
    let matches = find_closest_matching(replicates, reference, false)?;
    let mut result = ReplicateAnnotation::default();
    for replicate in replicates.row_labels() {
        match (matches.get(replicate), names.get(replicate)) {
            (None, _) => result.not_in_dataset.push(replicate.clone()),
            (Some(matched), None) => {
                result.unmatched.insert(replicate.clone(), matched.clone());
            }
            (Some(matched), Some(annotated)) if matched != annotated => {
                result
                    .miss_annotated
                    .insert(replicate.clone(), (annotated.clone(), matched.clone()));
            }
            _ => {}
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labels(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| x.to_string()).collect()
    }

    fn reference() -> LabeledMatrix {
        LabeledMatrix::new(
            labels(&["A", "B"]),
            labels(&["g1", "g2", "g3", "g4"]),
            array![[1.0, 2.0, 3.0, 4.0], [4.0, 1.0, 3.0, 2.0]],
        )
        .unwrap()
    }

    fn replicates() -> LabeledMatrix {
        // r1 is A scaled, r2 is B shifted, r3 is noise; g5 is not shared
        LabeledMatrix::new(
            labels(&["r1", "r2", "r3"]),
            labels(&["g1", "g2", "g3", "g4", "g5"]),
            array![
                [2.0, 4.0, 6.0, 8.0, 100.0],
                [5.0, 2.0, 4.0, 3.0, -3.0],
                [1.0, 3.0, 1.0, 2.0, 0.0]
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_differences_from_correlations() {
        let a = LabeledMatrix::new(
            labels(&["A", "B", "C"]),
            labels(&["g1", "g2", "g3"]),
            array![[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [1.0, 1.0, 2.0]],
        )
        .unwrap();
        let b = LabeledMatrix::new(
            labels(&["A", "B"]),
            labels(&["g3", "g2", "g1"]),
            array![[3.0, 2.0, 1.0], [1.0, 2.0, 3.0]],
        )
        .unwrap();
        let diffs = differences_from_correlations(&a, &b, DEFAULT_MIN_SIMILARITY).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].0, "B");
        assert!((diffs[0].1 + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_closest_matching() {
        let perfect = find_closest_matching(&replicates(), &reference(), false).unwrap();
        assert_eq!(perfect.get("r1").map(String::as_str), Some("A"));
        assert_eq!(perfect.get("r2").map(String::as_str), Some("B"));
        assert!(perfect.get("r3").is_none());

        let closest = find_closest_matching(&replicates(), &reference(), true).unwrap();
        assert_eq!(closest.len(), 3);
    }

    #[test]
    fn test_correlation_matrix_shape() {
        let corr = correlation_matrix(&replicates(), &reference()).unwrap();
        assert_eq!((corr.nrows(), corr.ncols()), (3, 2));
        assert!((corr.get_by_label("r1", "A").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_miss_annotated_replicates() {
        let mut names = IndexMap::new();
        names.insert("r1".to_string(), "B".to_string());
        names.insert("r3".to_string(), "A".to_string());
        let result = find_miss_annotated_replicates(&replicates(), &reference(), &names).unwrap();
        assert_eq!(result.not_in_dataset, vec!["r3".to_string()]);
        assert_eq!(
            result.miss_annotated.get("r1"),
            Some(&("B".to_string(), "A".to_string()))
        );
        assert_eq!(result.unmatched.get("r2").map(String::as_str), Some("B"));
    }
}
