//! Folding splicing variant rows (`GENE.1`, `GENE.2`, ...) into gene rows.

use indexmap::IndexMap;
use log::debug;

use crate::{error::OncoRangesError, matrix::LabeledMatrix};

pub const DEFAULT_VARIANT_DELIM: &str = ".";

/// NaN-skipping element-wise sum of rows.
fn sum_rows(rows: &[Vec<f64>], width: usize) -> Vec<f64> {
    let mut total = vec![0.0; width];
    for row in rows {
        for (t, v) in total.iter_mut().zip(row) {
            if !v.is_nan() {
                *t += v;
            }
        }
    }
    total
}

/// Merge the rows of `matrix` named `GENE<delim>suffix` into `GENE`.
///
/// Variants are added to an existing `GENE` row; a lone variant is renamed
/// to `GENE`; several variants without a `GENE` row are summed into a new
/// one. Missing values count as zero in sums. Rows of the result are sorted by
/// name.
pub fn merge_splicing_variants(
    matrix: &LabeledMatrix,
    delim: &str,
) -> Result<LabeledMatrix, OncoRangesError> {
    let width = matrix.ncols();
    let mut genes: IndexMap<String, Vec<f64>> = IndexMap::new();
    let mut variants: IndexMap<String, Vec<Vec<f64>>> = IndexMap::new();

    for (row, label) in matrix.row_labels().enumerate() {
        let values = matrix.row(row).to_vec();
        match label.split_once(delim) {
            Some((gene, _)) => variants.entry(gene.to_string()).or_default().push(values),
            None => {
                genes.insert(label.clone(), values);
            }
        }
    }

    debug!(
        "merging splicing variants of {} genes into {} rows",
        variants.len(),
        matrix.nrows()
    );
    for (gene, mut rows) in variants {
        let merged = match genes.get(&gene) {
            Some(existing) => {
                rows.push(existing.clone());
                sum_rows(&rows, width)
            }
            None if rows.len() == 1 => rows.remove(0),
            None => sum_rows(&rows, width),
        };
        genes.insert(gene, merged);
    }
    genes.sort_keys();

    let mut merged = LabeledMatrix::filled(
        genes.keys().cloned().collect(),
        matrix.col_labels().cloned().collect(),
        f64::NAN,
    )?
    .with_index_name(&matrix.index_name);
    for (row, values) in genes.values().enumerate() {
        merged.set_row(row, values)?;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_merge_splicing_variants() {
        let labels = ["B.1", "A", "A.1", "C.1", "C.2", "A.2", "D"];
        let m = LabeledMatrix::new(
            labels.iter().map(|l| l.to_string()).collect(),
            vec!["s1".into(), "s2".into()],
            array![
                [1.0, 2.0],
                [10.0, 10.0],
                [1.0, 1.0],
                [3.0, f64::NAN],
                [4.0, 4.0],
                [2.0, 2.0],
                [7.0, 7.0]
            ],
        )
        .unwrap();
        let merged = merge_splicing_variants(&m, DEFAULT_VARIANT_DELIM).unwrap();

        let rows: Vec<&String> = merged.row_labels().collect();
        assert_eq!(rows, vec!["A", "B", "C", "D"]);
        // added into the existing gene row
        assert_eq!(merged.row(0).to_vec(), vec![13.0, 13.0]);
        // lone variant renamed
        assert_eq!(merged.row(1).to_vec(), vec![1.0, 2.0]);
        // several variants summed, missing as zero
        assert_eq!(merged.row(2).to_vec(), vec![7.0, 4.0]);
        assert_eq!(merged.row(3).to_vec(), vec![7.0, 7.0]);
    }
}
