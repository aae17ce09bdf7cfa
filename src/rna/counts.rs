//! Count table reshaping: SLAM-seq per-sample count files collapsed into
//! gene × sample matrices, and spike-in scaling factors.

use std::collections::HashSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;

use crate::{
    data::operations::nan_variance,
    error::OncoRangesError,
    io::TsvRecordIterator,
    matrix::LabeledMatrix,
};

pub const DEFAULT_MIN_TC_VARIANCE: f64 = 0.0;
pub const DEFAULT_MIN_READ_COUNT: f64 = 5.0;

/// One row of a SLAM-DUNK count file. A gene may span several rows (one per
/// UTR), which are summed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SlamdunkRecord {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "ReadCount")]
    pub read_count: f64,
    #[serde(alias = "TcReadCount")]
    pub tc_read_count: f64,
}

impl SlamdunkRecord {
    pub fn new(name: &str, read_count: f64, tc_read_count: f64) -> Self {
        Self {
            name: name.to_string(),
            read_count,
            tc_read_count,
        }
    }
}

/// Read a SLAM-DUNK count TSV; other columns are ignored.
pub fn read_slamdunk_counts(
    filepath: impl Into<PathBuf>,
) -> Result<Vec<SlamdunkRecord>, OncoRangesError> {
    TsvRecordIterator::<SlamdunkRecord>::new(filepath)?.collect()
}

/// Read and T>C read counts, genes × samples.
#[derive(Clone, Debug)]
pub struct CollapsedCounts {
    pub read_counts: LabeledMatrix,
    pub tc_counts: LabeledMatrix,
}

/// Sum each sample's records by gene into genes × samples matrices.
///
/// Genes are in order of first appearance in the first sample. A gene is
/// kept when the variance (ddof 0) of its T>C counts across samples is at
/// least `min_tc_variance` and its largest read count is at least
/// `min_read_count`.
///
/// # Errors
/// Every sample must report the same set of genes as the first sample;
/// otherwise an [`OncoRangesError::InconsistentGeneSet`] error naming a gene
/// reported by only one of them is returned.
pub fn collapse_counts(
    samples: &IndexMap<String, Vec<SlamdunkRecord>>,
    min_tc_variance: f64,
    min_read_count: f64,
) -> Result<CollapsedCounts, OncoRangesError> {
    if let Some((reference, first)) = samples.first() {
        let expected = gene_names(first);
        for (sample, records) in samples.iter().skip(1) {
            let names = gene_names(records);
            let unshared = records
                .iter()
                .map(|r| r.name.as_str())
                .find(|gene| !expected.contains(gene))
                .or_else(|| {
                    first
                        .iter()
                        .map(|r| r.name.as_str())
                        .find(|gene| !names.contains(gene))
                });
            if let Some(gene) = unshared {
                return Err(OncoRangesError::InconsistentGeneSet {
                    sample: sample.clone(),
                    reference: reference.clone(),
                    gene: gene.to_string(),
                });
            }
        }
    }

    let mut genes: IndexMap<&str, (Vec<f64>, Vec<f64>)> = IndexMap::new();
    let n = samples.len();
    for (i, records) in samples.values().enumerate() {
        for record in records {
            let (reads, tc) = genes
                .entry(record.name.as_str())
                .or_insert_with(|| (vec![0.0; n], vec![0.0; n]));
            reads[i] += record.read_count;
            tc[i] += record.tc_read_count;
        }
    }

    let total = genes.len();
    genes.retain(|_, (reads, tc)| {
        let variance = nan_variance(tc, 0).unwrap_or(0.0);
        let max_reads = reads.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        variance >= min_tc_variance && max_reads >= min_read_count
    });
    info!("kept {} of {} genes", genes.len(), total);

    let gene_labels: Vec<String> = genes.keys().map(|g| g.to_string()).collect();
    let sample_labels: Vec<String> = samples.keys().cloned().collect();
    let mut read_counts =
        LabeledMatrix::filled(gene_labels.clone(), sample_labels.clone(), 0.0)?.with_index_name("Name");
    let mut tc_counts = LabeledMatrix::filled(gene_labels, sample_labels, 0.0)?.with_index_name("Name");
    for (row, (reads, tc)) in genes.values().enumerate() {
        read_counts.set_row(row, reads)?;
        tc_counts.set_row(row, tc)?;
    }
    Ok(CollapsedCounts {
        read_counts,
        tc_counts,
    })
}

fn gene_names(records: &[SlamdunkRecord]) -> HashSet<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

/// Per-sample scaling factors from spike-in read counts:
/// `min(mapped) / mapped`.
///
/// # Errors
/// Every count must be positive (and not NaN); otherwise an
/// [`OncoRangesError::NonPositiveCount`] error is returned.
pub fn spike_in_scales(
    mapped: &IndexMap<String, f64>,
) -> Result<IndexMap<String, f64>, OncoRangesError> {
    if let Some((sample, &count)) = mapped.iter().find(|(_, count)| count.is_nan() || **count <= 0.0) {
        return Err(OncoRangesError::NonPositiveCount {
            sample: sample.clone(),
            count,
        });
    }
    let min = mapped.values().copied().fold(f64::INFINITY, f64::min);
    debug!("smallest spike-in count: {}", min);
    Ok(mapped
        .iter()
        .map(|(sample, &count)| (sample.clone(), min / count))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::temp_file_with;

    fn samples() -> IndexMap<String, Vec<SlamdunkRecord>> {
        let mut samples = IndexMap::new();
        samples.insert(
            "t0".to_string(),
            vec![
                SlamdunkRecord::new("1017", 10.0, 1.0),
                SlamdunkRecord::new("1017", 5.0, 1.0),
                SlamdunkRecord::new("4609", 2.0, 0.0),
                SlamdunkRecord::new("7157", 30.0, 3.0),
            ],
        );
        samples.insert(
            "t1".to_string(),
            vec![
                SlamdunkRecord::new("7157", 20.0, 9.0),
                SlamdunkRecord::new("1017", 12.0, 6.0),
                SlamdunkRecord::new("4609", 3.0, 0.0),
            ],
        );
        samples
    }

    #[test]
    fn test_collapse_counts() {
        let counts = collapse_counts(&samples(), DEFAULT_MIN_TC_VARIANCE, DEFAULT_MIN_READ_COUNT).unwrap();
        // 4609 never reaches five reads; the last gene is kept
        let genes: Vec<&String> = counts.read_counts.row_labels().collect();
        assert_eq!(genes, vec!["1017", "7157"]);
        assert_eq!(counts.read_counts.get_by_label("1017", "t0"), Some(15.0));
        assert_eq!(counts.tc_counts.get_by_label("7157", "t1"), Some(9.0));
    }

    #[test]
    fn test_collapse_counts_variance_filter() {
        let counts = collapse_counts(&samples(), 5.0, 0.0).unwrap();
        // T>C variances: 1017 -> 4, 4609 -> 0, 7157 -> 9
        let genes: Vec<&String> = counts.tc_counts.row_labels().collect();
        assert_eq!(genes, vec!["7157"]);
    }

    #[test]
    fn test_inconsistent_gene_set() {
        let mut samples = samples();
        samples
            .get_mut("t1")
            .unwrap()
            .push(SlamdunkRecord::new("999", 1.0, 1.0));
        match collapse_counts(&samples, 0.0, 0.0) {
            Err(OncoRangesError::InconsistentGeneSet { sample, reference, gene }) => {
                assert_eq!((sample.as_str(), reference.as_str(), gene.as_str()), ("t1", "t0", "999"));
            }
            other => panic!("expected an inconsistent gene set, got {:?}", other),
        }
    }

    #[test]
    fn test_same_size_different_gene_sets() {
        let mut samples = IndexMap::new();
        samples.insert(
            "t0".to_string(),
            vec![SlamdunkRecord::new("a", 10.0, 1.0), SlamdunkRecord::new("b", 10.0, 1.0)],
        );
        samples.insert(
            "t1".to_string(),
            vec![SlamdunkRecord::new("a", 10.0, 1.0), SlamdunkRecord::new("c", 10.0, 1.0)],
        );
        match collapse_counts(&samples, 0.0, 0.0) {
            Err(OncoRangesError::InconsistentGeneSet { sample, gene, .. }) => {
                assert_eq!(sample, "t1");
                assert_eq!(gene, "c");
            }
            other => panic!("expected an inconsistent gene set, got {:?}", other),
        }

        // a sample missing one of the first sample's genes
        samples.get_mut("t1").unwrap().pop();
        assert!(matches!(
            collapse_counts(&samples, 0.0, 0.0),
            Err(OncoRangesError::InconsistentGeneSet { gene, .. }) if gene == "b"
        ));
    }

    #[test]
    fn test_read_slamdunk_counts() {
        let file = temp_file_with(
            "# slamdunk v0.4.3\n\
             Chromosome\tStart\tEnd\tName\tLength\tStrand\tReadCount\tTcReadCount\n\
             chr1\t100\t200\t1017\t100\t+\t10\t2\n",
        );
        let records = read_slamdunk_counts(file.path()).unwrap();
        assert_eq!(records, vec![SlamdunkRecord::new("1017", 10.0, 2.0)]);
    }

    #[test]
    fn test_spike_in_scales() {
        let mut mapped = IndexMap::new();
        mapped.insert("a".to_string(), 100.0);
        mapped.insert("b".to_string(), 400.0);
        let scales = spike_in_scales(&mapped).unwrap();
        assert_eq!(scales.get("a"), Some(&1.0));
        assert_eq!(scales.get("b"), Some(&0.25));
    }

    #[test]
    fn test_spike_in_scales_rejects_zero() {
        let mut mapped = IndexMap::new();
        mapped.insert("a".to_string(), 100.0);
        mapped.insert("empty".to_string(), 0.0);
        assert!(matches!(
            spike_in_scales(&mapped),
            Err(OncoRangesError::NonPositiveCount { sample, .. }) if sample == "empty"
        ));
    }
}
