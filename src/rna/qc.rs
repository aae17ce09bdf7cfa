//! RNA-SeQC based sample filtering.
//!
//! The input is an RNA-SeQC metrics table with one row per metric and one
//! column per sample. A sample fails if any of seventeen checks against
//! [`RnaQcThresholds`] fails; each failing sample is reported with the
//! outcome of every check.

use std::io::Write;

use log::{info, warn};

use crate::{
    error::OncoRangesError,
    io::{tsv::TsvConfig, OutputFile},
    matrix::LabeledMatrix,
    traits::TsvSerialize,
};

/// Thresholds for [`filter_rna_from_qc`]. Rates are fractions; `max_alt` is
/// relative to the total number of reads.
#[derive(Clone, Debug, PartialEq)]
pub struct RnaQcThresholds {
    pub min_mapping: f64,
    pub min_end_mapping: f64,
    pub min_efficiency: f64,
    pub max_end_mismatch: f64,
    pub max_mismatch: f64,
    pub min_high_quality: f64,
    pub min_exonic: f64,
    pub max_ambiguous: f64,
    pub min_splits: f64,
    pub max_alt: f64,
    pub max_chimeric: f64,
    pub min_reads: f64,
    pub min_length: f64,
    pub max_genes: f64,
    pub min_genes: f64,
}

impl Default for RnaQcThresholds {
    fn default() -> Self {
        Self {
            min_mapping: 0.8,
            min_end_mapping: 0.75,
            min_efficiency: 0.6,
            max_end_mismatch: 0.025,
            max_mismatch: 0.02,
            min_high_quality: 0.6,
            min_exonic: 0.6,
            max_ambiguous: 0.2,
            min_splits: 0.1,
            max_alt: 0.65,
            max_chimeric: 0.3,
            min_reads: 20_000_000.0,
            min_length: 80.0,
            max_genes: 35_000.0,
            min_genes: 10_000.0,
        }
    }
}

impl RnaQcThresholds {
    /// Override one threshold by name. Names are the field names, or the
    /// short RNA-SeQC tool names (`minmapping`, `maxchim`, ...).
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), OncoRangesError> {
        let field = match name {
            "min_mapping" | "minmapping" => &mut self.min_mapping,
            "min_end_mapping" | "minendmapping" => &mut self.min_end_mapping,
            "min_efficiency" | "minefficiency" => &mut self.min_efficiency,
            "max_end_mismatch" | "maxendmismatch" => &mut self.max_end_mismatch,
            "max_mismatch" | "maxmismatch" => &mut self.max_mismatch,
            "min_high_quality" | "minhighqual" => &mut self.min_high_quality,
            "min_exonic" | "minexon" => &mut self.min_exonic,
            "max_ambiguous" | "maxambiguous" => &mut self.max_ambiguous,
            "min_splits" | "minsplits" | "maxsplits" => &mut self.min_splits,
            "max_alt" | "maxalt" => &mut self.max_alt,
            "max_chimeric" | "maxchim" => &mut self.max_chimeric,
            "min_reads" | "minreads" => &mut self.min_reads,
            "min_length" | "minlength" => &mut self.min_length,
            "max_genes" | "maxgenes" => &mut self.max_genes,
            "min_genes" | "mingenes" => &mut self.min_genes,
            _ => return Err(OncoRangesError::UnknownQcThreshold(name.to_string())),
        };
        *field = value;
        Ok(())
    }

    /// Apply `name=value` overrides, as given on the command line.
    pub fn with_overrides(mut self, overrides: &[(String, f64)]) -> Result<Self, OncoRangesError> {
        for (name, value) in overrides {
            self.set(name, *value)?;
        }
        Ok(self)
    }
}

/// Parse a `name=value` threshold override.
pub fn parse_threshold_override(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", arg))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid threshold value '{}': {}", value, e))?;
    Ok((name.trim().to_string(), value))
}

/// The RNA-SeQC metrics the checks read.
pub const REQUIRED_METRICS: [&str; 16] = [
    "Mapping Rate",
    "Base Mismatch",
    "End 1 Mapping Rate",
    "End 2 Mapping Rate",
    "End 1 Mismatch Rate",
    "End 2 Mismatch Rate",
    "Expression Profiling Efficiency",
    "High Quality Rate",
    "Exonic Rate",
    "Ambiguous Alignment Rate",
    "Avg. Splits per Read",
    "Alternative Alignments",
    "Chimeric Alignment Rate",
    "Total Reads",
    "Read Length",
    "Genes Detected",
];

/// The names of the checks, in report column order.
pub const QC_CHECKS: [&str; 17] = [
    "Mapping Rate",
    "Base Mismatch",
    "End 1 Mapping Rate",
    "End 2 Mapping Rate",
    "End 1 Mismatch Rate",
    "End 2 Mismatch Rate",
    "Expression Profiling Efficiency",
    "High Quality Rate",
    "Exonic Rate",
    "Ambiguous Alignment Efficiency",
    "Avg. Splits per Read",
    "Alternative Alignments",
    "Chimeric Alignment Rate",
    "Total Reads",
    "Read Length",
    "Min Genes Detected",
    "Max Genes Detected",
];

/// A sample that failed at least one check.
#[derive(Clone, Debug, PartialEq)]
pub struct RnaQcFailure {
    pub sample: String,
    /// Whether each check of [`QC_CHECKS`] failed.
    pub failed: [bool; 17],
}

impl RnaQcFailure {
    /// The names of the failed checks.
    pub fn failed_checks(&self) -> Vec<&'static str> {
        QC_CHECKS
            .iter()
            .zip(self.failed.iter())
            .filter(|(_, &failed)| failed)
            .map(|(name, _)| *name)
            .collect()
    }
}

impl TsvSerialize for RnaQcFailure {
    fn to_tsv(&self, config: &TsvConfig) -> String {
        format!("{}\t{}", self.sample, self.failed.to_vec().to_tsv(config))
    }
}

/// Run the checks for one sample; `metric` looks up a metric value by name.
fn run_checks(metric: impl Fn(&str) -> f64, t: &RnaQcThresholds) -> [bool; 17] {
    let total_reads = metric("Total Reads");
    let genes = metric("Genes Detected");
    [
        metric("Mapping Rate") < t.min_mapping,
        metric("Base Mismatch") > t.max_mismatch,
        metric("End 1 Mapping Rate") < t.min_end_mapping,
        metric("End 2 Mapping Rate") < t.min_end_mapping,
        metric("End 1 Mismatch Rate") > t.max_end_mismatch,
        metric("End 2 Mismatch Rate") > t.max_end_mismatch,
        metric("Expression Profiling Efficiency") < t.min_efficiency,
        metric("High Quality Rate") < t.min_high_quality,
        metric("Exonic Rate") < t.min_exonic,
        metric("Ambiguous Alignment Rate") > t.max_ambiguous,
        metric("Avg. Splits per Read") < t.min_splits,
        metric("Alternative Alignments") > t.max_alt * total_reads,
        metric("Chimeric Alignment Rate") > t.max_chimeric,
        total_reads < t.min_reads,
        metric("Read Length") < t.min_length,
        genes < t.min_genes,
        genes > t.max_genes,
    ]
}

/// Find the samples of a metrics × samples RNA-SeQC table that fail any
/// check, in column order. A NaN metric never fails a check.
///
/// # Errors
/// Returns [`OncoRangesError::MissingQcMetric`] if a metric the checks need
/// is not a row of `metrics`.
pub fn filter_rna_from_qc(
    metrics: &LabeledMatrix,
    thresholds: &RnaQcThresholds,
) -> Result<Vec<RnaQcFailure>, OncoRangesError> {
    for name in REQUIRED_METRICS {
        if metrics.row_index(name).is_none() {
            return Err(OncoRangesError::MissingQcMetric(name.to_string()));
        }
    }

    let mut failures = Vec::new();
    for (col, sample) in metrics.col_labels().enumerate() {
        let metric = |name: &str| {
            metrics
                .row_index(name)
                .map_or(f64::NAN, |row| metrics.get(row, col))
        };
        let failed = run_checks(metric, thresholds);
        if failed.iter().any(|&f| f) {
            let failure = RnaQcFailure {
                sample: sample.clone(),
                failed,
            };
            warn!(
                "sample '{}' failed RNA QC: {}",
                sample,
                failure.failed_checks().join(", ")
            );
            failures.push(failure);
        }
    }
    info!(
        "{} of {} samples failed RNA QC",
        failures.len(),
        metrics.ncols()
    );
    Ok(failures)
}

/// Write failing samples as a TSV table with one 1/0 column per check.
pub fn write_qc_failures(
    failures: &[RnaQcFailure],
    output: &OutputFile,
    config: &TsvConfig,
) -> Result<(), OncoRangesError> {
    let mut writer = output.writer()?;
    writeln!(writer, "sample\t{}", QC_CHECKS.join("\t"))?;
    for failure in failures {
        writeln!(writer, "{}", failure.to_tsv(config))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::rnaseqc_metrics;

    #[test]
    fn test_threshold_overrides() {
        let mut t = RnaQcThresholds::default();
        t.set("maxchim", 0.5).unwrap();
        t.set("min_reads", 1e6).unwrap();
        assert_eq!(t.max_chimeric, 0.5);
        assert_eq!(t.min_reads, 1e6);
        assert!(matches!(
            t.set("nonsense", 1.0),
            Err(OncoRangesError::UnknownQcThreshold(_))
        ));

        assert_eq!(
            parse_threshold_override("minmapping=0.9").unwrap(),
            ("minmapping".to_string(), 0.9)
        );
        assert!(parse_threshold_override("minmapping").is_err());
        assert!(parse_threshold_override("minmapping=high").is_err());
    }

    #[test]
    fn test_passing_and_failing_samples() {
        // good, low mapping, too many alternative alignments
        let metrics = rnaseqc_metrics(&["good", "lowmap", "alt"], |sample, metric| {
            match (sample, metric) {
                ("lowmap", "Mapping Rate") => Some(0.5),
                ("alt", "Alternative Alignments") => Some(40_000_000.0),
                _ => None,
            }
        });
        let failures = filter_rna_from_qc(&metrics, &RnaQcThresholds::default()).unwrap();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].sample, "lowmap");
        assert_eq!(failures[0].failed_checks(), vec!["Mapping Rate"]);
        assert_eq!(failures[1].failed_checks(), vec!["Alternative Alignments"]);
    }

    #[test]
    fn test_low_splits_and_gene_bounds() {
        let metrics = rnaseqc_metrics(&["few_splits", "many_genes"], |sample, metric| {
            match (sample, metric) {
                ("few_splits", "Avg. Splits per Read") => Some(0.05),
                ("many_genes", "Genes Detected") => Some(40_000.0),
                _ => None,
            }
        });
        let failures = filter_rna_from_qc(&metrics, &RnaQcThresholds::default()).unwrap();
        assert_eq!(failures[0].failed_checks(), vec!["Avg. Splits per Read"]);
        assert_eq!(failures[1].failed_checks(), vec!["Max Genes Detected"]);
    }

    #[test]
    fn test_missing_metric() {
        let metrics = LabeledMatrix::filled(
            vec!["Mapping Rate".to_string()],
            vec!["s1".to_string()],
            0.9,
        )
        .unwrap();
        assert!(matches!(
            filter_rna_from_qc(&metrics, &RnaQcThresholds::default()),
            Err(OncoRangesError::MissingQcMetric(_))
        ));
    }
}
