//! Test cases and test utility functions.
//!

use std::io::Write;

use rand::{seq::index::sample, thread_rng, Rng};
use tempfile::NamedTempFile;

use crate::{
    matrix::LabeledMatrix,
    ranges::{Gene, Segment},
    rna::qc::REQUIRED_METRICS,
    Position,
};

// gene length
pub const MIN_LEN: Position = 1;
pub const MAX_LEN: Position = 10000;

// number of chromosome sequences
pub const NCHROM: usize = 22;

// chromosome length used for random cohorts
pub const CHROM_LEN: Position = 10_000_000;

/// Write `contents` to a new temporary file.
pub fn temp_file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("could not create temporary file");
    file.write_all(contents.as_bytes())
        .expect("could not write temporary file");
    file
}

/// Build a random range start/end on a sequence of `chrom_len`.
/// 0-indexed, right exclusive
pub fn random_range(chrom_len: Position) -> (Position, Position) {
    let mut rng = thread_rng();
    let len = rng.gen_range(MIN_LEN..MAX_LEN);
    let start = rng.gen_range(0..chrom_len - len + 1);
    (start, start + len)
}

/// A random gene lying within `[0, chrom_len)`.
pub fn random_gene_within(gene_id: &str, chrom: &str, chrom_len: Position) -> Gene {
    let (start, end) = random_range(chrom_len);
    Gene::new(gene_id, chrom, start, end)
}

/// `n` segments with random breakpoints and values that exactly tile
/// `[0, chrom_len)`.
pub fn random_tiled_segments(
    sample_id: &str,
    chrom: &str,
    chrom_len: Position,
    n: usize,
) -> Vec<Segment> {
    let mut rng = thread_rng();
    let mut breaks: Vec<Position> = sample(&mut rng, chrom_len as usize - 1, n - 1)
        .into_iter()
        .map(|i| i as Position + 1)
        .collect();
    breaks.sort_unstable();
    breaks.push(chrom_len);

    let mut start = 0;
    breaks
        .into_iter()
        .map(|end| {
            let segment = Segment::new(sample_id, chrom, start, end, rng.gen_range(-2.0..2.0));
            start = end;
            segment
        })
        .collect()
}

/// A random cohort: every sample tiles all [`NCHROM`] chromosomes with
/// `nsegments` segments each, and `ngenes` genes are spread over them.
pub fn random_cohort(nsamples: usize, nsegments: usize, ngenes: usize) -> (Vec<Segment>, Vec<Gene>) {
    let mut rng = thread_rng();
    let chroms: Vec<String> = (1..=NCHROM).map(|i| format!("chr{}", i)).collect();
    let mut segments = Vec::with_capacity(nsamples * NCHROM * nsegments);
    for s in 0..nsamples {
        let sample_id = format!("sample{}", s);
        for chrom in &chroms {
            segments.extend(random_tiled_segments(&sample_id, chrom, CHROM_LEN, nsegments));
        }
    }
    let genes = (0..ngenes)
        .map(|i| {
            let chrom = &chroms[rng.gen_range(0..NCHROM)];
            random_gene_within(&format!("ENSG{:011}", i), chrom, CHROM_LEN)
        })
        .collect();
    (segments, genes)
}

/// The value of each RNA-SeQC metric for a sample that passes every check.
pub fn passing_metric(metric: &str) -> f64 {
    match metric {
        "Mapping Rate" => 0.95,
        "Base Mismatch" => 0.004,
        "End 1 Mapping Rate" | "End 2 Mapping Rate" => 0.9,
        "End 1 Mismatch Rate" | "End 2 Mismatch Rate" => 0.005,
        "Expression Profiling Efficiency" => 0.85,
        "High Quality Rate" => 0.9,
        "Exonic Rate" => 0.8,
        "Ambiguous Alignment Rate" => 0.02,
        "Avg. Splits per Read" => 0.3,
        "Alternative Alignments" => 1_000_000.0,
        "Chimeric Alignment Rate" => 0.01,
        "Total Reads" => 50_000_000.0,
        "Read Length" => 100.0,
        "Genes Detected" => 20_000.0,
        _ => 0.0,
    }
}

/// An RNA-SeQC metrics × samples table where every sample passes, except
/// where `overrides(sample, metric)` gives another value.
pub fn rnaseqc_metrics(
    samples: &[&str],
    overrides: impl Fn(&str, &str) -> Option<f64>,
) -> LabeledMatrix {
    let mut metrics = LabeledMatrix::filled(
        REQUIRED_METRICS.iter().map(|m| m.to_string()).collect(),
        samples.iter().map(|s| s.to_string()).collect(),
        0.0,
    )
    .expect("metric and sample labels are unique")
    .with_index_name("metric");
    for (row, metric) in REQUIRED_METRICS.iter().enumerate() {
        for (col, sample) in samples.iter().enumerate() {
            let value = overrides(sample, metric).unwrap_or_else(|| passing_metric(metric));
            metrics.set(row, col, value);
        }
    }
    metrics
}
