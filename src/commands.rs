//! The command line tool's commands, as library functions.
//!
//! Each reads its inputs, runs one library operation, writes the result to a
//! file or standard output, and returns a [`Report`] of anything the user
//! should know about.

use std::io::Write;
use std::path::PathBuf;

use log::info;

use crate::{
    copynumber::{
        check_amount_of_segments, check_gene_change_across_all, fill_segment_gaps,
        gene_matrix::to_gene_matrix_lenient, segment_counts, to_gene_matrix, GeneMatrixConfig,
    },
    data::operations::AggregationPolicy,
    error::OncoRangesError,
    io::{file::output_or_stdout, read_genes, read_segments, read_seqlens, write_segments, MATRIX_TSV},
    matrix::LabeledMatrix,
    reporting::{CommandOutput, Report},
    rna::qc::{filter_rna_from_qc, write_qc_failures, RnaQcThresholds},
};

/// Build a samples × genes copy number matrix from a segment table and a
/// gene table.
pub fn oncoranges_gene_matrix(
    segments_path: &PathBuf,
    genes_path: &PathBuf,
    policy: AggregationPolicy,
    exclude: &[String],
    skip_failed: bool,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, OncoRangesError> {
    let segments = read_segments(segments_path)?;
    let genes = read_genes(genes_path)?;
    let config = GeneMatrixConfig::new(policy).with_excluded(exclude.iter().cloned());

    // for reporting stuff to the user
    let mut report = Report::new();

    let matrix = if skip_failed {
        let (matrix, failed) = to_gene_matrix_lenient(&segments, &genes, &config)?;
        for (sample, error) in failed {
            report.add_issue(format!("sample '{}' was skipped: {}", sample, error));
        }
        matrix
    } else {
        to_gene_matrix(&segments, &genes, &config)?
    };

    matrix.write_tsv(&output_or_stdout(output), &MATRIX_TSV)?;
    Ok(CommandOutput::new((), report))
}

/// Extend segments so that each sample's chromosomes are covered without
/// gaps.
pub fn oncoranges_fill_gaps(
    segments_path: &PathBuf,
    seqlens: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, OncoRangesError> {
    let segments = read_segments(segments_path)?;
    let genome = seqlens.map(read_seqlens).transpose()?;
    let filled = fill_segment_gaps(&segments, genome.as_ref())?;
    write_segments(&filled, &output_or_stdout(output), &MATRIX_TSV)?;
    Ok(CommandOutput::new((), Report::new()))
}

/// Flag samples with too many segments and, given a gene matrix, genes that
/// barely change across samples. Writes one `check`/`label` line per flag.
pub fn oncoranges_segment_qc(
    segments_path: &PathBuf,
    max_segments: usize,
    gene_matrix: Option<&PathBuf>,
    min_variance: f64,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, OncoRangesError> {
    let segments = read_segments(segments_path)?;
    let mut report = Report::new();

    let output_stream = output_or_stdout(output);
    let mut writer = output_stream.writer()?;
    writeln!(writer, "check\tlabel")?;

    let counts = segment_counts(&segments);
    for sample in check_amount_of_segments(&segments, max_segments) {
        let count = counts.get(&sample).copied().unwrap_or_default();
        report.add_issue(format!(
            "sample '{}' has {} segments (more than {})",
            sample, count, max_segments
        ));
        writeln!(writer, "too_many_segments\t{}", sample)?;
    }

    if let Some(path) = gene_matrix {
        let matrix = LabeledMatrix::read_tsv(path)?;
        let flat = check_gene_change_across_all(&matrix, min_variance);
        info!("{} of {} genes vary less than {}", flat.len(), matrix.ncols(), min_variance);
        for gene in flat {
            writeln!(writer, "low_variance_gene\t{}", gene)?;
        }
    }
    writer.flush()?;
    Ok(CommandOutput::new((), report))
}

/// Find the samples of an RNA-SeQC metrics table that fail QC.
pub fn oncoranges_rna_qc(
    metrics_path: &PathBuf,
    overrides: &[(String, f64)],
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, OncoRangesError> {
    let metrics = LabeledMatrix::read_tsv(metrics_path)?;
    let thresholds = RnaQcThresholds::default().with_overrides(overrides)?;
    let failures = filter_rna_from_qc(&metrics, &thresholds)?;

    let mut report = Report::new();
    if !failures.is_empty() {
        report.add_issue(format!(
            "{} of {} samples failed RNA QC",
            failures.len(),
            metrics.ncols()
        ));
    }
    write_qc_failures(&failures, &output_or_stdout(output), &MATRIX_TSV)?;
    Ok(CommandOutput::new((), report))
}
