//! Tests of the command line tool against small known inputs.

use oncoranges::{matrix::LabeledMatrix, prelude::*, test_utilities::random_cohort};
use std::process::Command;
use tempfile::tempdir;

fn oncoranges_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_oncoranges")
}

#[test]
fn test_gene_matrix_weighted() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("genes.tsv");

    let status = Command::new(oncoranges_binary_path())
        .arg("gene-matrix")
        .arg("--segments")
        .arg("tests_data/segments.tsv")
        .arg("--genes")
        .arg("tests_data/genes.tsv")
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("oncoranges gene-matrix failed");
    assert!(status.success());

    let matrix = LabeledMatrix::read_tsv(&output_path).unwrap();
    assert_eq!(matrix.index_name, "sample_id");
    let genes: Vec<&String> = matrix.col_labels().collect();
    assert_eq!(genes, vec!["G1 (ENSG1)", "G2 (ENSG2)", "G3 (ENSG3)", "Y1 (ENSGY)"]);

    assert_eq!(matrix.get_by_label("ACH-1", "G1 (ENSG1)"), Some(3.0));
    assert_eq!(matrix.get_by_label("ACH-1", "G2 (ENSG2)"), Some(3.75));
    assert!(matrix.get_by_label("ACH-1", "G3 (ENSG3)").unwrap().is_nan());
    assert_eq!(matrix.get_by_label("ACH-2", "G3 (ENSG3)"), Some(-1.0));
    assert!(matrix.get_by_label("ACH-2", "Y1 (ENSGY)").unwrap().is_nan());
}

#[test]
fn test_gene_matrix_policy_and_exclude() {
    let output = Command::new(oncoranges_binary_path())
        .arg("gene-matrix")
        .arg("--segments")
        .arg("tests_data/segments.tsv")
        .arg("--genes")
        .arg("tests_data/genes.tsv")
        .arg("--policy")
        .arg("closest")
        .arg("--exclude")
        .arg("chr2")
        .output()
        .expect("oncoranges gene-matrix failed");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "sample_id\tG1 (ENSG1)\tG2 (ENSG2)\tG3 (ENSG3)\tY1 (ENSGY)");
    assert_eq!(lines[1], "ACH-1\t2\t2\tNA\tNA");
    assert_eq!(lines[2], "ACH-2\t1\t1\tNA\tNA");
}

#[test]
fn test_gene_matrix_exhausted_segments() {
    let dir = tempdir().unwrap();
    let genes_path = dir.path().join("genes.tsv");
    std::fs::write(
        &genes_path,
        "ensembl_id\tchromosome\tstart\tend\nLATE\tchr1\t450\t800\n",
    )
    .unwrap();

    let failed = Command::new(oncoranges_binary_path())
        .arg("gene-matrix")
        .arg("--segments")
        .arg("tests_data/segments.tsv")
        .arg("--genes")
        .arg(&genes_path)
        .output()
        .expect("could not run oncoranges");
    assert!(!failed.status.success());
    assert!(String::from_utf8_lossy(&failed.stderr).contains("ran out"));

    let skipped = Command::new(oncoranges_binary_path())
        .arg("gene-matrix")
        .arg("--segments")
        .arg("tests_data/segments.tsv")
        .arg("--genes")
        .arg(&genes_path)
        .arg("--skip-failed")
        .output()
        .expect("could not run oncoranges");
    assert!(skipped.status.success());
    // both samples' chr1 segments end at 500
    let stdout = String::from_utf8_lossy(&skipped.stdout);
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn test_fill_gaps_with_genome() {
    let output = Command::new(oncoranges_binary_path())
        .arg("fill-gaps")
        .arg("tests_data/gapped_segments.tsv")
        .arg("--seqlens")
        .arg("tests_data/genome.tsv")
        .output()
        .expect("oncoranges fill-gaps failed");
    assert!(output.status.success());

    let expected = "sample_id\tchromosome\tstart\tend\tvalue\n\
                    ACH-1\tchr1\t0\t203\t1\n\
                    ACH-1\tchr1\t203\t1000\t2\n\
                    ACH-1\tchr2\t0\t2000\t3\n";
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
}

#[test]
fn test_segment_qc() {
    let output = Command::new(oncoranges_binary_path())
        .arg("segment-qc")
        .arg("tests_data/segments.tsv")
        .arg("--max-segments")
        .arg("2")
        .output()
        .expect("oncoranges segment-qc failed");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "check\tlabel\ntoo_many_segments\tACH-1\n");
}

#[test]
fn test_rna_qc() {
    let output = Command::new(oncoranges_binary_path())
        .arg("rna-qc")
        .arg("tests_data/rnaseqc_metrics.tsv")
        .output()
        .expect("oncoranges rna-qc failed");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("sample\tMapping Rate\tBase Mismatch"));
    assert!(lines[1].starts_with("lowmap\t1\t0\t"));

    // relaxing the threshold passes every sample
    let relaxed = Command::new(oncoranges_binary_path())
        .arg("rna-qc")
        .arg("tests_data/rnaseqc_metrics.tsv")
        .arg("--threshold")
        .arg("minmapping=0.4")
        .output()
        .expect("oncoranges rna-qc failed");
    assert!(relaxed.status.success());
    assert_eq!(String::from_utf8_lossy(&relaxed.stdout).lines().count(), 1);

    let unknown = Command::new(oncoranges_binary_path())
        .arg("rna-qc")
        .arg("tests_data/rnaseqc_metrics.tsv")
        .arg("--threshold")
        .arg("nonsense=1")
        .output()
        .expect("could not run oncoranges");
    assert!(!unknown.status.success());
}

#[test]
fn test_random_cohort_fully_covered() {
    let (segments, genes) = random_cohort(3, 20, 200);
    for policy in [
        AggregationPolicy::Weighted,
        AggregationPolicy::Mean,
        AggregationPolicy::Closest,
    ] {
        let matrix = to_gene_matrix(&segments, &genes, &GeneMatrixConfig::new(policy)).unwrap();
        assert_eq!((matrix.nrows(), matrix.ncols()), (3, 200));
        // every chromosome of every sample is tiled, so no gene is missing
        assert!(matrix.values().iter().all(|v| v.is_finite()));
    }
}
