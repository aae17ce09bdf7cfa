use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{warn, LevelFilter};
use oncoranges::{
    commands::{
        oncoranges_fill_gaps, oncoranges_gene_matrix, oncoranges_rna_qc, oncoranges_segment_qc,
    },
    copynumber::qc::{DEFAULT_MAX_SEGMENTS, DEFAULT_MIN_GENE_VARIANCE},
    prelude::{AggregationPolicy, OncoRangesError},
    rna::qc::parse_threshold_override,
};

const INFO: &str = "\
oncoranges: cancer genomics data wrangling
usage: oncoranges [--help] <subcommand>

Subcommands:

  gene-matrix: aggregate copy number segments into a samples x genes matrix.
  fill-gaps:   extend segments so chromosomes are covered without gaps.
  segment-qc:  flag noisy samples and flat genes in copy number data.
  rna-qc:      find samples failing RNA-SeQC quality thresholds.

";

#[derive(Parser)]
#[clap(name = "oncoranges")]
#[clap(about = INFO)]
struct Cli {
    /// increase logging output (-d for info, -dd for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    GeneMatrix {
        /// a segment TSV file (sample, chromosome, start, end, value columns)
        #[arg(long, required = true)]
        segments: PathBuf,

        /// a gene TSV file (gene ID, optional symbol, chromosome, start, end columns)
        #[arg(long, required = true)]
        genes: PathBuf,

        /// how the segments overlapping a gene are combined
        #[arg(long, value_enum, default_value_t = AggregationPolicy::Weighted)]
        policy: AggregationPolicy,

        /// chromosomes whose genes are left missing (may be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// leave out samples whose segments cannot cover every gene, rather than failing
        #[arg(long)]
        skip_failed: bool,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    FillGaps {
        /// a segment TSV file
        #[arg(required = true)]
        segments: PathBuf,

        /// a TSV genome file of chromosome names and their lengths
        #[arg(long)]
        seqlens: Option<PathBuf>,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    SegmentQc {
        /// a segment TSV file
        #[arg(required = true)]
        segments: PathBuf,

        /// samples with more segments than this are flagged
        #[arg(long, default_value_t = DEFAULT_MAX_SEGMENTS)]
        max_segments: usize,

        /// a samples x genes matrix TSV to check for genes that barely change
        #[arg(long)]
        gene_matrix: Option<PathBuf>,

        /// genes with a variance across samples below this are flagged
        #[arg(long, default_value_t = DEFAULT_MIN_GENE_VARIANCE)]
        min_variance: f64,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    RnaQc {
        /// an RNA-SeQC metrics TSV (metrics as rows, samples as columns)
        #[arg(required = true)]
        metrics: PathBuf,

        /// override a threshold, e.g. --threshold minmapping=0.85 (may be repeated)
        #[arg(long = "threshold", value_parser = parse_threshold_override)]
        thresholds: Vec<(String, f64)>,

        /// an optional output file (standard output will be used if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run() -> Result<(), OncoRangesError> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match &cli.command {
        Some(Commands::GeneMatrix {
            segments,
            genes,
            policy,
            exclude,
            skip_failed,
            output,
        }) => oncoranges_gene_matrix(
            segments,
            genes,
            *policy,
            exclude,
            *skip_failed,
            output.as_ref(),
        ),
        Some(Commands::FillGaps {
            segments,
            seqlens,
            output,
        }) => oncoranges_fill_gaps(segments, seqlens.as_ref(), output.as_ref()),
        Some(Commands::SegmentQc {
            segments,
            max_segments,
            gene_matrix,
            min_variance,
            output,
        }) => oncoranges_segment_qc(
            segments,
            *max_segments,
            gene_matrix.as_ref(),
            *min_variance,
            output.as_ref(),
        ),
        Some(Commands::RnaQc {
            metrics,
            thresholds,
            output,
        }) => oncoranges_rna_qc(metrics, thresholds, output.as_ref()),
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    };
    let (_, report) = result?.into_parts();
    for issue in report.issues() {
        warn!("{}", issue);
    }
    Ok(())
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
