//! Readers and writers for segment and gene tables.
//!
//! Both are headered TSV files. Column names follow the DepMap/GATK
//! conventions (`DepMap_ID`, `Chromosome`, `Start`, `End`, `Segment_Mean`;
//! `ensembl_id`, `symbol`) or the plain names of [`Segment`] and [`Gene`].

use std::io::Write;
use std::path::PathBuf;

use log::debug;

use super::{tsv::TsvRecordIterator, OutputFile};
use crate::{
    error::OncoRangesError,
    io::tsv::TsvConfig,
    ranges::{Gene, Segment},
    traits::TsvSerialize,
};

/// The header written before segment records.
pub const SEGMENT_HEADER: &str = "sample_id\tchromosome\tstart\tend\tvalue";

/// An iterator over the [`Segment`] records of a segment table.
pub type SegmentIterator = TsvRecordIterator<Segment>;

/// An iterator over the [`Gene`] records of a gene reference table.
pub type GeneIterator = TsvRecordIterator<Gene>;

/// Read a whole segment table into memory.
pub fn read_segments(filepath: impl Into<PathBuf>) -> Result<Vec<Segment>, OncoRangesError> {
    let filepath = filepath.into();
    let segments = SegmentIterator::new(&filepath)?.collect::<Result<Vec<_>, _>>()?;
    debug!("read {} segments from {:?}", segments.len(), filepath);
    Ok(segments)
}

/// Read a whole gene reference table into memory.
pub fn read_genes(filepath: impl Into<PathBuf>) -> Result<Vec<Gene>, OncoRangesError> {
    let filepath = filepath.into();
    let genes = GeneIterator::new(&filepath)?.collect::<Result<Vec<_>, _>>()?;
    debug!("read {} genes from {:?}", genes.len(), filepath);
    Ok(genes)
}

/// Write segments, with a header, to `output`.
pub fn write_segments(
    segments: &[Segment],
    output: &OutputFile,
    config: &TsvConfig,
) -> Result<(), OncoRangesError> {
    let mut writer = output.writer()?;
    writeln!(writer, "{}", SEGMENT_HEADER)?;
    for segment in segments {
        writeln!(writer, "{}", segment.to_tsv(config))?;
    }
    writer.flush()?;
    Ok(())
}
