//! Types and methods for reading and parsing input and writing output.

pub mod file;
pub mod parsers;
pub mod tsv;

pub use file::{read_seqlens, InputFile, OutputFile};
pub use parsers::{read_genes, read_segments, write_segments, GeneIterator, SegmentIterator};
pub use tsv::{TsvRecordIterator, MATRIX_TSV};
