//! Traits used by the oncoranges library.
//!

use crate::{io::tsv::TsvConfig, Position};

/// The [`GenericRange`] trait defines common functionality for all range types.
pub trait GenericRange {
    fn start(&self) -> Position;
    fn end(&self) -> Position;
    fn width(&self) -> Position {
        self.end().saturating_sub(self.start())
    }
}

/// A range that sits on a named sequence (i.e. chromosome).
pub trait GenomicRange: GenericRange {
    fn seqname(&self) -> &str;
}

/// Defines how to serialize something to TSV.
pub trait TsvSerialize {
    // Serialize something to a TSV [`String`].
    fn to_tsv(&self, config: &TsvConfig) -> String;
}

impl TsvSerialize for String {
    #![allow(unused_variables)]
    fn to_tsv(&self, config: &TsvConfig) -> String {
        self.to_string()
    }
}

impl TsvSerialize for f64 {
    fn to_tsv(&self, config: &TsvConfig) -> String {
        if self.is_nan() {
            config.no_value_string.clone()
        } else {
            self.to_string()
        }
    }
}

impl TsvSerialize for bool {
    #![allow(unused_variables)]
    fn to_tsv(&self, config: &TsvConfig) -> String {
        if *self { "1" } else { "0" }.to_string()
    }
}

impl<U: TsvSerialize> TsvSerialize for Vec<U> {
    fn to_tsv(&self, config: &TsvConfig) -> String {
        self.iter()
            .map(|x| x.to_tsv(config))
            .collect::<Vec<_>>()
            .join("\t")
    }
}
