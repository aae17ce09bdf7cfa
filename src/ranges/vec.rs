//! Per-sample, per-chromosome segment containers.
//!
//! These hold borrowed segments, sorted by start position, so the input
//! segment table is never modified.

use indexmap::IndexMap;

use super::Segment;
use crate::{error::OncoRangesError, traits::GenomicRange};

/// Segments on one chromosome, sorted by start.
pub type VecSegments<'a> = Vec<&'a Segment>;

/// All the segments of one sample, grouped by chromosome in the order
/// chromosomes are first seen.
#[derive(Clone, Debug)]
pub struct SampleSegments<'a> {
    pub sample_id: &'a str,
    pub(crate) chroms: IndexMap<&'a str, VecSegments<'a>>,
}

impl<'a> SampleSegments<'a> {
    /// Create a new empty [`SampleSegments`] container.
    pub fn new(sample_id: &'a str) -> Self {
        Self {
            sample_id,
            chroms: IndexMap::new(),
        }
    }

    /// Add a segment to this sample's container. Does not sort.
    pub fn push_segment(&mut self, segment: &'a Segment) {
        self.chroms
            .entry(segment.seqname())
            .or_default()
            .push(segment)
    }

    /// Sort each chromosome's segments by start position (stable).
    pub fn sort(&mut self) {
        self.chroms
            .values_mut()
            .for_each(|segments| segments.sort_by_key(|s| (s.start, s.end)));
    }

    /// Get the sorted segments on `chromosome`, if this sample has any.
    pub fn get(&self, chromosome: &str) -> Option<&[&'a Segment]> {
        self.chroms.get(chromosome).map(|v| v.as_slice())
    }

    /// Return the number of segments in this [`SampleSegments`] container.
    pub fn len(&self) -> usize {
        self.chroms.values().map(|v| v.len()).sum()
    }

    /// Return whether the [`SampleSegments`] object is empty (contains no segments).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group a segment table by sample (first-appearance order), validating
/// and sorting the segments of each chromosome.
pub fn group_by_sample(
    segments: &[Segment],
) -> Result<IndexMap<&str, SampleSegments<'_>>, OncoRangesError> {
    let mut samples: IndexMap<&str, SampleSegments<'_>> = IndexMap::new();
    for segment in segments {
        segment.validate()?;
        samples
            .entry(segment.sample_id.as_str())
            .or_insert_with(|| SampleSegments::new(segment.sample_id.as_str()))
            .push_segment(segment);
    }
    samples.values_mut().for_each(|sample| sample.sort());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_sample_sorts() {
        let segments = vec![
            Segment::new("s2", "chr1", 50, 100, 1.0),
            Segment::new("s1", "chr1", 100, 200, 2.0),
            Segment::new("s1", "chr1", 0, 100, 1.0),
            Segment::new("s1", "chr2", 0, 10, 3.0),
        ];
        let grouped = group_by_sample(&segments).unwrap();
        let samples: Vec<_> = grouped.keys().cloned().collect();
        assert_eq!(samples, vec!["s2", "s1"]);

        let s1 = grouped.get("s1").unwrap();
        assert_eq!(s1.len(), 3);
        let chr1 = s1.get("chr1").unwrap();
        assert_eq!(chr1[0].start, 0);
        assert_eq!(chr1[1].start, 100);
        assert!(s1.get("chr2").is_some());
        assert!(s1.get("chrY").is_none());
    }

    #[test]
    fn test_group_by_sample_rejects_empty_segment() {
        let segments = vec![Segment::new("s1", "chr1", 10, 10, 1.0)];
        assert!(matches!(
            group_by_sample(&segments),
            Err(OncoRangesError::InvalidGenomicRange(10, 10))
        ));
    }
}
