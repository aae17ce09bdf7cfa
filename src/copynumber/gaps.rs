//! Extend segments so each chromosome of each sample is covered without gaps.

use indexmap::IndexMap;
use log::debug;

use crate::{
    error::OncoRangesError,
    ranges::{vec::group_by_sample, validate_range, Segment},
    Position,
};

/// The end given to a chromosome's last segment when no genome file is
/// supplied.
pub const DEFAULT_CHROM_END: Position = 1_000_000_000;

/// Return a gap-free copy of `segments`.
///
/// For every sample and chromosome (segments sorted by start):
///  - the first segment is extended to start at 0;
///  - a gap between two segments is split, the previous segment taking the
///    larger half;
///  - the last segment is extended to the chromosome length in `seqlens`, or
///    to [`DEFAULT_CHROM_END`] if `seqlens` is `None`.
///
/// The result is ordered by sample, then chromosome (both in order of first
/// appearance), then start.
///
/// # Errors
/// A segment starting before the end of the previous one is an
/// [`OncoRangesError::OverlappingSegments`] error, and a chromosome absent
/// from a supplied `seqlens` is an [`OncoRangesError::MissingSequence`] error.
pub fn fill_segment_gaps(
    segments: &[Segment],
    seqlens: Option<&IndexMap<String, Position>>,
) -> Result<Vec<Segment>, OncoRangesError> {
    let samples = group_by_sample(segments)?;
    let mut filled: Vec<Segment> = Vec::with_capacity(segments.len());
    let mut n_gaps = 0;

    for sample in samples.values() {
        for (chrom, chrom_segments) in sample.chroms.iter() {
            let chrom_end = match seqlens {
                Some(seqlens) => *seqlens
                    .get(*chrom)
                    .ok_or_else(|| OncoRangesError::MissingSequence(chrom.to_string()))?,
                None => DEFAULT_CHROM_END,
            };

            let first = filled.len();
            // gaps are measured against the unextended end
            let mut prev_end: Option<Position> = None;
            for segment in chrom_segments {
                let mut extended = (*segment).clone();
                match prev_end {
                    None => extended.start = 0,
                    Some(prev_end) if segment.start > prev_end + 1 => {
                        let gap = segment.start - prev_end;
                        if let Some(previous) = filled.last_mut() {
                            previous.end += gap - gap / 2;
                        }
                        extended.start = segment.start - gap / 2;
                        n_gaps += 1;
                    }
                    Some(prev_end) if segment.start < prev_end => {
                        return Err(OncoRangesError::OverlappingSegments {
                            sample: sample.sample_id.to_string(),
                            chromosome: chrom.to_string(),
                            start: segment.start,
                            prev_end,
                        });
                    }
                    Some(_) => {}
                }
                prev_end = Some(segment.end);
                filled.push(extended);
            }

            if let Some(last) = filled[first..].last_mut() {
                last.end = chrom_end;
                validate_range(last.start, last.end)?;
            }
        }
    }
    debug!("filled {} gaps across {} samples", n_gaps, samples.len());
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seqlens;

    fn spans(segments: &[Segment]) -> Vec<(Position, Position)> {
        segments.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_fill_gaps_default_end() {
        let segments = vec![
            Segment::new("s1", "1", 100, 200, 1.0),
            Segment::new("s1", "1", 205, 300, 2.0),
            Segment::new("s1", "1", 301, 400, 3.0),
        ];
        let filled = fill_segment_gaps(&segments, None).unwrap();
        // gap of 5: previous end grows by 3, next start moves back 2
        assert_eq!(
            spans(&filled),
            vec![(0, 203), (203, 300), (301, DEFAULT_CHROM_END)]
        );
        assert_eq!(filled[1].value, 2.0);
    }

    #[test]
    fn test_fill_gaps_even_gap() {
        let segments = vec![
            Segment::new("s1", "1", 0, 100, 1.0),
            Segment::new("s1", "1", 110, 200, 2.0),
        ];
        let filled = fill_segment_gaps(&segments, None).unwrap();
        assert_eq!(spans(&filled), vec![(0, 105), (105, DEFAULT_CHROM_END)]);
    }

    #[test]
    fn test_fill_gaps_with_genome_and_order() {
        let segments = vec![
            Segment::new("s2", "2", 10, 20, 1.0),
            Segment::new("s1", "1", 50, 60, 1.0),
            Segment::new("s1", "1", 10, 20, 1.0),
        ];
        let sl = seqlens!("1" => 1000, "2" => 500);
        let filled = fill_segment_gaps(&segments, Some(&sl)).unwrap();
        let samples: Vec<&str> = filled.iter().map(|s| s.sample_id.as_str()).collect();
        assert_eq!(samples, vec!["s2", "s1", "s1"]);
        assert_eq!(spans(&filled), vec![(0, 500), (0, 35), (35, 1000)]);
    }

    #[test]
    fn test_fill_gaps_missing_chromosome() {
        let segments = vec![Segment::new("s1", "X", 10, 20, 1.0)];
        let sl = seqlens!("1" => 1000);
        assert!(matches!(
            fill_segment_gaps(&segments, Some(&sl)),
            Err(OncoRangesError::MissingSequence(_))
        ));
    }

    #[test]
    fn test_fill_gaps_overlap() {
        let segments = vec![
            Segment::new("s1", "1", 0, 100, 1.0),
            Segment::new("s1", "1", 90, 200, 2.0),
        ];
        assert!(matches!(
            fill_segment_gaps(&segments, None),
            Err(OncoRangesError::OverlappingSegments { start: 90, prev_end: 100, .. })
        ));
    }

    #[test]
    fn test_inputs_untouched() {
        let segments = vec![Segment::new("s1", "1", 10, 20, 1.0)];
        let before = segments.clone();
        fill_segment_gaps(&segments, None).unwrap();
        assert_eq!(segments, before);
    }
}
