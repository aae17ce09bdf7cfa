//! Allele count filters for MAF records.
//!
//! Allele counts are stored as `alt<sep>ref` strings (e.g. `12:30` in a
//! `CGA_WES_AC` column). A record may carry counts from several callers, in
//! which case the counts of the chosen columns are summed before filtering.

use log::debug;

use crate::error::OncoRangesError;

use super::maf::MafRecord;

pub const DEFAULT_ALLELE_SEP: &str = ":";
pub const DEFAULT_MIN_ALLELIC_FRACTION: f64 = 0.1;
pub const DEFAULT_MIN_COVERAGE: u64 = 4;

/// Alternate and reference read counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlleleCounts {
    pub alt: u64,
    pub reference: u64,
}

/// Which allele count a coverage filter looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlleleSide {
    #[default]
    Alt,
    Ref,
}

fn parse_count(part: &str, counts: &str) -> Result<u64, OncoRangesError> {
    let part = part.trim();
    if part.is_empty() || part == "NA" {
        return Ok(0);
    }
    part.parse()
        .map_err(|_| OncoRangesError::InvalidAlleleCounts(counts.to_string()))
}

impl AlleleCounts {
    pub fn new(alt: u64, reference: u64) -> Self {
        Self { alt, reference }
    }

    /// Parse an `alt<sep>ref` string. Missing values (`NA` or empty) count as
    /// zero reads.
    pub fn parse(counts: &str, sep: &str) -> Result<Self, OncoRangesError> {
        let trimmed = counts.trim();
        if trimmed.is_empty() || trimmed == "NA" {
            return Ok(Self::default());
        }
        let mut parts = trimmed.split(sep);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(alt), Some(reference), None) => Ok(Self {
                alt: parse_count(alt, counts)?,
                reference: parse_count(reference, counts)?,
            }),
            _ => Err(OncoRangesError::InvalidAlleleCounts(counts.to_string())),
        }
    }

    pub fn depth(&self) -> u64 {
        self.alt + self.reference
    }

    /// `alt / (alt + ref)`, or `None` with no reads.
    pub fn allelic_fraction(&self) -> Option<f64> {
        match self.depth() {
            0 => None,
            depth => Some(self.alt as f64 / depth as f64),
        }
    }

    pub fn side(&self, side: AlleleSide) -> u64 {
        match side {
            AlleleSide::Alt => self.alt,
            AlleleSide::Ref => self.reference,
        }
    }
}

impl std::ops::Add for AlleleCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.alt + other.alt, self.reference + other.reference)
    }
}

/// Sum the allele counts of a record over `columns`.
pub fn summed_counts(
    record: &MafRecord,
    columns: &[&str],
    sep: &str,
) -> Result<AlleleCounts, OncoRangesError> {
    let mut total = AlleleCounts::default();
    for column in columns {
        total = total + AlleleCounts::parse(&record.required_field(column)?, sep)?;
    }
    Ok(total)
}

/// Keep the records whose summed allelic fraction is at least
/// `min_fraction`. Records with no reads are dropped.
pub fn filter_allelic_fraction(
    records: &[MafRecord],
    columns: &[&str],
    sep: &str,
    min_fraction: f64,
) -> Result<Vec<MafRecord>, OncoRangesError> {
    let mut kept = Vec::new();
    for record in records {
        let counts = summed_counts(record, columns, sep)?;
        if counts.allelic_fraction().is_some_and(|f| f >= min_fraction) {
            kept.push(record.clone());
        }
    }
    debug!(
        "allelic fraction filter kept {} of {} records",
        kept.len(),
        records.len()
    );
    Ok(kept)
}

/// Keep the records whose summed alt (or ref) read count is at least
/// `min_coverage`.
pub fn filter_coverage(
    records: &[MafRecord],
    columns: &[&str],
    sep: &str,
    min_coverage: u64,
    side: AlleleSide,
) -> Result<Vec<MafRecord>, OncoRangesError> {
    let mut kept = Vec::new();
    for record in records {
        if summed_counts(record, columns, sep)?.side(side) >= min_coverage {
            kept.push(record.clone());
        }
    }
    debug!("coverage filter kept {} of {} records", kept.len(), records.len());
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_counts(name: &str, wes: &str, rna: &str) -> MafRecord {
        MafRecord::new("s1", name, "1", 100, name)
            .with_field("CGA_WES_AC", wes)
            .with_field("RNAseq_AC", rna)
    }

    #[test]
    fn test_parse() {
        assert_eq!(AlleleCounts::parse("3:7", ":").unwrap(), AlleleCounts::new(3, 7));
        assert_eq!(AlleleCounts::parse("NA", ":").unwrap(), AlleleCounts::default());
        assert_eq!(AlleleCounts::parse("", ":").unwrap(), AlleleCounts::default());
        assert_eq!(AlleleCounts::parse("4|NA", "|").unwrap(), AlleleCounts::new(4, 0));
        assert!(AlleleCounts::parse("3:x", ":").is_err());
        assert!(AlleleCounts::parse("3:4:5", ":").is_err());
    }

    #[test]
    fn test_filter_allelic_fraction() {
        let records = vec![
            with_counts("high", "5:5", "NA"),
            with_counts("low", "1:20", "0:5"),
            with_counts("summed", "1:20", "3:0"),
            with_counts("empty", "NA", "0:0"),
        ];
        let kept = filter_allelic_fraction(
            &records,
            &["CGA_WES_AC", "RNAseq_AC"],
            DEFAULT_ALLELE_SEP,
            DEFAULT_MIN_ALLELIC_FRACTION,
        )
        .unwrap();
        let names: Vec<&str> = kept.iter().map(|r| r.hugo_symbol.as_str()).collect();
        assert_eq!(names, vec!["high", "summed"]);
    }

    #[test]
    fn test_filter_coverage() {
        let records = vec![
            with_counts("deep", "4:10", "NA"),
            with_counts("shallow", "3:10", "NA"),
        ];
        let alt = filter_coverage(&records, &["CGA_WES_AC"], ":", DEFAULT_MIN_COVERAGE, AlleleSide::Alt)
            .unwrap();
        assert_eq!(alt.len(), 1);
        assert_eq!(alt[0].hugo_symbol, "deep");

        let reference = filter_coverage(&records, &["CGA_WES_AC"], ":", 10, AlleleSide::Ref).unwrap();
        assert_eq!(reference.len(), 2);

        assert!(filter_coverage(&records, &["missing"], ":", 1, AlleleSide::Alt).is_err());
    }
}
