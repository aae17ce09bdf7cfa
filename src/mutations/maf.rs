//! In-memory MAF records and operations over sets of them.
//!
//! A record is identified by its *key*, the sample and genome change
//! (e.g. `ACH-1`, `g.chr1:100A>T`), and located by its *locus*, the sample,
//! chromosome, and start position. Two annotation sets conflict at a locus
//! they share when the genome changes reported there differ.

use std::borrow::Cow;
use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::{info, warn};

use crate::{
    error::OncoRangesError,
    io::tsv::parse_value,
    matrix::LabeledMatrix,
    Position,
};

/// One mutation call. Columns other than the five used for matching are
/// kept in `fields`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MafRecord {
    pub sample: String,
    pub hugo_symbol: String,
    pub chromosome: String,
    pub start_position: Position,
    pub genome_change: String,
    pub fields: IndexMap<String, String>,
}

type RecordKey<'a> = (&'a str, &'a str);
type Locus<'a> = (&'a str, &'a str, Position);

impl MafRecord {
    pub fn new(
        sample: &str,
        hugo_symbol: &str,
        chromosome: &str,
        start_position: Position,
        genome_change: &str,
    ) -> Self {
        Self {
            sample: sample.to_string(),
            hugo_symbol: hugo_symbol.to_string(),
            chromosome: chromosome.to_string(),
            start_position,
            genome_change: genome_change.to_string(),
            fields: IndexMap::new(),
        }
    }

    /// Add an extra column value.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Look up a column by its MAF name. The matching columns answer to their
    /// usual MAF names as well as their field names.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "sample" | "DepMap_ID" | "Tumor_Sample_Barcode" => Some(Cow::from(self.sample.as_str())),
            "hugo_symbol" | "Hugo_Symbol" => Some(Cow::from(self.hugo_symbol.as_str())),
            "chromosome" | "Chromosome" => Some(Cow::from(self.chromosome.as_str())),
            "start_position" | "Start_position" | "Start_Position" => {
                Some(Cow::from(self.start_position.to_string()))
            }
            "genome_change" | "Genome_Change" => Some(Cow::from(self.genome_change.as_str())),
            _ => self.fields.get(name).map(|v| Cow::from(v.as_str())),
        }
    }

    /// Like [`MafRecord::field`], but a missing column is an error.
    pub fn required_field(&self, name: &str) -> Result<Cow<'_, str>, OncoRangesError> {
        self.field(name)
            .ok_or_else(|| OncoRangesError::MissingColumn(name.to_string()))
    }

    fn key(&self) -> RecordKey<'_> {
        (self.sample.as_str(), self.genome_change.as_str())
    }

    fn locus(&self) -> Locus<'_> {
        (self.sample.as_str(), self.chromosome.as_str(), self.start_position)
    }
}

/// Build a genes × samples matrix of the `freq_col` values. Genes are sorted;
/// samples are in order of first appearance. Only the first record of each
/// (sample, gene) pair counts, and pairs with no record are 0. With `boolify`
/// every non-zero value becomes 1.
pub fn maf_to_matrix(
    records: &[MafRecord],
    freq_col: &str,
    boolify: bool,
) -> Result<LabeledMatrix, OncoRangesError> {
    let genes: IndexSet<&str> = records
        .iter()
        .map(|r| r.hugo_symbol.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let samples: IndexSet<&str> = records.iter().map(|r| r.sample.as_str()).collect();

    let mut matrix = LabeledMatrix::filled(
        genes.iter().map(|g| g.to_string()).collect(),
        samples.iter().map(|s| s.to_string()).collect(),
        0.0,
    )?
    .with_index_name("Hugo_Symbol");

    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert((record.hugo_symbol.as_str(), record.sample.as_str())) {
            continue;
        }
        let mut value = parse_value(&record.required_field(freq_col)?)?;
        if value.is_nan() {
            value = 0.0;
        }
        if boolify && value != 0.0 {
            value = 1.0;
        }
        // both indices exist: the label sets were built from these records
        if let (Some(row), Some(col)) = (
            genes.get_index_of(record.hugo_symbol.as_str()),
            samples.get_index_of(record.sample.as_str()),
        ) {
            matrix.set(row, col, value);
        }
    }
    Ok(matrix)
}

/// Disagreeing calls at a locus shared by two annotation sets.
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    pub sample: String,
    pub chromosome: String,
    pub start_position: Position,
    /// Genome changes reported only by the first set.
    pub first: Vec<String>,
    /// Genome changes reported only by the second set.
    pub second: Vec<String>,
}

impl Conflict {
    fn at(record: &MafRecord) -> Self {
        Self {
            sample: record.sample.clone(),
            chromosome: record.chromosome.clone(),
            start_position: record.start_position,
            first: Vec::new(),
            second: Vec::new(),
        }
    }
}

/// Which annotation set wins at a conflicting locus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    PreferFirst,
    #[default]
    PreferSecond,
}

/// The records of each set that sit at a shared locus with a key the other
/// set lacks.
struct ConflictingRecords<'a> {
    first: Vec<&'a MafRecord>,
    second: Vec<&'a MafRecord>,
}

fn conflicting_records<'a>(first: &'a [MafRecord], second: &'a [MafRecord]) -> ConflictingRecords<'a> {
    let first_loci: HashSet<Locus> = first.iter().map(|r| r.locus()).collect();
    let second_loci: HashSet<Locus> = second.iter().map(|r| r.locus()).collect();
    let first_keys: HashSet<RecordKey> = first.iter().map(|r| r.key()).collect();
    let second_keys: HashSet<RecordKey> = second.iter().map(|r| r.key()).collect();

    ConflictingRecords {
        first: first
            .iter()
            .filter(|r| second_loci.contains(&r.locus()) && !second_keys.contains(&r.key()))
            .collect(),
        second: second
            .iter()
            .filter(|r| first_loci.contains(&r.locus()) && !first_keys.contains(&r.key()))
            .collect(),
    }
}

/// List the loci where the two annotation sets disagree, sorted by sample,
/// chromosome, and start.
pub fn find_conflicts(first: &[MafRecord], second: &[MafRecord]) -> Vec<Conflict> {
    let conflicting = conflicting_records(first, second);
    let mut by_locus: IndexMap<Locus, Conflict> = IndexMap::new();
    for record in &conflicting.first {
        by_locus
            .entry(record.locus())
            .or_insert_with(|| Conflict::at(record))
            .first
            .push(record.genome_change.clone());
    }
    for record in &conflicting.second {
        by_locus
            .entry(record.locus())
            .or_insert_with(|| Conflict::at(record))
            .second
            .push(record.genome_change.clone());
    }

    by_locus.sort_keys();
    by_locus.into_values().collect()
}

/// Merge two annotation sets.
///
/// Records of the losing set at conflicting loci are dropped; then every
/// record of the second set whose (sample, genome change) key is not in the
/// first set is appended. The result is sorted by sample, chromosome, and
/// start (stable).
pub fn merge_annotations(
    first: &[MafRecord],
    second: &[MafRecord],
    policy: ConflictPolicy,
) -> Vec<MafRecord> {
    let conflicting = conflicting_records(first, second);
    if !conflicting.first.is_empty() || !conflicting.second.is_empty() {
        warn!(
            "found {} non-matching mutations ({} in the second set); keeping the {} set's calls",
            conflicting.first.len(),
            conflicting.second.len(),
            match policy {
                ConflictPolicy::PreferFirst => "first",
                ConflictPolicy::PreferSecond => "second",
            }
        );
    }

    let (drop_first, drop_second): (HashSet<RecordKey>, HashSet<RecordKey>) = match policy {
        ConflictPolicy::PreferSecond => (conflicting.first.iter().map(|r| r.key()).collect(), HashSet::new()),
        ConflictPolicy::PreferFirst => (HashSet::new(), conflicting.second.iter().map(|r| r.key()).collect()),
    };

    let mut merged: Vec<MafRecord> = first
        .iter()
        .filter(|r| !drop_first.contains(&r.key()))
        .cloned()
        .collect();
    let kept_keys: HashSet<RecordKey> = merged.iter().map(|r| r.key()).collect();
    let additional: Vec<MafRecord> = second
        .iter()
        .filter(|r| !drop_second.contains(&r.key()) && !kept_keys.contains(&r.key()))
        .cloned()
        .collect();
    info!("adding {} records from the second set", additional.len());
    merged.extend(additional);

    merged.sort_by(|a, b| {
        (a.sample.as_str(), a.chromosome.as_str(), a.start_position).cmp(&(
            b.sample.as_str(),
            b.chromosome.as_str(),
            b.start_position,
        ))
    });
    merged
}
