//! Gene-level copy number from segments.
//!
//! For each sample, genes are visited in `(chromosome, start)` order and
//! overlapped against that sample's sorted segments on the same chromosome
//! with a [`SegmentCursor`]. The covering segments are combined by an
//! [`AggregationPolicy`]:
//!
//!  - a gene that ends within the segment it starts in takes that segment's
//!    value, whatever the policy;
//!  - otherwise each covering segment gets the fraction of the gene it covers,
//!    the first measured from the gene start and each later one from the end
//!    of the segment before it, until a segment reaches the gene end.
//!
//! Genes on a chromosome with no segments for the sample, or on an excluded
//! chromosome, are [`MISSING`].

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::{
    data::{operations::AggregationPolicy, Coverage},
    error::OncoRangesError,
    matrix::{GeneValueMatrix, LabeledMatrix},
    ranges::{
        cursor::SegmentCursor,
        vec::{group_by_sample, SampleSegments},
        Gene, Segment,
    },
    traits::GenericRange,
    MISSING,
};

/// Options for building a gene matrix.
#[derive(Clone, Debug, Default)]
pub struct GeneMatrixConfig {
    pub policy: AggregationPolicy,
    /// Genes on these chromosomes are missing for every sample.
    pub excluded_chromosomes: HashSet<String>,
}

impl GeneMatrixConfig {
    pub fn new(policy: AggregationPolicy) -> Self {
        Self {
            policy,
            excluded_chromosomes: HashSet::new(),
        }
    }

    pub fn with_excluded<I, S>(mut self, chromosomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_chromosomes
            .extend(chromosomes.into_iter().map(Into::into));
        self
    }
}

/// The validated gene table and the order in which genes are visited.
#[derive(Clone, Debug)]
pub struct GeneIndex<'a> {
    genes: &'a [Gene],
    order: Vec<usize>,
}

impl<'a> GeneIndex<'a> {
    /// Validate every gene (zero-length genes and repeated labels are
    /// rejected) and sort the visiting order by chromosome, start, and end.
    pub fn new(genes: &'a [Gene]) -> Result<Self, OncoRangesError> {
        let mut labels = HashSet::with_capacity(genes.len());
        for gene in genes {
            gene.validate()?;
            let label = gene.label();
            if labels.contains(&label) {
                return Err(OncoRangesError::DuplicateGeneLabel(label));
            }
            labels.insert(label);
        }
        let mut order: Vec<usize> = (0..genes.len()).collect();
        order.sort_by(|&a, &b| {
            let (ga, gb) = (&genes[a], &genes[b]);
            (ga.chromosome.as_str(), ga.start, ga.end).cmp(&(gb.chromosome.as_str(), gb.start, gb.end))
        });
        Ok(Self { genes, order })
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// The output column labels, in gene table order.
    pub fn labels(&self) -> Vec<String> {
        self.genes.iter().map(|g| g.label()).collect()
    }
}

/// How a gene is covered by a sample's segments.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneOverlap {
    /// The gene lies within a single segment, which has this value.
    Contained(f64),
    /// The gene spans several segments; coverages are in scan order.
    Spanning(Vec<Coverage>),
}

impl GeneOverlap {
    pub fn value(&self, policy: AggregationPolicy) -> f64 {
        match self {
            GeneOverlap::Contained(value) => *value,
            GeneOverlap::Spanning(coverages) => policy.combine(coverages),
        }
    }

    /// The coverage fractions of the covering segments.
    pub fn fractions(&self) -> Vec<f64> {
        match self {
            GeneOverlap::Contained(_) => vec![1.0],
            GeneOverlap::Spanning(coverages) => coverages.iter().map(|c| c.fraction).collect(),
        }
    }
}

/// Find the segments covering `gene`, moving `cursor` to the last of them.
/// Returns `None` if the segments run out first.
pub fn overlap_gene(cursor: &mut SegmentCursor<'_, '_>, gene: &Gene) -> Option<GeneOverlap> {
    if !cursor.skip_ending_before(gene.start) {
        return None;
    }
    // nested genes can start before the segment the cursor was left on
    cursor.rewind_to(gene.start);
    if cursor.current().end <= gene.start {
        // the gene starts in a gap; the next segment is known to end after it
        cursor.advance();
    }

    let first = cursor.current();
    if gene.end <= first.end {
        return Some(GeneOverlap::Contained(first.value));
    }

    let length = gene.width() as f64;
    let mut coverages = vec![Coverage::new(
        first.value,
        (first.end as f64 - gene.start as f64) / length,
    )];
    let mut end = first.end;
    while end < gene.end {
        if !cursor.advance() {
            return None;
        }
        let next = cursor.current();
        let next_end = next.end.min(gene.end);
        // segments tile the chromosome, so the previous end is this start
        coverages.push(Coverage::new(
            next.value,
            (next_end as f64 - end as f64) / length,
        ));
        end = next.end;
    }
    Some(GeneOverlap::Spanning(coverages))
}

/// Aggregate one sample's segments into one value per gene, in gene table
/// order.
///
/// # Errors
/// Returns [`OncoRangesError::SegmentsExhausted`] if the segments of a
/// chromosome end before a gene on it is covered.
pub fn aggregate_sample(
    sample: &SampleSegments<'_>,
    genes: &GeneIndex<'_>,
    config: &GeneMatrixConfig,
) -> Result<Vec<f64>, OncoRangesError> {
    let mut values = vec![MISSING; genes.len()];
    let mut cursors: HashMap<&str, usize> = HashMap::new();
    let mut missing_chroms: HashSet<&str> = HashSet::new();

    for &k in &genes.order {
        let gene = &genes.genes[k];
        let chromosome = gene.chromosome.as_str();
        if config.excluded_chromosomes.contains(chromosome) {
            continue;
        }
        let position = cursors.get(chromosome).copied().unwrap_or(0);
        let mut cursor = match sample
            .get(chromosome)
            .and_then(|segments| SegmentCursor::new(segments, position))
        {
            Some(cursor) => cursor,
            None => {
                missing_chroms.insert(chromosome);
                continue;
            }
        };

        let overlap =
            overlap_gene(&mut cursor, gene).ok_or_else(|| OncoRangesError::SegmentsExhausted {
                sample: sample.sample_id.to_string(),
                chromosome: chromosome.to_string(),
                gene: gene.gene_id.clone(),
            })?;
        values[k] = overlap.value(config.policy);
        cursors.insert(chromosome, cursor.index());
    }

    if !missing_chroms.is_empty() {
        let mut missing: Vec<_> = missing_chroms.into_iter().collect();
        missing.sort_unstable();
        debug!(
            "sample '{}' has no segments on {}; genes there are missing",
            sample.sample_id,
            missing.join(", ")
        );
    }
    Ok(values)
}

fn empty_matrix(
    samples: Vec<String>,
    genes: &GeneIndex<'_>,
) -> Result<GeneValueMatrix, OncoRangesError> {
    Ok(LabeledMatrix::filled(samples, genes.labels(), MISSING)?.with_index_name("sample_id"))
}

/// Build the samples × genes matrix. Samples are rows in the order they first
/// appear in `segments`; genes are columns in gene table order.
///
/// Any structural inconsistency in one sample aborts the whole aggregation;
/// see [`to_gene_matrix_lenient`] to skip failing samples instead.
pub fn to_gene_matrix(
    segments: &[Segment],
    genes: &[Gene],
    config: &GeneMatrixConfig,
) -> Result<GeneValueMatrix, OncoRangesError> {
    let samples = group_by_sample(segments)?;
    let gene_index = GeneIndex::new(genes)?;
    info!(
        "aggregating {} samples over {} genes ({} policy)",
        samples.len(),
        gene_index.len(),
        config.policy
    );

    let sample_names = samples.keys().map(|s| s.to_string()).collect();
    let mut matrix = empty_matrix(sample_names, &gene_index)?;
    for (row, sample) in samples.values().enumerate() {
        let values = aggregate_sample(sample, &gene_index, config)?;
        matrix.set_row(row, &values)?;
    }
    Ok(matrix)
}

/// Like [`to_gene_matrix`], but samples whose aggregation fails are left
/// out of the matrix and returned with their error.
pub fn to_gene_matrix_lenient(
    segments: &[Segment],
    genes: &[Gene],
    config: &GeneMatrixConfig,
) -> Result<(GeneValueMatrix, Vec<(String, OncoRangesError)>), OncoRangesError> {
    let samples = group_by_sample(segments)?;
    let gene_index = GeneIndex::new(genes)?;

    let mut rows = Vec::new();
    let mut failed = Vec::new();
    for (name, sample) in samples.iter() {
        match aggregate_sample(sample, &gene_index, config) {
            Ok(values) => rows.push((name.to_string(), values)),
            Err(e) => {
                warn!("skipping sample '{}': {}", name, e);
                failed.push((name.to_string(), e));
            }
        }
    }

    let mut matrix = empty_matrix(rows.iter().map(|(n, _)| n.clone()).collect(), &gene_index)?;
    for (row, (_, values)) in rows.iter().enumerate() {
        matrix.set_row(row, values)?;
    }
    Ok((matrix, failed))
}
