//! Implementations of various operations on data.
//!
//! [`AggregationPolicy`] combines the segments covering a gene into one
//! value; the free functions are the NaN-aware summaries used by the QC
//! and replicate-matching code.

use clap::ValueEnum;
use num_traits::Float;
use std::iter::Sum;

use super::Coverage;

/// Calculate the median.
pub fn median<F: Float + Sum>(numbers: &mut [F]) -> Option<F> {
    if numbers.is_empty() {
        return None;
    }
    let mid = numbers.len() / 2;
    let cmp = |a: &F, b: &F| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal);
    if numbers.len() % 2 == 0 {
        numbers.select_nth_unstable_by(mid - 1, cmp);
        let lower = numbers[mid - 1];
        numbers.select_nth_unstable_by(mid, cmp);
        let upper = numbers[mid];
        Some((lower + upper) / (F::one() + F::one()))
    } else {
        numbers.select_nth_unstable_by(mid, cmp);
        Some(numbers[mid])
    }
}

/// Mean of the finite values; `None` if there are none.
pub fn nan_mean<F: Float + Sum>(numbers: &[F]) -> Option<F> {
    let finite: Vec<F> = numbers.iter().copied().filter(|x| !x.is_nan()).collect();
    if finite.is_empty() {
        return None;
    }
    let n = F::from(finite.len())?;
    Some(finite.into_iter().sum::<F>() / n)
}

/// Variance of the non-NaN values with `ddof` delta degrees of freedom;
/// `None` if there are `ddof` or fewer values.
pub fn nan_variance<F: Float + Sum>(numbers: &[F], ddof: usize) -> Option<F> {
    let finite: Vec<F> = numbers.iter().copied().filter(|x| !x.is_nan()).collect();
    if finite.len() <= ddof {
        return None;
    }
    let mean = nan_mean(&finite)?;
    let ss: F = finite.iter().map(|&x| (x - mean) * (x - mean)).sum();
    Some(ss / F::from(finite.len() - ddof)?)
}

/// Pearson correlation of two equal-length slices. Returns NaN when either
/// side has zero variance or the lengths differ.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// How the segments overlapping a gene are combined into the gene's value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AggregationPolicy {
    /// Coverage-weighted average of the overlapping segment values.
    #[default]
    Weighted,
    /// Unweighted mean of the overlapping segment values.
    Mean,
    /// The value of the segment covering most of the gene.
    Closest,
}

impl AggregationPolicy {
    /// Combine the covering segments of one gene, in scan order. Returns NaN
    /// if nothing covers the gene.
    #[inline(always)]
    pub fn combine(&self, coverages: &[Coverage]) -> f64 {
        if coverages.is_empty() {
            return f64::NAN;
        }
        match self {
            AggregationPolicy::Weighted => coverages.iter().map(|c| c.value * c.fraction).sum(),
            AggregationPolicy::Mean => {
                let sum: f64 = coverages.iter().map(|c| c.value).sum();
                sum / coverages.len() as f64
            }
            AggregationPolicy::Closest => {
                // a later segment must strictly beat the running best
                let mut best = coverages[0];
                for candidate in &coverages[1..] {
                    if candidate.fraction > best.fraction {
                        best = *candidate;
                    }
                }
                best.value
            }
        }
    }
}

impl std::fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AggregationPolicy::Weighted => "weighted",
            AggregationPolicy::Mean => "mean",
            AggregationPolicy::Closest => "closest",
        };
        write!(f, "{}", name)
    }
}
