//! Numeric operations on data: segment aggregation policies and summary
//! statistics.
//!

pub mod operations;

/// One segment's contribution to a gene: its value and the fraction of the
/// gene it covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coverage {
    pub value: f64,
    pub fraction: f64,
}

impl Coverage {
    pub fn new(value: f64, fraction: f64) -> Self {
        Self { value, fraction }
    }
}
