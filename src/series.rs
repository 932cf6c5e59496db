//! Fixed-length hourly time series covering a whole reference year.
use anyhow::{ensure, Result};

/// The number of simulated hours per year (365 days)
pub const HOURS_PER_YEAR: usize = 8760;

/// An ordered sequence of one value per hour of the reference year.
///
/// Hour 0 corresponds to January 1st, 00:00. The length is always exactly
/// [`HOURS_PER_YEAR`]; unset values default to 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries(Vec<f64>);

impl Default for HourlySeries {
    fn default() -> Self {
        Self::new()
    }
}

impl HourlySeries {
    /// An all-zero series
    pub fn new() -> Self {
        HourlySeries(vec![0.0; HOURS_PER_YEAR])
    }

    /// A series with every hour set to `value`
    pub fn constant(value: f64) -> Self {
        HourlySeries(vec![value; HOURS_PER_YEAR])
    }

    /// Create a series from raw values, which must cover the whole year
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        ensure!(
            values.len() == HOURS_PER_YEAR,
            "Hourly series must have exactly {} values (got {})",
            HOURS_PER_YEAR,
            values.len()
        );

        Ok(HourlySeries(values))
    }

    /// The value for the given hour index (0-8759)
    pub fn get(&self, hour: usize) -> f64 {
        self.0[hour]
    }

    /// Set the value for the given hour index (0-8759)
    pub fn set(&mut self, hour: usize, value: f64) {
        self.0[hour] = value;
    }

    /// The largest value in the series
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// The sum of all values in the series
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// The arithmetic mean of the series
    pub fn mean(&self) -> f64 {
        self.sum() / HOURS_PER_YEAR as f64
    }

    /// Iterate over the hourly values in order
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// The underlying values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
