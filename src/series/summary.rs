use crate::prelude::{Date, Series};
use itertools::{Itertools, MinMaxResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [SeriesSummary] describes a dataset before any processing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeriesSummary {
    /// Total number of observations
    pub total: usize,
    /// Observations that carry a value
    pub valid: usize,
    /// Observations with missing value
    pub missing: usize,
    /// Distinct sources, in order of first appearance
    pub sources: Vec<String>,
    /// Earliest [Date]
    pub first: Option<Date>,
    /// Latest [Date]
    pub last: Option<Date>,
    /// Lowest value
    pub min: Option<f64>,
    /// Highest value
    pub max: Option<f64>,
    /// Mean value
    pub mean: Option<f64>,
}

impl SeriesSummary {
    pub(crate) fn new(series: &Series) -> Self {
        let values = series.valid().map(|(_, value)| value).collect::<Vec<_>>();

        let (min, max) = match values.iter().copied().minmax() {
            MinMaxResult::NoElements => (None, None),
            MinMaxResult::OneElement(value) => (Some(value), Some(value)),
            MinMaxResult::MinMax(min, max) => (Some(min), Some(max)),
        };

        let mean = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };

        Self {
            total: series.len(),
            valid: values.len(),
            missing: series.len() - values.len(),
            sources: series.sources(),
            first: series.first_date(),
            last: series.last_date(),
            min,
            max,
            mean,
        }
    }
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "observations: {} ({} valid, {} missing)",
            self.total, self.valid, self.missing
        )?;
        writeln!(f, "sources: {}", self.sources.join(", "))?;
        if let (Some(first), Some(last)) = (self.first, self.last) {
            writeln!(f, "period: {} to {}", first, last)?;
        }
        if let (Some(min), Some(max), Some(mean)) = (self.min, self.max, self.mean) {
            writeln!(f, "range: {:.3} to {:.3} (mean {:.3})", min, max, mean)?;
        }
        Ok(())
    }
}
