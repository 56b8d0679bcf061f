use crate::prelude::Date;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single PSA test result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Sampling [Date]
    pub date: Date,
    /// Measured PSA (ng/mL). None when the result was not recorded.
    pub value: Option<f64>,
    /// Recording source (consulting physician)
    pub source: String,
}

impl Observation {
    /// Creates a new [Observation] with a measured value.
    pub fn new(date: Date, value: f64, source: &str) -> Self {
        Self {
            date,
            value: Some(value),
            source: source.to_string(),
        }
    }

    /// Creates a new [Observation] for which no value was recorded.
    pub fn missing(date: Date, source: &str) -> Self {
        Self {
            date,
            value: None,
            source: source.to_string(),
        }
    }

    /// True if this [Observation] may contribute to a fit.
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}
