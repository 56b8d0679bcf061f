use crate::{
    date::MAX_ELAPSED_DAYS,
    prelude::{Date, FitError, FitStatistics},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Average number of days per year, used to express yearly rates.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// [FittedTrend] obtained by fitting a [Series](crate::prelude::Series):
/// `value = intercept + slope * elapsed_days`, where elapsed days are
/// counted from the reference [Date].
///
/// `dates`, `elapsed_days`, `values` and `predicted` are aligned 1:1
/// with the observations that carried a value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FittedTrend {
    /// Time origin
    pub reference: Date,
    /// Value at reference [Date]
    pub intercept: f64,
    /// Value derivative (per day)
    pub slope: f64,
    /// Dates that contributed to the fit
    pub dates: Vec<Date>,
    /// Elapsed days since reference, for each contributing [Date]
    pub elapsed_days: Vec<f64>,
    /// Observed values
    pub values: Vec<f64>,
    /// Fitted values
    pub predicted: Vec<f64>,
    /// Regression diagnostics
    pub statistics: FitStatistics,
}

impl FittedTrend {
    /// Evaluates the trend `elapsed_days` after the reference [Date].
    pub fn predict(&self, elapsed_days: f64) -> f64 {
        self.intercept + self.slope * elapsed_days
    }

    /// Evaluates the trend for each elapsed days value, preserving order.
    pub fn predict_many(&self, elapsed_days: &[f64]) -> Vec<f64> {
        elapsed_days.iter().map(|dt| self.predict(*dt)).collect()
    }

    /// Evaluates the trend at the given [Date].
    pub fn predict_date(&self, date: Date) -> f64 {
        self.predict(date.elapsed_days(self.reference))
    }

    /// Observed minus fitted values.
    pub fn residuals(&self) -> Vec<f64> {
        self.values
            .iter()
            .zip(self.predicted.iter())
            .map(|(y, y_hat)| y - y_hat)
            .collect()
    }

    /// Slope expressed per year.
    pub fn slope_per_year(&self) -> f64 {
        self.slope * DAYS_PER_YEAR
    }

    /// Returns the [Date] at which the trend equals `target`.
    ///
    /// The crossing is solved in elapsed days from the time origin
    /// of this fit, counted from `reference`, which should be that same origin,
    /// then rounded to the nearest midnight (see [Date::round_days]).
    /// The crossing may lie before the latest observation.
    ///
    /// ## Errors
    /// - [FitError::NoCrossing] for a flat trend that is not already on target.
    /// A flat trend on target crosses on the day of `reference`.
    /// - [FitError::OutOfRange] when the crossing lies too far away.
    pub fn crossing_date(&self, target: f64, reference: Date) -> Result<Date, FitError> {
        if self.slope == 0.0 {
            if self.intercept == target {
                return Ok(reference.round_days(0.0));
            }
            return Err(FitError::NoCrossing { target });
        }

        let elapsed_days = (target - self.intercept) / self.slope;

        if !elapsed_days.is_finite() || elapsed_days.abs() > MAX_ELAPSED_DAYS {
            return Err(FitError::OutOfRange {
                target,
                elapsed_days,
            });
        }

        Ok(reference.round_days(elapsed_days))
    }

    /// Returns the [Date] at which the trend equals `target`,
    /// counted from the time origin of this fit.
    pub fn threshold_crossing(&self, target: f64) -> Result<Date, FitError> {
        self.crossing_date(target, self.reference)
    }
}
