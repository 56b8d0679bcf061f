use statrs::distribution::{ContinuousCDF, StudentsT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inference on one fitted coefficient.
/// Quantities are None when undefined: no residual degree of freedom,
/// or a null standard error (perfect fit).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoefficientStatistics {
    /// Estimated value
    pub estimate: f64,
    /// Standard error of the estimate
    pub std_error: Option<f64>,
    /// Student t value (estimate / std error)
    pub t_value: Option<f64>,
    /// Two-sided p-value of the null hypothesis (coefficient = 0)
    pub p_value: Option<f64>,
}

/// Regression diagnostics of a fitted trend.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitStatistics {
    /// Number of observations that contributed
    pub n: usize,
    /// Residual degrees of freedom (n - 2)
    pub degrees_of_freedom: usize,
    /// Coefficient of determination.
    /// None when all values are identical.
    pub r_squared: Option<f64>,
    /// R² adjusted for the number of regressors
    pub adjusted_r_squared: Option<f64>,
    /// Residual standard error
    pub residual_std_error: Option<f64>,
    /// Intercept inference
    pub intercept: CoefficientStatistics,
    /// Slope inference (per day)
    pub slope: CoefficientStatistics,
}

impl CoefficientStatistics {
    fn new(estimate: f64, std_error: Option<f64>, t_dist: Option<&StudentsT>) -> Self {
        let std_error = std_error.filter(|std_error| std_error.is_finite());

        let t_value = std_error
            .filter(|std_error| *std_error > 0.0)
            .map(|std_error| estimate / std_error);

        let p_value = match (t_value, t_dist) {
            (Some(t), Some(t_dist)) => Some(2.0 * (1.0 - t_dist.cdf(t.abs()))),
            _ => None,
        };

        Self {
            estimate,
            std_error,
            t_value,
            p_value,
        }
    }
}

impl FitStatistics {
    /// Computes the ordinary least squares diagnostics of
    /// `y = intercept + slope * x`, `predicted` being the fitted values.
    pub(crate) fn new(x: &[f64], y: &[f64], predicted: &[f64], intercept: f64, slope: f64) -> Self {
        let n = y.len();
        let dof = n.saturating_sub(2);

        let n_f64 = n as f64;
        let x_mean = x.iter().sum::<f64>() / n_f64;
        let y_mean = y.iter().sum::<f64>() / n_f64;

        let sse = y
            .iter()
            .zip(predicted.iter())
            .map(|(y, y_hat)| (y - y_hat).powi(2))
            .sum::<f64>();

        let sst = y.iter().map(|y| (y - y_mean).powi(2)).sum::<f64>();
        let sxx = x.iter().map(|x| (x - x_mean).powi(2)).sum::<f64>();

        let r_squared = if sst > 0.0 {
            Some(1.0 - sse / sst)
        } else {
            None
        };

        let adjusted_r_squared = match r_squared {
            Some(r2) if dof > 0 => Some(1.0 - (1.0 - r2) * (n_f64 - 1.0) / dof as f64),
            _ => None,
        };

        let variance = if dof > 0 {
            Some(sse / dof as f64)
        } else {
            None
        };

        let t_dist = if dof > 0 {
            StudentsT::new(0.0, 1.0, dof as f64).ok()
        } else {
            None
        };

        let slope_std_error = variance.map(|variance| (variance / sxx).sqrt());
        let intercept_std_error =
            variance.map(|variance| (variance * (1.0 / n_f64 + x_mean.powi(2) / sxx)).sqrt());

        Self {
            n,
            degrees_of_freedom: dof,
            r_squared,
            adjusted_r_squared,
            residual_std_error: variance.map(|variance| variance.sqrt()),
            intercept: CoefficientStatistics::new(intercept, intercept_std_error, t_dist.as_ref()),
            slope: CoefficientStatistics::new(slope, slope_std_error, t_dist.as_ref()),
        }
    }
}
