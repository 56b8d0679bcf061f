//! PSA trend estimation
mod fit;
mod fitted;
mod statistics;

pub use fit::{fit, FitError};
pub use fitted::{FittedTrend, DAYS_PER_YEAR};
pub use statistics::{CoefficientStatistics, FitStatistics};
