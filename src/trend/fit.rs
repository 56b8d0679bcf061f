//! Linear trend fitting
use log::{debug, trace};
use polyfit_rs::polyfit_rs::polyfit;
use thiserror::Error;

use crate::prelude::{Date, FitStatistics, FittedTrend, Series};

/// Trend estimation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// At least two valid observations are required to fit
    #[error("trend fitting requires at least 2 valid observations, got {0}")]
    InsufficientData(usize),
    /// Linear regression failure: all observations share the same date,
    /// or extreme values were encountered.
    #[error("linear regression failure")]
    LinearRegressionFailure,
    /// Flat trend that never reaches the target value
    #[error("flat trend never reaches {target}")]
    NoCrossing { target: f64 },
    /// Crossing lies beyond representable dates
    #[error("crossing of {target} is {elapsed_days} days away, out of range")]
    OutOfRange { target: f64, elapsed_days: f64 },
}

/// Fits `value = intercept + slope * elapsed_days` to the [Series],
/// in the ordinary least squares sense.
///
/// ## Input
/// - series: [Series] to fit. Observations with missing values
/// do not contribute, at least two valid observations are required.
/// - reference: [Date] used as time origin. Defaults to the earliest
/// [Date] of the [Series].
///
/// ## Output
/// - [FittedTrend] whose predictions are aligned to the
/// valid observations only.
/// ```
/// use psa::prelude::{fit, Date, Observation, Series};
///
/// let t0 = Date::from_ymd(2020, 1, 1).unwrap();
/// let series = Series::new(vec![
///     Observation::new(t0, 1.0, "lab"),
///     Observation::new(t0.add_days(10), 2.0, "lab"),
///     Observation::new(t0.add_days(20), 3.0, "lab"),
/// ]);
///
/// let trend = fit(&series, None).unwrap();
/// assert!((trend.slope - 0.1).abs() < 1e-9);
/// assert!((trend.intercept - 1.0).abs() < 1e-9);
/// assert_eq!(trend.crossing_date(3.0, t0).unwrap(), t0.add_days(20));
/// ```
pub fn fit(series: &Series, reference: Option<Date>) -> Result<FittedTrend, FitError> {
    let (dates, values): (Vec<Date>, Vec<f64>) = series.valid().unzip();

    if values.len() < 2 {
        return Err(FitError::InsufficientData(values.len()));
    }

    let reference = reference
        .or_else(|| series.first_date())
        .unwrap_or(dates[0]);

    let x_t = dates
        .iter()
        .map(|t| t.elapsed_days(reference))
        .collect::<Vec<_>>();

    if x_t.iter().all(|x| *x == x_t[0]) {
        debug!("{}: single date, can't fit", dates[0]);
        return Err(FitError::LinearRegressionFailure);
    }

    let (intercept, slope) = if values.iter().all(|y| *y == values[0]) {
        trace!("constant series: flat trend");
        (values[0], 0.0)
    } else {
        let fit = polyfit(&x_t, &values, 1).map_err(|_| FitError::LinearRegressionFailure)?;

        match fit.as_slice() {
            [b, a, ..] if a.is_finite() && b.is_finite() => (*b, *a),
            _ => return Err(FitError::LinearRegressionFailure),
        }
    };

    let predicted = x_t
        .iter()
        .map(|x| intercept + slope * x)
        .collect::<Vec<_>>();

    let statistics = FitStatistics::new(&x_t, &values, &predicted, intercept, slope);

    debug!(
        "fitted {} observations from {}: intercept={} slope={}/day",
        values.len(),
        reference,
        intercept,
        slope
    );

    Ok(FittedTrend {
        reference,
        intercept,
        slope,
        dates,
        elapsed_days: x_t,
        values,
        predicted,
        statistics,
    })
}

impl Series {
    /// Fits a linear trend to this [Series], using its earliest [Date]
    /// as time origin. See [fit].
    pub fn fit_trend(&self) -> Result<FittedTrend, FitError> {
        fit(self, None)
    }
}

#[cfg(test)]
mod test {
    use super::{fit, FitError};
    use crate::prelude::{Date, Observation, Series};
    use rand::{thread_rng, Rng};

    fn day(days: i64) -> Date {
        Date::from_ymd(2013, 10, 18).unwrap().add_days(days)
    }

    fn series(points: &[(i64, Option<f64>)]) -> Series {
        points
            .iter()
            .map(|(days, value)| match value {
                Some(value) => Observation::new(day(*days), *value, "lab"),
                None => Observation::missing(day(*days), "lab"),
            })
            .collect()
    }

    #[test]
    fn exact_line() {
        let series = series(&[(0, Some(1.0)), (10, Some(2.0)), (20, Some(3.0))]);
        let trend = fit(&series, None).unwrap();

        assert_eq!(trend.reference, day(0));
        assert!((trend.slope - 0.1).abs() < 1e-9);
        assert!((trend.intercept - 1.0).abs() < 1e-9);
        assert_eq!(trend.elapsed_days, vec![0.0, 10.0, 20.0]);

        for residual in trend.residuals() {
            assert!(residual.abs() < 1e-9);
        }

        assert!((trend.statistics.r_squared.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(trend.crossing_date(3.0, day(0)), Ok(day(20)));
        assert_eq!(trend.threshold_crossing(3.0), Ok(day(20)));
        assert_eq!(trend.threshold_crossing(4.0), Ok(day(30)));
    }

    #[test]
    fn predict_origin() {
        let series = series(&[(0, Some(0.01)), (183, Some(0.03)), (365, Some(0.02))]);
        let trend = fit(&series, None).unwrap();
        assert_eq!(trend.predict(0.0), trend.intercept);
    }

    #[test]
    fn missing_values_are_excluded() {
        let series = series(&[(0, Some(1.0)), (5, None), (20, Some(3.0))]);
        let trend = fit(&series, None).unwrap();

        assert_eq!(trend.statistics.n, 2);
        assert_eq!(trend.dates, vec![day(0), day(20)]);
        assert_eq!(trend.predicted.len(), 2);
        assert!(!trend.dates.contains(&day(5)));
        assert!((trend.slope - 0.1).abs() < 1e-9);
        assert!((trend.intercept - 1.0).abs() < 1e-9);

        // missing value on the earliest date still sets the default origin
        let series = self::series(&[(-10, None), (0, Some(1.0)), (20, Some(3.0))]);
        let trend = fit(&series, None).unwrap();
        assert_eq!(trend.reference, day(-10));
        assert_eq!(trend.elapsed_days, vec![10.0, 30.0]);
        assert!((trend.intercept).abs() < 1e-9);
        assert_eq!(trend.dates, vec![day(0), day(20)]);
    }

    #[test]
    fn insufficient_data() {
        assert_eq!(
            fit(&Series::default(), None),
            Err(FitError::InsufficientData(0))
        );
        assert_eq!(
            fit(&series(&[(0, Some(1.0))]), None),
            Err(FitError::InsufficientData(1))
        );
        assert_eq!(
            fit(&series(&[(0, Some(1.0)), (10, None), (20, None)]), None),
            Err(FitError::InsufficientData(1))
        );
    }

    #[test]
    fn single_date() {
        let series = series(&[(7, Some(1.0)), (7, Some(2.0))]);
        assert_eq!(fit(&series, None), Err(FitError::LinearRegressionFailure));
    }

    #[test]
    fn constant_values() {
        let series = series(&[(0, Some(0.1)), (30, Some(0.1)), (60, Some(0.1)), (90, Some(0.1))]);
        let trend = fit(&series, None).unwrap();

        assert_eq!(trend.slope, 0.0);
        assert_eq!(trend.intercept, 0.1);
        assert!(trend.statistics.r_squared.is_none());

        assert_eq!(
            trend.crossing_date(3.0, day(0)),
            Err(FitError::NoCrossing { target: 3.0 })
        );
        assert_eq!(trend.crossing_date(0.1, day(0)), Ok(day(0)));
    }

    #[test]
    fn explicit_reference() {
        let series = series(&[(0, Some(1.0)), (10, Some(2.0)), (20, Some(3.0))]);
        let trend = fit(&series, Some(day(-100))).unwrap();

        assert_eq!(trend.reference, day(-100));
        assert_eq!(trend.elapsed_days, vec![100.0, 110.0, 120.0]);
        assert!((trend.intercept - (-9.0)).abs() < 1e-6);
        assert!((trend.slope - 0.1).abs() < 1e-9);
        assert_eq!(trend.crossing_date(3.0, day(-100)), Ok(day(20)));
    }

    #[test]
    fn decreasing_trend() {
        let series = series(&[(0, Some(4.0)), (100, Some(3.5)), (200, Some(3.0))]);
        let trend = fit(&series, None).unwrap();

        assert!((trend.slope + 0.005).abs() < 1e-9);
        // crossed upwards target before the earliest observation
        assert_eq!(trend.crossing_date(5.0, day(0)), Ok(day(-200)));
        assert_eq!(trend.crossing_date(3.0, day(0)), Ok(day(200)));
    }

    #[test]
    fn time_of_day_origin() {
        let series: Series = "Date,PSA
2020-01-01T12:00:00,1.0
2020-01-11T12:00:00,2.0
2020-01-21T12:00:00,3.0"
            .parse()
            .unwrap();

        let trend = fit(&series, None).unwrap();
        assert_eq!(trend.elapsed_days, vec![0.0, 10.0, 20.0]);

        // crossing instants: 2020-01-21T21:36 and 2020-01-21T02:24
        let late = trend.threshold_crossing(3.04).unwrap();
        assert_eq!(late, Date::from_ymd(2020, 1, 22).unwrap());
        assert_eq!(late, "2020-01-22".parse::<Date>().unwrap());

        let early = trend.threshold_crossing(2.96).unwrap();
        assert_eq!(early, Date::from_ymd(2020, 1, 21).unwrap());
        assert_eq!(early.midnight(), early);
    }

    #[test]
    fn crossing_out_of_range() {
        let series = series(&[(0, Some(1.0)), (1, Some(1.0 + 1.0E-9))]);
        let trend = fit(&series, None).unwrap();
        assert!(trend.slope > 0.0);
        assert!(matches!(
            trend.crossing_date(3.0, day(0)),
            Err(FitError::OutOfRange { .. })
        ));
    }

    #[test]
    fn normal_equations() {
        let mut rng = thread_rng();

        for _ in 0..64 {
            let size = rng.gen_range(2..40);
            let mut days = 0_i64;
            let mut points = Vec::with_capacity(size);

            for _ in 0..size {
                days += rng.gen_range(1..200);
                let value = if rng.gen_bool(0.1) {
                    None
                } else {
                    Some(rng.gen_range(0.0..10.0))
                };
                points.push((days, value));
            }

            let series = series(&points);

            let trend = match fit(&series, None) {
                Ok(trend) => trend,
                Err(FitError::InsufficientData(n)) => {
                    assert!(n < 2);
                    continue;
                },
                Err(e) => panic!("unexpected error: {}", e),
            };

            assert_eq!(trend.predicted.len(), trend.dates.len());
            assert_eq!(trend.values.len(), trend.dates.len());

            let residuals = trend.residuals();
            let scale = trend.values.iter().map(|y| y.abs()).fold(1.0_f64, f64::max);
            let x_scale = trend.elapsed_days.iter().fold(1.0_f64, |a, x| a.max(*x));

            let sum = residuals.iter().sum::<f64>();
            assert!(
                sum.abs() < 1.0E-6 * scale * residuals.len() as f64,
                "residual sum {} for {:?}",
                sum,
                points
            );

            let weighted = residuals
                .iter()
                .zip(trend.elapsed_days.iter())
                .map(|(r, x)| r * x)
                .sum::<f64>();

            assert!(
                weighted.abs() < 1.0E-6 * scale * x_scale * residuals.len() as f64,
                "weighted residual sum {} for {:?}",
                weighted,
                points
            );
        }
    }
}
