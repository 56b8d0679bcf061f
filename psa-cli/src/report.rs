//! Textual summary
use crate::config::PlotConfig;
use psa::prelude::{CoefficientStatistics, FitError, FittedTrend, Series};

use std::fmt::Write;

fn p_value(stats: &CoefficientStatistics) -> String {
    match stats.p_value {
        Some(p) => format!("p = {:.4}", p),
        None => "p = n/a".to_string(),
    }
}

/// One fitted series of the report
#[derive(Debug, Clone)]
pub struct Entry {
    /// Series label
    pub label: String,
    /// Fitted series
    pub series: Series,
    /// Fit outcome
    pub fit: Result<FittedTrend, FitError>,
}

/// Full report: dataset summary followed by one section per fitted series.
#[derive(Debug, Clone)]
pub struct Report {
    summary: String,
    entries: Vec<Entry>,
    threshold: f64,
    unit: String,
}

impl Report {
    pub fn new(series: &Series, config: &PlotConfig) -> Self {
        Self {
            summary: series.summary().to_string(),
            entries: Vec::with_capacity(4),
            threshold: config.threshold,
            unit: config.unit.clone(),
        }
    }

    /// Adds one fitted series to this [Report].
    pub fn push(&mut self, label: &str, series: Series, fit: Result<FittedTrend, FitError>) {
        self.entries.push(Entry {
            label: label.to_string(),
            series,
            fit,
        });
    }

    /// Entries reported so far
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn format_entry(&self, entry: &Entry, s: &mut String) -> std::fmt::Result {
        writeln!(s, "[{}]", entry.label)?;

        let trend = match &entry.fit {
            Ok(trend) => trend,
            Err(FitError::InsufficientData(n)) => {
                return writeln!(s, "insufficient data: {} valid observation(s)", n);
            },
            Err(e) => return writeln!(s, "fit failure: {}", e),
        };

        let stats = &trend.statistics;

        writeln!(s, "observations: {} since {}", stats.n, trend.reference)?;
        writeln!(
            s,
            "intercept: {:.4} {} ({})",
            trend.intercept,
            self.unit,
            p_value(&stats.intercept)
        )?;
        writeln!(
            s,
            "slope: {:.3e} {}/day, {:.4} {}/year ({})",
            trend.slope,
            self.unit,
            trend.slope_per_year(),
            self.unit,
            p_value(&stats.slope)
        )?;

        match (stats.r_squared, stats.adjusted_r_squared) {
            (Some(r2), Some(adjusted)) => {
                writeln!(s, "R²: {:.4} (adjusted {:.4})", r2, adjusted)?
            },
            (Some(r2), None) => writeln!(s, "R²: {:.4}", r2)?,
            _ => writeln!(s, "R²: n/a")?,
        }

        match trend.threshold_crossing(self.threshold) {
            Ok(date) => {
                let crossed = entry
                    .series
                    .last_date()
                    .map(|last| date <= last)
                    .unwrap_or(false);

                if crossed {
                    writeln!(
                        s,
                        "trend crossed {} {} on {}",
                        self.threshold, self.unit, date
                    )
                } else {
                    writeln!(
                        s,
                        "trend reaches {} {} on {}",
                        self.threshold, self.unit, date
                    )
                }
            },
            Err(FitError::NoCrossing { .. }) => writeln!(
                s,
                "flat trend: never reaches {} {}",
                self.threshold, self.unit
            ),
            Err(e) => writeln!(s, "no crossing date: {}", e),
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = String::with_capacity(1024);
        s.push_str(&self.summary);

        for entry in self.entries.iter() {
            s.push('\n');
            self.format_entry(entry, &mut s)?;
        }

        f.write_str(&s)
    }
}
