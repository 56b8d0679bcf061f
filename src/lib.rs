#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

pub mod date;
pub mod errors;
pub mod observation;
pub mod series;
pub mod trend;


pub mod prelude {
    pub use crate::{
        date::Date,
        errors::ParsingError,
        observation::Observation,
        series::{Column, Series, SeriesSummary, DEFAULT_SOURCE},
        trend::{
            fit, CoefficientStatistics, FitError, FitStatistics, FittedTrend, DAYS_PER_YEAR,
        },
    };

    // pub re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
}
