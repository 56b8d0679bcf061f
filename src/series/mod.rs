//! PSA result series
mod parsing;
mod summary;

pub use parsing::Column;
pub use summary::SeriesSummary;

use crate::prelude::{Date, Observation, ParsingError};
use itertools::Itertools;

use std::{
    fs::File,
    io::{BufReader, Read},
    iter::FromIterator,
    path::Path,
};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Source label of observations parsed with no source information.
pub const DEFAULT_SOURCE: &str = "unknown";

/// [Series] of [Observation]s, sorted by ascending [Date].
/// Observations sharing the same [Date] are all kept, in recording order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Series {
    observations: Vec<Observation>,
}

/// Deduces the default source label from a file name:
/// extensions are dropped as well as a leading "psa_" marker,
/// so "psa_perry.csv.gz" is labeled "perry".
fn source_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let stem = name.split('.').next().unwrap_or_default();

    let lowercase = stem.to_ascii_lowercase();
    let label = if lowercase.starts_with("psa_") || lowercase.starts_with("psa-") {
        &stem[4..]
    } else {
        stem
    };

    if label.is_empty() {
        stem.to_string()
    } else {
        label.to_string()
    }
}

impl Series {
    /// Builds a new [Series] from unordered [Observation]s.
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by(|a, b| a.date.cmp(&b.date));
        Self { observations }
    }

    /// Parses a [Series] from any [Read]able delimited text input.
    /// `default_source` labels observations when no source column exists.
    pub fn parse<R: Read>(
        reader: &mut BufReader<R>,
        default_source: &str,
    ) -> Result<Self, ParsingError> {
        let observations = parsing::parse_observations(reader, default_source)?;
        Ok(Self::new(observations))
    }

    /// Parses a [Series] from a readable file.
    /// The file name serves as default source label.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let path = path.as_ref();
        let fd = File::open(path)?;
        let mut reader = BufReader::new(fd);
        Self::parse(&mut reader, &source_label(path))
    }

    /// Parses a [Series] from a gzip compressed file.
    /// The file name serves as default source label.
    #[cfg(feature = "flate2")]
    #[cfg_attr(docrs, doc(cfg(feature = "flate2")))]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        let path = path.as_ref();
        let fd = File::open(path)?;
        let mut reader = BufReader::new(GzDecoder::new(fd));
        Self::parse(&mut reader, &source_label(path))
    }

    /// Returns total number of [Observation]s, including missing values.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if this [Series] has no [Observation] at all.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterates all [Observation]s in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.observations.iter()
    }

    /// Iterates (date, value) pairs of the [Observation]s
    /// that carry a value, in chronological order.
    pub fn valid(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.observations
            .iter()
            .filter_map(|obs| obs.value.map(|value| (obs.date, value)))
    }

    /// Returns earliest [Date] in this [Series].
    pub fn first_date(&self) -> Option<Date> {
        self.observations.first().map(|obs| obs.date)
    }

    /// Returns latest [Date] in this [Series].
    pub fn last_date(&self) -> Option<Date> {
        self.observations.last().map(|obs| obs.date)
    }

    /// Returns distinct sources, in order of first appearance.
    pub fn sources(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|obs| obs.source.clone())
            .unique()
            .collect()
    }

    /// Returns the [Series] recorded by this source only.
    pub fn by_source(&self, source: &str) -> Self {
        Self {
            observations: self
                .observations
                .iter()
                .filter(|obs| obs.source == source)
                .cloned()
                .collect(),
        }
    }

    /// Splits this [Series] into one [Series] per source,
    /// in order of first appearance.
    pub fn split_by_source(&self) -> Vec<(String, Self)> {
        self.sources()
            .into_iter()
            .map(|source| {
                let series = self.by_source(&source);
                (source, series)
            })
            .collect()
    }

    /// Merges two [Series] into a new chronological [Series].
    pub fn merge(&self, rhs: &Self) -> Self {
        let observations = self
            .observations
            .iter()
            .chain(rhs.observations.iter())
            .cloned()
            .collect();
        Self::new(observations)
    }

    /// Merges `rhs` into self.
    pub fn merge_mut(&mut self, rhs: &Self) {
        *self = self.merge(rhs);
    }

    /// Returns the [SeriesSummary] of this dataset.
    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary::new(self)
    }
}

impl FromIterator<Observation> for Series {
    fn from_iter<T: IntoIterator<Item = Observation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl std::str::FromStr for Series {
    type Err = ParsingError;

    /// Parses a [Series] from delimited text content,
    /// labeling observations with no source as [DEFAULT_SOURCE].
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut reader = BufReader::new(content.as_bytes());
        Self::parse(&mut reader, DEFAULT_SOURCE)
    }
}

#[cfg(test)]
mod test {
    use super::{source_label, Series, DEFAULT_SOURCE};
    use crate::prelude::{Date, Observation};
    use std::path::Path;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn labels() {
        for (path, expected) in [
            ("data/psa_perry.csv", "perry"),
            ("psa_proudlove.csv.gz", "proudlove"),
            ("PSA-Smith.txt", "Smith"),
            ("/tmp/results.csv", "results"),
            ("psa_.csv", "psa_"),
        ] {
            assert_eq!(source_label(Path::new(path)), expected, "failed for {}", path);
        }
    }

    #[test]
    fn ordering() {
        let series = Series::new(vec![
            Observation::new(date("2014-04-22"), 0.02, "perry"),
            Observation::new(date("2013-10-18"), 0.01, "proudlove"),
            Observation::missing(date("2014-04-22"), "proudlove"),
            Observation::new(date("2013-12-01"), 0.03, "perry"),
        ]);

        assert_eq!(series.len(), 4);
        assert_eq!(series.first_date(), Some(date("2013-10-18")));
        assert_eq!(series.last_date(), Some(date("2014-04-22")));

        let dates: Vec<_> = series.iter().map(|obs| obs.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2013-10-18", "2013-12-01", "2014-04-22", "2014-04-22"]
        );

        // equal dates: recording order preserved
        let last: Vec<_> = series.iter().skip(2).map(|obs| obs.value).collect();
        assert_eq!(last, vec![Some(0.02), None]);

        let valid: Vec<_> = series.valid().map(|(_, value)| value).collect();
        assert_eq!(valid, vec![0.01, 0.03, 0.02]);

        assert_eq!(series.sources(), vec!["proudlove", "perry"]);
    }

    #[test]
    fn sources() {
        let proudlove: Series = vec![
            Observation::new(date("2013-10-18"), 0.01, "proudlove"),
            Observation::new(date("2014-10-20"), 0.04, "proudlove"),
        ]
        .into_iter()
        .collect();

        let perry: Series = vec![
            Observation::new(date("2014-04-22"), 0.02, "perry"),
            Observation::new(date("2015-04-22"), 0.05, "perry"),
        ]
        .into_iter()
        .collect();

        let merged = proudlove.merge(&perry);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.sources(), vec!["proudlove", "perry"]);

        let values: Vec<_> = merged.valid().map(|(_, value)| value).collect();
        assert_eq!(values, vec![0.01, 0.02, 0.04, 0.05]);

        assert_eq!(merged.by_source("perry"), perry);
        assert!(merged.by_source("nobody").is_empty());

        let split = merged.split_by_source();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0], ("proudlove".to_string(), proudlove.clone()));
        assert_eq!(split[1], ("perry".to_string(), perry.clone()));

        let mut series = proudlove;
        series.merge_mut(&perry);
        assert_eq!(series, merged);
    }

    #[test]
    fn from_str() {
        let series: Series = "Date,PSA\n2014-04-22,0.02\n2013-10-18,\n".parse().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.sources(), vec![DEFAULT_SOURCE]);
        assert_eq!(series.first_date(), Some(date("2013-10-18")));
        assert_eq!(series.valid().count(), 1);

        assert!("".parse::<Series>().is_err());

        let series: Series = "\u{feff}Date,PSA\n2020-01-01,1.0\n".parse().unwrap();
        assert_eq!(series.first_date(), Some(date("2020-01-01")));
    }
}
