//! Calendar dates
use crate::errors::ParsingError;
use hifitime::{Duration, Epoch, TimeScale};
use scan_fmt::scan_fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exact number of nanoseconds in one day of the [Date] scale.
pub(crate) const NANOSECONDS_PER_DAY: i128 = 86_400_000_000_000;

/// Largest day offset (either direction) a [Date] computation may produce,
/// which is about ten millenia.
pub(crate) const MAX_ELAPSED_DAYS: f64 = 3_652_500.0;

/// [Date] is a calendar day, possibly refined by a time of day.
///
/// Dates live in the TAI timescale, which has no leap seconds:
/// two midnights are always a whole number of 86 400 s days apart,
/// which keeps day arithmetic exact.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Date(Epoch);

impl Date {
    /// Builds the [Date] for midnight of the given calendar day.
    /// ```
    /// use psa::prelude::Date;
    ///
    /// let date = Date::from_ymd(2013, 10, 18).unwrap();
    /// assert_eq!(date.to_string(), "2013-10-18");
    /// assert!(Date::from_ymd(2013, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ParsingError> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    /// Builds a [Date] with a time of day.
    pub fn from_ymd_hms(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, ParsingError> {
        let epoch = Epoch::maybe_from_gregorian(
            year,
            month,
            day,
            hour,
            minute,
            second,
            0,
            TimeScale::TAI,
        )
        .map_err(|_| {
            ParsingError::DateFormat(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            ))
        })?;
        Ok(Self(epoch))
    }

    /// Returns the underlying [Epoch].
    pub fn epoch(&self) -> Epoch {
        self.0
    }

    /// Returns (year, month, day) of this [Date].
    pub fn ymd(&self) -> (i32, u8, u8) {
        let (y, m, d, _, _, _, _) = self.0.to_gregorian_tai();
        (y, m, d)
    }

    /// Real number of days elapsed since `reference`, negative when
    /// this [Date] comes first. Exact for whole days.
    /// ```
    /// use psa::prelude::Date;
    ///
    /// let t0 = Date::from_ymd(2013, 10, 18).unwrap();
    /// let t1 = Date::from_ymd(2014, 4, 22).unwrap();
    /// assert_eq!(t1.elapsed_days(t0), 186.0);
    /// assert_eq!(t0.elapsed_days(t1), -186.0);
    /// ```
    pub fn elapsed_days(&self, reference: Date) -> f64 {
        let nanos = (self.0 - reference.0).total_nanoseconds();
        let days = nanos / NANOSECONDS_PER_DAY;
        let remainder = nanos % NANOSECONDS_PER_DAY;
        days as f64 + remainder as f64 / NANOSECONDS_PER_DAY as f64
    }

    /// Returns the [Date] that is a whole number of `days` away.
    pub fn add_days(&self, days: i64) -> Self {
        let dt = Duration::from_total_nanoseconds(days as i128 * NANOSECONDS_PER_DAY);
        Self(self.0 + dt)
    }

    /// Returns midnight of this calendar day.
    pub fn midnight(&self) -> Self {
        let nanos = self.0.to_tai_duration().total_nanoseconds();
        let time_of_day = nanos.rem_euclid(NANOSECONDS_PER_DAY);
        Self(self.0 - Duration::from_total_nanoseconds(time_of_day))
    }

    /// Returns the midnight nearest to the instant `days` away.
    /// Ties are rounded away from midnight of this [Date].
    /// ```
    /// use psa::prelude::Date;
    ///
    /// let noon = "2020-01-01T12:00:00".parse::<Date>().unwrap();
    /// assert_eq!(noon.round_days(9.6), Date::from_ymd(2020, 1, 11).unwrap());
    /// assert_eq!(noon.round_days(8.9), Date::from_ymd(2020, 1, 10).unwrap());
    /// ```
    pub fn round_days(&self, days: f64) -> Self {
        let midnight = self.midnight();
        let days = self.elapsed_days(midnight) + days;
        midnight.add_days(days.round() as i64)
    }
}

impl From<Epoch> for Date {
    fn from(epoch: Epoch) -> Self {
        Self(epoch)
    }
}

impl std::str::FromStr for Date {
    type Err = ParsingError;

    /// Parses `YYYY-MM-DD`, optionally followed by a `HH:MM:SS` time of day
    /// separated by either 'T' or a blank. '/' may replace '-'.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let content = s.trim().replace('/', "-");
        let err = || ParsingError::DateFormat(s.trim().to_string());

        let (date, time) = match content.find(|c: char| c == 'T' || c == ' ') {
            Some(offset) => (&content[..offset], Some(content[offset + 1..].trim())),
            None => (content.as_str(), None),
        };

        if date.split('-').count() != 3 {
            return Err(err());
        }

        let (y, m, d) = match scan_fmt!(date, "{d}-{d}-{d}", i32, u8, u8) {
            (Some(y), Some(m), Some(d)) => (y, m, d),
            _ => return Err(err()),
        };

        let (hh, mm, ss) = match time {
            Some(time) if !time.is_empty() => {
                if time.split(':').count() != 3 {
                    return Err(err());
                }
                match scan_fmt!(time, "{d}:{d}:{d}", u8, u8, u8) {
                    (Some(hh), Some(mm), Some(ss)) => (hh, mm, ss),
                    _ => return Err(err()),
                }
            },
            _ => (0, 0, 0),
        };

        Self::from_ymd_hms(y, m, d, hh, mm, ss).or(Err(err()))
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (y, m, d) = self.ymd();
        write!(f, "{:04}-{:02}-{:02}", y, m, d)
    }
}
