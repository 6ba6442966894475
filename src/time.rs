//! Civil time ↔ ephemeris time conversion.
//!
//! All trajectory queries run on **ephemeris time** (ET): continuous TDB
//! seconds past the J2000 epoch, the scale the planetary kernels are indexed
//! by. Civil timestamps (UTC) are parsed and rendered through
//! [hifitime](https://docs.rs/hifitime), whose compiled-in leap-second table
//! is loaded once and is immutable for the lifetime of the process.

use std::fmt;
use std::str::FromStr;

use hifitime::{Duration, Epoch, TimeScale};

use crate::almanac_errors::AlmanacError;
use crate::constants::MJD;

/// One point on the continuous ephemeris time scale.
///
/// Wraps a [`hifitime::Epoch`], so the civil-calendar representation is
/// reconstructable without precision loss. Ordering and equality follow the
/// underlying epoch.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Instant(Epoch);

impl Instant {
    /// Parse a civil UTC timestamp in the `YYYY-MM-DDTHH:MM:SS` format.
    ///
    /// Arguments
    /// ---------
    /// * `date`: the civil timestamp string.
    ///
    /// Return
    /// ------
    /// * The corresponding [`Instant`], or [`AlmanacError::InvalidTimestamp`]
    ///   when the string is malformed or names an impossible date.
    pub fn from_utc_str(date: &str) -> Result<Self, AlmanacError> {
        Epoch::from_str(date)
            .map(Instant)
            .map_err(|err| AlmanacError::InvalidTimestamp(format!("{date}: {err}")))
    }

    /// Parse a fractional-day UTC timestamp in the `YYYY MM DD.FFFFF` format.
    ///
    /// Arguments
    /// ---------
    /// * `date_str`: the fractional-day timestamp string.
    ///
    /// Return
    /// ------
    /// * The corresponding [`Instant`], or [`AlmanacError::InvalidTimestamp`].
    pub fn from_frac_date_str(date_str: &str) -> Result<Self, AlmanacError> {
        let invalid = |what: &str| AlmanacError::InvalidTimestamp(format!("{date_str}: {what}"));

        let parts: Vec<&str> = date_str.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(invalid("expected YYYY MM DD.FFFFF"));
        }

        let year = i32::from_str(parts[0]).map_err(|_| invalid("invalid year"))?;
        let month = u8::from_str(parts[1]).map_err(|_| invalid("invalid month"))?;
        let day_fraction = f64::from_str(parts[2]).map_err(|_| invalid("invalid frac day"))?;

        // Separation of day and fraction day
        let day = day_fraction.trunc() as u8;
        let fraction = day_fraction - day as f64;

        let hour = (fraction * 24.0).trunc() as u8;
        let minute = ((fraction * 24.0 - hour as f64) * 60.0).trunc() as u8;
        let second = (((fraction * 24.0 - hour as f64) * 60.0 - minute as f64) * 60.0) as u8;
        let nano = ((((fraction * 24.0 - hour as f64) * 60.0 - minute as f64) * 60.0
            - second as f64)
            * 1e9) as u32;

        Epoch::maybe_from_gregorian(year, month, day, hour, minute, second, nano, TimeScale::UTC)
            .map(Instant)
            .map_err(|err| invalid(&err.to_string()))
    }

    /// Build an instant directly from ephemeris seconds past J2000.
    pub fn from_et_seconds(et_seconds: f64) -> Self {
        Instant(Epoch::from_et_seconds(et_seconds))
    }

    /// Ephemeris seconds past J2000, the scale used for all trajectory queries.
    pub fn et_seconds(&self) -> f64 {
        self.0.to_et_seconds()
    }

    /// Modified Julian Date on the TT scale, used by the frame rotation models.
    pub fn mjd_tt(&self) -> MJD {
        self.0.to_mjd_tt_days()
    }

    /// The underlying [`hifitime::Epoch`].
    pub fn epoch(&self) -> Epoch {
        self.0
    }

    /// Render the civil UTC representation, rounded to the nearest second.
    ///
    /// Rounding keeps the representation stable for instants rebuilt from the
    /// floating-point ephemeris seconds, which can land a few nanoseconds off
    /// the original epoch.
    pub fn to_utc_string(&self) -> String {
        let rounded = self.0.round(Duration::from_seconds(1.0));
        let (year, month, day, hour, minute, second, _) = rounded.to_gregorian_utc();
        format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}")
    }

    /// This instant shifted by a signed number of seconds.
    pub fn offset_seconds(&self, seconds: f64) -> Self {
        Instant(self.0 + Duration::from_seconds(seconds))
    }

    /// Half-open time grid from `start` (inclusive) to `end` (exclusive) in
    /// fixed steps, matching the hourly sampling loops of sky-map series.
    ///
    /// A non-positive step yields an empty grid.
    pub fn grid(start: Instant, end: Instant, step_seconds: f64) -> Vec<Instant> {
        if step_seconds <= 0.0 {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut index = 0u64;
        loop {
            let sample = start.offset_seconds(step_seconds * index as f64);
            if sample >= end {
                break;
            }
            out.push(sample);
            index += 1;
        }
        out
    }

    /// `samples` instants evenly spaced from `start` to `end`, both inclusive.
    pub fn linspace(start: Instant, end: Instant, samples: usize) -> Vec<Instant> {
        match samples {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let span = end.et_seconds() - start.et_seconds();
                let step = span / (n - 1) as f64;
                (0..n)
                    .map(|i| start.offset_seconds(step * i as f64))
                    .collect()
            }
        }
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_utc_string())
    }
}

#[cfg(test)]
mod time_test {
    use super::*;

    #[test]
    fn test_utc_round_trip() {
        for date in ["2023-01-01T00:00:00", "2024-10-01T12:34:56", "2000-01-01T12:00:00"] {
            let instant = Instant::from_utc_str(date).unwrap();
            assert_eq!(instant.to_utc_string(), date);
        }
    }

    #[test]
    fn test_invalid_timestamps() {
        assert!(matches!(
            Instant::from_utc_str("not-a-date"),
            Err(AlmanacError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            Instant::from_utc_str("2023-13-01T00:00:00"),
            Err(AlmanacError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            Instant::from_utc_str("2023-02-30T00:00:00"),
            Err(AlmanacError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_et_seconds_round_trip() {
        let instant = Instant::from_utc_str("2023-01-01T00:00:00").unwrap();
        let back = Instant::from_et_seconds(instant.et_seconds());
        assert!((back.et_seconds() - instant.et_seconds()).abs() < 1e-6);
        assert_eq!(back.to_utc_string(), "2023-01-01T00:00:00");
    }

    #[test]
    fn test_et_is_monotonic_in_civil_time() {
        let earlier = Instant::from_utc_str("2023-01-01T00:00:00").unwrap();
        let later = Instant::from_utc_str("2023-01-01T00:00:01").unwrap();
        assert!(later.et_seconds() > earlier.et_seconds());
        assert!(later > earlier);
    }

    #[test]
    fn test_frac_date() {
        let instant = Instant::from_frac_date_str("2021 1 1.5").unwrap();
        assert_eq!(instant.to_utc_string(), "2021-01-01T12:00:00");

        assert!(Instant::from_frac_date_str("2021 1").is_err());
        assert!(Instant::from_frac_date_str("2021 xx 1.5").is_err());
    }

    #[test]
    fn test_grid() {
        let start = Instant::from_utc_str("2023-01-01T00:00:00").unwrap();
        let end = Instant::from_utc_str("2023-01-01T06:00:00").unwrap();
        let grid = Instant::grid(start, end, 3600.0);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], start);
        assert_eq!(grid[5].to_utc_string(), "2023-01-01T05:00:00");

        assert!(Instant::grid(start, end, 0.0).is_empty());
        assert!(Instant::grid(end, start, 3600.0).is_empty());
    }

    #[test]
    fn test_linspace() {
        let start = Instant::from_utc_str("2000-01-01T00:00:00").unwrap();
        let end = Instant::from_utc_str("2000-01-11T00:00:00").unwrap();
        let samples = Instant::linspace(start, end, 11);
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0], start);
        assert!((samples[10].et_seconds() - end.et_seconds()).abs() < 1e-6);
        assert_eq!(samples[5].to_utc_string(), "2000-01-06T00:00:00");

        assert!(Instant::linspace(start, end, 0).is_empty());
        assert_eq!(Instant::linspace(start, end, 1), vec![start]);
    }
}
