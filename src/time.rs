//! # Time handling
//!
//! Instants are carried as [`hifitime::Epoch`] throughout the crate: the
//! ephemeris is indexed in TDB, Earth orientation in TT and sidereal time in UTC.
//! `chrono` only appears at the edges, to parse a configured start instant and to
//! render instants on the observer's wall clock.
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use hifitime::{Duration, Epoch, Unit};

use crate::{almanac_errors::AlmanacError, constants::WINDOW_HOURS};

/// The analysis window `[start, start + 24 h]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl TimeWindow {
    pub fn starting_at(start: Epoch) -> Self {
        TimeWindow {
            start,
            end: start + Unit::Hour * WINDOW_HOURS,
        }
    }

    /// Window starting at the current instant.
    pub fn from_now() -> Result<Self, AlmanacError> {
        let now = Epoch::now().map_err(|err| AlmanacError::InvalidStartTime(err.to_string()))?;
        Ok(Self::starting_at(now))
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when `epoch` lies strictly between the window bounds.
    pub fn contains(&self, epoch: &Epoch) -> bool {
        self.start < *epoch && *epoch < self.end
    }

    /// `start + n · step_days`, the instants of the future elongation samples.
    pub fn sample_after_start(&self, n: usize, step_days: f64) -> Epoch {
        self.start + Unit::Day * (step_days * n as f64)
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz, AlmanacError> {
    name.parse::<Tz>()
        .map_err(|_| AlmanacError::InvalidTimezone(name.to_string()))
}

/// Parse an RFC 3339 instant, e.g. `2024-10-17T21:00:00-05:00`.
pub fn parse_start(text: &str) -> Result<Epoch, AlmanacError> {
    let datetime = DateTime::parse_from_rfc3339(text.trim())
        .map_err(|err| AlmanacError::InvalidStartTime(format!("{text}: {err}")))?;
    Ok(datetime_to_epoch(&datetime.with_timezone(&Utc)))
}

pub fn datetime_to_epoch(datetime: &DateTime<Utc>) -> Epoch {
    Epoch::from_unix_seconds(datetime.timestamp_millis() as f64 / 1000.0)
}

/// UTC calendar time of `epoch`, rounded to the millisecond.
pub fn epoch_to_datetime(epoch: &Epoch) -> Result<DateTime<Utc>, AlmanacError> {
    let millis = (epoch.to_unix_seconds() * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AlmanacError::InvalidStartTime(format!("{epoch} is not representable")))
}

/// Wall-clock rendering `Thu 17 21:05 CDT` of `epoch` in `tz`.
pub fn format_local(epoch: &Epoch, tz: &Tz) -> Result<String, AlmanacError> {
    Ok(epoch_to_datetime(epoch)?
        .with_timezone(tz)
        .format("%a %d %H:%M %Z")
        .to_string())
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_window_is_one_day() {
        let start = Epoch::from_gregorian_utc_hms(2024, 10, 18, 2, 0, 0);
        let window = TimeWindow::starting_at(start);
        assert_eq!(window.duration(), Unit::Day * 1_i64);
        assert!(window.contains(&(start + Unit::Hour * 3_i64)));
        assert!(!window.contains(&start));
        assert!(!window.contains(&window.end));
        assert_relative_eq!(
            (window.sample_after_start(12, 7.0) - start).to_unit(Unit::Day),
            84.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_format_local_daylight_and_standard() {
        let tz = parse_timezone("US/Central").unwrap();

        let summer = Epoch::from_gregorian_utc_hms(2024, 10, 18, 2, 0, 0);
        assert_eq!(format_local(&summer, &tz).unwrap(), "Thu 17 21:00 CDT");

        let winter = Epoch::from_gregorian_utc_hms(2024, 1, 15, 3, 30, 0);
        assert_eq!(format_local(&winter, &tz).unwrap(), "Sun 14 21:30 CST");
    }

    #[test]
    fn test_parse_start() {
        let epoch = parse_start("2024-10-17T21:00:00-05:00").unwrap();
        let expected = Epoch::from_gregorian_utc_hms(2024, 10, 18, 2, 0, 0);
        assert!((epoch - expected).abs() < Unit::Microsecond * 1_i64);
        assert!(matches!(
            parse_start("17/10/2024"),
            Err(AlmanacError::InvalidStartTime(_))
        ));
    }

    #[test]
    fn test_datetime_roundtrip() {
        let epoch = Epoch::from_gregorian_utc_hms(2016, 12, 31, 23, 59, 59);
        let datetime = epoch_to_datetime(&epoch).unwrap();
        assert_eq!(datetime.to_rfc3339(), "2016-12-31T23:59:59+00:00");
        assert!((datetime_to_epoch(&datetime) - epoch).abs() < Unit::Microsecond * 1_i64);
    }

    #[test]
    fn test_unknown_timezone() {
        assert_eq!(
            parse_timezone("Central"),
            Err(AlmanacError::InvalidTimezone("Central".to_string()))
        );
    }
}
