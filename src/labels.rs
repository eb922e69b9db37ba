//! # Text labels
//!
//! Conversions from angles to the strings printed in the almanac: compass points,
//! lunar phase names and sexagesimal degrees.
use crate::constants::Degree;

pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Eight phase names, 45° apart from New Moon. The last sector keeps the label
/// `Waxing Crescent` the printed almanac has always used.
pub const PHASE_NAMES: [&str; 8] = [
    "New",
    "Waxing Crescent",
    "First Quarter",
    "Waxing Gibbous",
    "Full",
    "Waning Gibbous",
    "Last Quarter",
    "Waxing Crescent",
];

/// Index of the sector of width `width` nearest to `degrees`, rounding halves up.
fn sector(degrees: Degree, width: f64, count: usize) -> usize {
    let folded = degrees.rem_euclid(360.0);
    ((folded / width + 0.5).floor() as usize) % count
}

/// 16-point compass label of an azimuth (degrees from north through east).
pub fn compass_label(azimuth: Degree) -> &'static str {
    COMPASS_POINTS[sector(azimuth, 22.5, COMPASS_POINTS.len())]
}

/// Phase name of a Moon-Sun ecliptic longitude difference (degrees).
pub fn phase_label(phase: Degree) -> &'static str {
    PHASE_NAMES[sector(phase, 45.0, PHASE_NAMES.len())]
}

/// Sexagesimal rendering `12deg 34' 56.7"` with the arcseconds rounded to one
/// decimal, carrying into minutes and degrees.
pub fn format_dms(degrees: Degree) -> String {
    let sign = if degrees < 0.0 { "-" } else { "" };
    // tenths of arcsecond, half up
    let tenths = (36_000.0 * degrees.abs() + 0.5).floor() as u64;
    let (seconds, tenth) = (tenths / 10, tenths % 10);
    let (minutes, second) = (seconds / 60, seconds % 60);
    let (whole, minute) = (minutes / 60, minutes % 60);
    format!("{sign}{whole:02}deg {minute:02}' {second:02}.{tenth}\"")
}
