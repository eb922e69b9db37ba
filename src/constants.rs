//! # Constants and type definitions for the almanac
//!
//! This module centralizes the **physical constants**, **conversion factors** and the
//! **type aliases** shared by the ephemeris reader, the Earth orientation model, the
//! observer geometry and the report pipeline.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants (AU, speed of light, WGS84 ellipsoid, GM☉)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, days ↔ seconds)
//! - Reference epochs (J2000.0, Hipparcos J1991.25)
//! - Fixed parameters of the report (window length, number of elongation samples)

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Julian Date (TT) of the Hipparcos catalog epoch J1991.25
pub const HIPPARCOS_EPOCH_JD: f64 = 2_448_349.0625;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Inverse flattening of the WGS84 ellipsoid
pub const EARTH_INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Ratio of the sidereal rotation rate to the solar day
pub const SIDEREAL_RATE: f64 = 1.002_737_909_35;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in astronomical units per day
pub const VLIGHT_AU: f64 = VLIGHT / AU * SECONDS_PER_DAY;

/// Heliocentric gravitational constant in km³/s² (Pitjeva 2005)
pub const GM_SUN_PITJEVA_2005: f64 = 132_712_440_042.0;

/// Mean obliquity of the ecliptic at J2000.0 in arcseconds (IAU 1980)
pub const OBLIQUITY_J2000_ARCSEC: f64 = 84381.448;

// -------------------------------------------------------------------------------------------------
// Report parameters
// -------------------------------------------------------------------------------------------------

/// Length of the analysis window in hours
pub const WINDOW_HOURS: i64 = 24;

/// Number of forward elongation samples printed per target
pub const ELONGATION_SAMPLES: usize = 12;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
