//! # Observer geometry
//!
//! A fixed site on the WGS84 ellipsoid and the vectors derived from it:
//!
//! - its **Earth-fixed** position (geodetic → Cartesian),
//! - its **geocentric GCRS** position and velocity at an instant, from the Earth
//!   rotation angle and the inverse precession-nutation matrix,
//! - its **barycentric** state, adding the Earth's state from the planetary ephemeris,
//! - the local **east/north/up** basis used to turn a direction into altitude and azimuth.
//!
//! ```text
//! geodetic --> Earth-fixed --R3(-GAST)--> true of date --(N·P)ᵀ--> GCRS --(+ Earth)--> barycentric
//! ```
//!
//! ## Units
//!
//! - Latitude/longitude in **degrees** (north and east positive), elevation in **meters**.
//! - Positions in **AU**, velocities in **AU/day**; the diurnal velocity is `ω × r`
//!   with `ω = 2π·1.00273790935` rad/day.
use hifitime::Epoch;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    almanac_errors::AlmanacError,
    constants::{Degree, Meter, AU, DPI, EARTH_INVERSE_FLATTENING, EARTH_MAJOR_AXIS, RADEG, SIDEREAL_RATE},
    earth_orientation::EarthOrientation,
    jpl_ephem::{JPLEphem, State},
};

/// Geodetic site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// Geodetic latitude, degrees north.
    pub latitude: Degree,
    /// Longitude, degrees east of Greenwich.
    pub longitude: Degree,
    /// Height above the ellipsoid, meters.
    #[serde(default)]
    pub elevation: Meter,
}

impl Observer {
    /// Build a site, rejecting non-finite values and latitudes outside `[-90, 90]`.
    pub fn new(latitude: Degree, longitude: Degree, elevation: Meter) -> Result<Self, AlmanacError> {
        let observer = Observer {
            latitude,
            longitude,
            elevation,
        };
        observer.validate()?;
        Ok(observer)
    }

    pub fn validate(&self) -> Result<(), AlmanacError> {
        if !(self.latitude.is_finite() && self.longitude.is_finite() && self.elevation.is_finite()) {
            return Err(AlmanacError::InvalidLocation(format!("{self:?}")));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AlmanacError::InvalidLocation(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        Ok(())
    }

    /// Earth-fixed Cartesian position (AU).
    pub fn earth_fixed_position(&self) -> Vector3<f64> {
        let flattening = 1.0 / EARTH_INVERSE_FLATTENING;
        let e2 = flattening * (2.0 - flattening);
        let (sin_lat, cos_lat) = (self.latitude * RADEG).sin_cos();
        let (sin_lon, cos_lon) = (self.longitude * RADEG).sin_cos();

        let n = EARTH_MAJOR_AXIS / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let meters = Vector3::new(
            (n + self.elevation) * cos_lat * cos_lon,
            (n + self.elevation) * cos_lat * sin_lon,
            (n * (1.0 - e2) + self.elevation) * sin_lat,
        );
        meters / (AU * 1000.0)
    }

    /// Geocentric GCRS position (AU) and velocity (AU/day) for a given Earth orientation.
    pub fn geocentric_state(&self, orientation: &EarthOrientation) -> State {
        let fixed = self.earth_fixed_position();
        let omega = Vector3::new(0.0, 0.0, DPI * SIDEREAL_RATE);
        (
            orientation.earth_fixed_to_gcrs(&fixed),
            orientation.earth_fixed_to_gcrs(&omega.cross(&fixed)),
        )
    }

    /// Barycentric GCRS state of the site at `epoch`.
    pub fn barycentric_state(
        &self,
        ephem: &JPLEphem,
        epoch: &Epoch,
        orientation: &EarthOrientation,
    ) -> Result<State, AlmanacError> {
        let (earth_pos, earth_vel) = ephem.earth_ephemeris(epoch)?;
        let (geo_pos, geo_vel) = self.geocentric_state(orientation);
        Ok((earth_pos + geo_pos, earth_vel + geo_vel))
    }

    /// Altitude and azimuth (degrees) of an Earth-fixed direction.
    ///
    /// Azimuth is measured from north through east, in `[0, 360)`.
    pub fn altaz(&self, earth_fixed_direction: &Vector3<f64>) -> (Degree, Degree) {
        let (sin_lat, cos_lat) = (self.latitude * RADEG).sin_cos();
        let (sin_lon, cos_lon) = (self.longitude * RADEG).sin_cos();
        let d = earth_fixed_direction;

        let east = -sin_lon * d.x + cos_lon * d.y;
        let north = -sin_lat * cos_lon * d.x - sin_lat * sin_lon * d.y + cos_lat * d.z;
        let up = cos_lat * cos_lon * d.x + cos_lat * sin_lon * d.y + sin_lat * d.z;

        let altitude = up.atan2(east.hypot(north)) / RADEG;
        let azimuth = (east.atan2(north) / RADEG).rem_euclid(360.0);
        (altitude, azimuth)
    }
}
