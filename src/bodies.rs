//! # Observable bodies
//!
//! [`CelestialBody`] is the tagged union of everything the almanac can point at:
//! a body of the planetary ephemeris, a minor planet on a two-body orbit, or a
//! catalog star. Each variant knows how to produce its barycentric position.
use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    almanac_errors::AlmanacError,
    catalogs::hipparcos::StarEntry,
    constants::{DAYS_PER_JULIAN_YEAR, HIPPARCOS_EPOCH_JD, RADEG, RADSEC},
    jpl_ephem::{naif::naif_ids::NaifIds, JPLEphem},
    orbit_type::keplerian_element::{gm_sun_au3_day2, KeplerianElements},
};

/// Parallax substituted for null or negative catalog values (mas).
const MIN_PARALLAX_MAS: f64 = 1.0e-6;

/// Linear space motion of a star: ICRS position and velocity at the catalog epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct StarVectors {
    /// Barycentric position at the catalog epoch (AU).
    pub position: Vector3<f64>,
    /// Barycentric velocity (AU/day).
    pub velocity: Vector3<f64>,
    /// Catalog epoch, Julian date (TDB).
    pub epoch_jd: f64,
}

impl StarVectors {
    /// Space motion from Hipparcos astrometry (epoch J1991.25, zero radial velocity).
    pub fn from_entry(entry: &StarEntry) -> Self {
        let parallax = if entry.parallax_mas <= 0.0 {
            MIN_PARALLAX_MAS
        } else {
            entry.parallax_mas
        };
        let distance = 1.0 / (parallax * 1.0e-3 * RADSEC).sin();

        let (sin_ra, cos_ra) = (entry.ra_degrees * RADEG).sin_cos();
        let (sin_dec, cos_dec) = (entry.dec_degrees * RADEG).sin_cos();

        // AU/day along the local east and north directions
        let pm_ra = entry.ra_mas_per_year / (parallax * DAYS_PER_JULIAN_YEAR);
        let pm_dec = entry.dec_mas_per_year / (parallax * DAYS_PER_JULIAN_YEAR);

        StarVectors {
            position: Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec) * distance,
            velocity: Vector3::new(
                -pm_ra * sin_ra - pm_dec * sin_dec * cos_ra,
                pm_ra * cos_ra - pm_dec * sin_dec * sin_ra,
                pm_dec * cos_dec,
            ),
            epoch_jd: HIPPARCOS_EPOCH_JD,
        }
    }

    /// Barycentric position at `jd_tdb` (AU).
    pub fn position_at(&self, jd_tdb: f64) -> Vector3<f64> {
        self.position + self.velocity * (jd_tdb - self.epoch_jd)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CelestialBody {
    Planet(NaifIds),
    MinorPlanet(KeplerianElements),
    Star(StarVectors),
}

impl CelestialBody {
    /// Barycentric ICRF position (AU) at `epoch`.
    ///
    /// Stars are given at the epoch itself; light-time handling for stars is
    /// done by the caller from the observer's position.
    pub fn barycentric_position(
        &self,
        ephem: &JPLEphem,
        epoch: &Epoch,
    ) -> Result<Vector3<f64>, AlmanacError> {
        match self {
            CelestialBody::Planet(id) => Ok(ephem.barycentric_state(*id, epoch)?.0),
            CelestialBody::MinorPlanet(orbit) => {
                let (sun, _) = ephem.barycentric_state(NaifIds::Sun, epoch)?;
                let (helio, _) = orbit.heliocentric_state(epoch.to_mjd_tt_days(), gm_sun_au3_day2())?;
                Ok(sun + helio)
            }
            CelestialBody::Star(star) => Ok(star.position_at(epoch.to_jde_tdb_days())),
        }
    }

    pub fn is_star(&self) -> bool {
        matches!(self, CelestialBody::Star(_))
    }
}

#[cfg(test)]
mod bodies_test {
    use super::*;
    use approx::assert_relative_eq;

    fn sirius() -> StarEntry {
        StarEntry {
            hip: 32349,
            magnitude: Some(-1.44),
            ra_degrees: 101.28715539,
            dec_degrees: -16.71314306,
            parallax_mas: 379.21,
            ra_mas_per_year: -546.01,
            dec_mas_per_year: -1223.08,
        }
    }

    #[test]
    fn test_star_distance_and_direction() {
        let star = StarVectors::from_entry(&sirius());
        // 2.637 pc
        assert_relative_eq!(star.position.norm(), 206_264.806 / 0.37921, max_relative = 1e-6);
        let dec = (star.position.z / star.position.norm()).asin() / RADEG;
        let ra = star.position.y.atan2(star.position.x) / RADEG;
        assert_relative_eq!(dec, -16.71314306, epsilon = 1e-9);
        assert_relative_eq!(ra, 101.28715539, epsilon = 1e-9);
    }

    #[test]
    fn test_proper_motion_is_tangential() {
        let star = StarVectors::from_entry(&sirius());
        assert_relative_eq!(star.position.dot(&star.velocity), 0.0, epsilon = 1e-6);

        // total proper motion of 1.339″/yr seen from the star's distance
        let later = star.position_at(star.epoch_jd + 100.0 * DAYS_PER_JULIAN_YEAR);
        let moved = star.position.angle(&later) / RADSEC;
        assert_relative_eq!(moved, 133.94, epsilon = 0.05);
    }

    #[test]
    fn test_minor_planet_is_sun_relative() {
        use crate::{
            constants::AU,
            jpl_ephem::naif::naif_data::{
                test_kernel::{build_kernel, TestSegment},
                NaifData,
            },
        };

        let bytes = build_kernel(&[TestSegment::constant(10, 0, [AU, 0.0, 0.0])], "LTL-IEEE");
        let ephem = JPLEphem::from_naif(NaifData::from_bytes(&bytes).unwrap());
        let epoch = Epoch::from_gregorian_utc_hms(2024, 10, 18, 2, 0, 0);

        // circular orbit at perihelion on the ecliptic x axis
        let body = CelestialBody::MinorPlanet(KeplerianElements {
            reference_epoch: epoch.to_mjd_tt_days(),
            semi_major_axis: 2.0,
            eccentricity: 0.0,
            inclination: 0.0,
            ascending_node_longitude: 0.0,
            periapsis_argument: 0.0,
            mean_anomaly: 0.0,
        });
        let position = body.barycentric_position(&ephem, &epoch).unwrap();
        assert_relative_eq!(position, Vector3::new(3.0, 0.0, 0.0), epsilon = 1e-9);

        let missing_sun = build_kernel(&[TestSegment::constant(3, 0, [0.0, 0.0, 0.0])], "LTL-IEEE");
        let ephem = JPLEphem::from_naif(NaifData::from_bytes(&missing_sun).unwrap());
        assert_eq!(
            body.barycentric_position(&ephem, &epoch),
            Err(AlmanacError::EphemerisBodyNotFound(10))
        );
    }

    #[test]
    fn test_null_parallax() {
        let mut entry = sirius();
        entry.parallax_mas = -0.5;
        let star = StarVectors::from_entry(&entry);
        assert!(star.position.norm() > 1.0e13);
        assert!(star.position.iter().all(|v| v.is_finite()));
    }
}
