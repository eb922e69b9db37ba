//! # Keplerian orbital elements
//!
//! Two-body heliocentric orbits for minor planets.
//!
//! The six classical elements are:
//!
//! 1. **a** – Semi-major axis (AU)
//! 2. **e** – Eccentricity (unitless, elliptic orbits only)
//! 3. **i** – Inclination (radians)
//! 4. **Ω** – Longitude of ascending node (radians)
//! 5. **ω** – Argument of periapsis (radians)
//! 6. **M** – Mean anomaly at the reference epoch (radians)
//!
//! The angles are referred to the **ecliptic and equinox of J2000**, as published
//! by the Minor Planet Center. [`KeplerianElements::heliocentric_state`] propagates
//! the mean anomaly with `n = √(GM / a³)`, solves Kepler's equation and rotates
//! the perifocal state into the ICRF-aligned **equatorial J2000** frame.
//!
//! ## Units
//!
//! - Lengths: **AU**, velocities: **AU/day**
//! - Time: reference epoch in **MJD (TT)**
//! - Gravitational parameter: **AU³/day²**
use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::{
    almanac_errors::AlmanacError,
    constants::{AU, DPI, GM_SUN_PITJEVA_2005, MJD, OBLIQUITY_J2000_ARCSEC, RADSEC, SECONDS_PER_DAY},
    earth_orientation::rotmt,
};

const KEPLER_MAX_ITERATIONS: usize = 50;
const KEPLER_TOLERANCE: f64 = 1e-14;

/// Heliocentric gravitational parameter (Pitjeva 2005) in AU³/day².
pub fn gm_sun_au3_day2() -> f64 {
    GM_SUN_PITJEVA_2005 * SECONDS_PER_DAY * SECONDS_PER_DAY / (AU * AU * AU)
}

/// Solve `E − e·sin E = M` for the eccentric anomaly by Newton iteration.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M in radians, any range.
/// * `eccentricity`: `0 ≤ e < 1`.
///
/// Return
/// ------
/// * `E` in radians, or [`AlmanacError::KeplerNoConvergence`].
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Result<f64, AlmanacError> {
    let m = mean_anomaly.rem_euclid(DPI);
    let mut ecc_anomaly = if eccentricity > 0.8 {
        std::f64::consts::PI
    } else {
        m + eccentricity * m.sin()
    };

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let step = (ecc_anomaly - eccentricity * ecc_anomaly.sin() - m)
            / (1.0 - eccentricity * ecc_anomaly.cos());
        ecc_anomaly -= step;
        if step.abs() < KEPLER_TOLERANCE {
            return Ok(ecc_anomaly);
        }
    }

    Err(AlmanacError::KeplerNoConvergence {
        mean_anomaly,
        eccentricity,
    })
}

#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: MJD,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
}

impl KeplerianElements {
    /// Reject orbits the two-body propagator cannot handle.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        if !(0.0..1.0).contains(&self.eccentricity) || self.semi_major_axis <= 0.0 {
            return Err(AlmanacError::UnsupportedEccentricity(self.eccentricity));
        }
        Ok(())
    }

    /// Mean motion in rad/day for a central body of parameter `gm` (AU³/day²).
    pub fn mean_motion(&self, gm: f64) -> f64 {
        (gm / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Rotation from the perifocal frame to the ecliptic J2000 frame.
    fn perifocal_to_ecliptic(&self) -> Matrix3<f64> {
        rotmt(-self.ascending_node_longitude, 2)
            * rotmt(-self.inclination, 0)
            * rotmt(-self.periapsis_argument, 2)
    }

    /// Heliocentric equatorial J2000 state at `tjm` (MJD, TT).
    ///
    /// Arguments
    /// ---------
    /// * `tjm`: propagation epoch, MJD in TT.
    /// * `gm`: gravitational parameter of the Sun in AU³/day².
    ///
    /// Return
    /// ------
    /// * Position (AU) and velocity (AU/day), or an error for non-elliptic orbits.
    pub fn heliocentric_state(
        &self,
        tjm: MJD,
        gm: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), AlmanacError> {
        self.validate()?;

        let a = self.semi_major_axis;
        let e = self.eccentricity;
        let n = self.mean_motion(gm);
        let mean_anomaly = self.mean_anomaly + n * (tjm - self.reference_epoch);
        let ecc_anomaly = solve_kepler(mean_anomaly, e)?;

        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let sqrt_one_e2 = (1.0 - e * e).sqrt();
        let radius = a * (1.0 - e * cos_e);

        let position = Vector3::new(a * (cos_e - e), a * sqrt_one_e2 * sin_e, 0.0);
        let velocity =
            Vector3::new(-sin_e, sqrt_one_e2 * cos_e, 0.0) * ((gm * a).sqrt() / radius);

        let to_equatorial = rotmt(-OBLIQUITY_J2000_ARCSEC * RADSEC, 0) * self.perifocal_to_ecliptic();
        Ok((to_equatorial * position, to_equatorial * velocity))
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deg = |x: f64| x.to_degrees();
        write!(
            f,
            "a={:.6} AU e={:.6} i={:.4}° Ω={:.4}° ω={:.4}° M={:.4}° @ MJD {:.1} TT",
            self.semi_major_axis,
            self.eccentricity,
            deg(self.inclination),
            deg(self.ascending_node_longitude),
            deg(self.periapsis_argument),
            deg(self.mean_anomaly),
            self.reference_epoch
        )
    }
}
