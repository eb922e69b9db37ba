//! # Earth orientation
//!
//! Precession (IAU 1976), a truncated IAU 1980 nutation series, mean obliquity and
//! Greenwich sidereal time. Together they carry a vector from the GCRS/J2000 mean
//! equator into the **true equator and equinox of date**, then into the rotating
//! Earth frame used for altitude/azimuth.
//!
//! ```text
//! GCRS (J2000)  --P-->  mean of date  --N-->  true of date  --R3(GAST)-->  Earth-fixed
//! ```
//!
//! All rotation matrices built here are **coordinate (passive)** rotations: `rotmt(φ, k)`
//! expresses a fixed vector in axes turned by `+φ` around axis `k`.
//!
//! Time arguments are Modified Julian Dates, TT for precession/nutation and UT1 (≈ UTC)
//! for sidereal time.
use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

use crate::constants::{ArcSec, Radian, DPI, OBLIQUITY_J2000_ARCSEC, RADEG, RADSEC, T2000};

/// Julian centuries of TT elapsed since J2000.0.
fn centuries_since_j2000(tjm: f64) -> f64 {
    (tjm - T2000) / 36525.0
}

/// Coordinate rotation matrix of angle `alpha` around axis `k` (0 = X, 1 = Y, 2 = Z).
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `k`: axis index, taken modulo 3.
///
/// Returns
/// --------
/// * The passive rotation matrix `R_k(alpha)`, so that `R_3(α)·x̂ = (cos α, −sin α, 0)`.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let (s, c) = alpha.sin_cos();
    match k % 3 {
        0 => Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c),
        1 => Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c),
        _ => Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0),
    }
}

/// Mean obliquity of the ecliptic (IAU 1980), in radians.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
pub fn obleq(tjm: f64) -> Radian {
    let t = centuries_since_j2000(tjm);
    let arcsec = OBLIQUITY_J2000_ARCSEC + t * (-46.8150 + t * (-0.00059 + t * 0.001813));
    arcsec * RADSEC
}

/// Multipliers of (D, M, M', F, Ω) and the coefficients of Δψ and Δε
/// (units of 0.0001″, constant and per-century parts).
///
/// These are the leading terms of the IAU 1980 series; the dropped terms stay
/// below 0.01″ in total.
const NUTATION_TERMS: [([i8; 5], [f64; 4]); 18] = [
    ([0, 0, 0, 0, 1], [-171996.0, -174.2, 92025.0, 8.9]),
    ([-2, 0, 0, 2, 2], [-13187.0, -1.6, 5736.0, -3.1]),
    ([0, 0, 0, 2, 2], [-2274.0, -0.2, 977.0, -0.5]),
    ([0, 0, 0, 0, 2], [2062.0, 0.2, -895.0, 0.5]),
    ([0, 1, 0, 0, 0], [1426.0, -3.4, 54.0, -0.1]),
    ([0, 0, 1, 0, 0], [712.0, 0.1, -7.0, 0.0]),
    ([-2, 1, 0, 2, 2], [-517.0, 1.2, 224.0, -0.6]),
    ([0, 0, 0, 2, 1], [-386.0, -0.4, 200.0, 0.0]),
    ([0, 0, 1, 2, 2], [-301.0, 0.0, 129.0, -0.1]),
    ([-2, -1, 0, 2, 2], [217.0, -0.5, -95.0, 0.3]),
    ([-2, 0, 1, 0, 0], [-158.0, 0.0, 0.0, 0.0]),
    ([-2, 0, 0, 2, 1], [129.0, 0.1, -70.0, 0.0]),
    ([0, 0, -1, 2, 2], [123.0, 0.0, -53.0, 0.0]),
    ([2, 0, 0, 0, 0], [63.0, 0.0, 0.0, 0.0]),
    ([0, 0, 1, 0, 1], [63.0, 0.1, -33.0, 0.0]),
    ([2, 0, -1, 2, 2], [-59.0, 0.0, 26.0, 0.0]),
    ([0, 0, -1, 0, 1], [-58.0, -0.1, 32.0, 0.0]),
    ([0, 0, 1, 2, 1], [-51.0, 0.0, 27.0, 0.0]),
];

/// Nutation in longitude and obliquity `(Δψ, Δε)`, in arcseconds.
///
/// The five fundamental arguments are the mean elongation of the Moon (D), the mean
/// anomalies of the Sun (M) and the Moon (M'), the Moon's argument of latitude (F) and
/// the longitude of its ascending node (Ω), each a cubic in Julian centuries.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * `(Δψ, Δε)` in arcseconds.
pub fn nutn80(tjm: f64) -> (ArcSec, ArcSec) {
    let t = centuries_since_j2000(tjm);
    let t2 = t * t;
    let t3 = t2 * t;

    let args = [
        297.85036 + 445267.111480 * t - 0.0019142 * t2 + t3 / 189474.0,
        357.52772 + 35999.050340 * t - 0.0001603 * t2 - t3 / 300000.0,
        134.96298 + 477198.867398 * t + 0.0086972 * t2 + t3 / 56250.0,
        93.27191 + 483202.017538 * t - 0.0036825 * t2 + t3 / 327270.0,
        125.04452 - 1934.136261 * t + 0.0020708 * t2 + t3 / 450000.0,
    ];

    let (dpsi, deps) = NUTATION_TERMS
        .iter()
        .fold((0.0, 0.0), |(dpsi, deps), (mult, coef)| {
            let angle = mult
                .iter()
                .zip(args.iter())
                .map(|(&m, &a)| f64::from(m) * a)
                .sum::<f64>()
                * RADEG;
            (
                dpsi + (coef[0] + coef[1] * t) * angle.sin(),
                deps + (coef[2] + coef[3] * t) * angle.cos(),
            )
        });

    (dpsi * 1e-4, deps * 1e-4)
}

/// Precession matrix from the J2000 mean equator to the mean equator of date (IAU 1976).
///
/// `x_mean(tjm) = prec(tjm) · x_J2000`, built as `R3(−z) · R2(θ) · R3(−ζ)`.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
pub fn prec(tjm: f64) -> Matrix3<f64> {
    let t = centuries_since_j2000(tjm);

    let zeta = t * (2306.2181 + t * (0.30188 + t * 0.017998)) * RADSEC;
    let z = t * (2306.2181 + t * (1.09468 + t * 0.018203)) * RADSEC;
    let theta = t * (2004.3109 + t * (-0.42665 - t * 0.041833)) * RADSEC;

    rotmt(-z, 2) * rotmt(theta, 1) * rotmt(-zeta, 2)
}

/// Nutation matrix from the mean equator of date to the true equator of date.
///
/// `x_true = rnut80(tjm) · x_mean`, built as `R1(−ε−Δε) · R3(−Δψ) · R1(ε)`.
pub fn rnut80(tjm: f64) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    rotmt(-epst, 0) * rotmt(-dpsi * RADSEC, 2) * rotmt(epsm, 0)
}

/// Equation of the equinoxes `Δψ·cos ε`, in radians.
pub fn equequ(tjm: f64) -> Radian {
    let (dpsi, _) = nutn80(tjm);
    dpsi * RADSEC * obleq(tjm).cos()
}

/// Greenwich mean sidereal time in radians, normalized to `[0, 2π)`.
///
/// Arguments
/// ---------
/// * `mjd_ut1`: Modified Julian Date in UT1.
///
/// # References
/// * IAU 1982 expression, as given by Meeus, *Astronomical Algorithms*, eq. 12.4.
pub fn gmst(mjd_ut1: f64) -> Radian {
    let du = mjd_ut1 - T2000;
    let t = du / 36525.0;
    let degrees =
        280.460_618_37 + 360.985_647_366_29 * du + 0.000_387_933 * t * t - t * t * t / 38_710_000.0;
    (degrees * RADEG).rem_euclid(DPI)
}

/// Earth orientation frozen at one instant.
///
/// Built once per epoch and reused for every vector that has to be turned into the
/// equator of date or the local horizon at that epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthOrientation {
    /// GCRS (J2000 mean) → true equator and equinox of date.
    pub gcrs_to_true: Matrix3<f64>,
    /// Greenwich apparent sidereal time (radians).
    pub gast: Radian,
    /// True obliquity of the ecliptic `ε + Δε` (radians).
    pub true_obliquity: Radian,
}

impl EarthOrientation {
    /// Orientation of the Earth at `epoch`.
    ///
    /// UT1 is approximated by UTC for the sidereal angle; the difference stays below
    /// 0.9 s, i.e. under 14″ of rotation.
    pub fn at(epoch: &Epoch) -> Self {
        let tjm = epoch.to_mjd_tt_days();
        let (dpsi, deps) = nutn80(tjm);
        let epsm = obleq(tjm);
        let epst = epsm + deps * RADSEC;

        let nutation = rotmt(-epst, 0) * rotmt(-dpsi * RADSEC, 2) * rotmt(epsm, 0);
        let gast = (gmst(epoch.to_mjd_utc_days()) + dpsi * RADSEC * epsm.cos()).rem_euclid(DPI);

        EarthOrientation {
            gcrs_to_true: nutation * prec(tjm),
            gast,
            true_obliquity: epst,
        }
    }

    /// Express a GCRS vector in the true equator of date.
    pub fn to_true_equator(&self, gcrs: &Vector3<f64>) -> Vector3<f64> {
        self.gcrs_to_true * gcrs
    }

    /// Express a true-equator-of-date vector in the Earth-fixed frame.
    pub fn to_earth_fixed(&self, true_equator: &Vector3<f64>) -> Vector3<f64> {
        rotmt(self.gast, 2) * true_equator
    }

    /// Express an Earth-fixed vector in GCRS.
    pub fn earth_fixed_to_gcrs(&self, earth_fixed: &Vector3<f64>) -> Vector3<f64> {
        self.gcrs_to_true.transpose() * rotmt(self.gast, 2).transpose() * earth_fixed
    }

    /// Express a GCRS vector in the true ecliptic and equinox of date.
    pub fn to_true_ecliptic(&self, gcrs: &Vector3<f64>) -> Vector3<f64> {
        rotmt(self.true_obliquity, 0) * self.to_true_equator(gcrs)
    }
}
