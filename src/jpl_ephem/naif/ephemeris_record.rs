//! Chebyshev records of an SPK type 2 segment.
//!
//! A record holds `mid` and `radius` (ET seconds) then `ncoeff` coefficients for
//! each of X, Y and Z (km), with `ncoeff = (rsize - 2) / 3`. Positions come from
//! `Σ cₙ Tₙ(s)` with `s = (et − mid) / radius`; velocities from `Σ cₙ T'ₙ(s)`
//! scaled by `1 / radius`, giving km/s.
use nalgebra::Vector3;
use nom::{multi::count, number::complete::le_f64, IResult, Parser};

use crate::almanac_errors::AlmanacError;

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub mid: f64,
    pub radius: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl EphemerisRecord {
    fn parse(input: &[u8], ncoeff: usize) -> IResult<&[u8], Self> {
        let (input, mid) = le_f64(input)?;
        let (input, radius) = le_f64(input)?;
        let (input, x) = count(le_f64, ncoeff).parse(input)?;
        let (input, y) = count(le_f64, ncoeff).parse(input)?;
        let (input, z) = count(le_f64, ncoeff).parse(input)?;
        Ok((
            input,
            EphemerisRecord {
                mid,
                radius,
                x,
                y,
                z,
            },
        ))
    }

    /// Decode the `n_records` consecutive records of a segment.
    ///
    /// Arguments
    /// -----------------
    /// * `kernel`: the full file content.
    /// * `initial_addr`: first DP-word address of the segment (1-based).
    /// * `rsize`: record size in DP-words.
    /// * `n_records`: number of records in the segment.
    pub fn read_segment(
        kernel: &[u8],
        initial_addr: usize,
        rsize: usize,
        n_records: usize,
    ) -> Result<Vec<Self>, AlmanacError> {
        let ncoeff = (rsize - 2) / 3;
        let start = initial_addr.saturating_sub(1) * 8;
        let end = start + n_records * rsize * 8;
        let bytes = kernel.get(start..end).ok_or_else(|| {
            AlmanacError::UnsupportedBinaryFormat(format!(
                "segment records at word {initial_addr} lie past the end of the file"
            ))
        })?;

        bytes
            .chunks_exact(rsize * 8)
            .map(|chunk| {
                Self::parse(chunk, ncoeff)
                    .map(|(_, record)| record)
                    .map_err(AlmanacError::from)
            })
            .collect()
    }

    /// Position (km) and velocity (km/s) at `et_seconds`.
    ///
    /// The normalized time is clamped to `[-1, 1]`.
    pub fn interpolate(&self, et_seconds: f64) -> (Vector3<f64>, Vector3<f64>) {
        let s = ((et_seconds - self.mid) / self.radius).clamp(-1.0, 1.0);
        let n = self.x.len();

        let mut t = vec![0.0; n.max(2)];
        let mut dt = vec![0.0; n.max(2)];
        t[0] = 1.0;
        t[1] = s;
        dt[1] = 1.0;
        for k in 2..n {
            t[k] = 2.0 * s * t[k - 1] - t[k - 2];
            dt[k] = 2.0 * t[k - 1] + 2.0 * s * dt[k - 1] - dt[k - 2];
        }

        let series = |coeffs: &[f64], basis: &[f64]| -> f64 {
            coeffs.iter().zip(basis).map(|(c, b)| c * b).sum()
        };

        let position = Vector3::new(
            series(&self.x, &t),
            series(&self.y, &t),
            series(&self.z, &t),
        );
        let velocity = Vector3::new(
            series(&self.x, &dt),
            series(&self.y, &dt),
            series(&self.z, &dt),
        ) / self.radius;

        (position, velocity)
    }
}

#[cfg(test)]
mod test_ephemeris_record {
    use super::*;
    use approx::assert_relative_eq;

    fn quadratic_record() -> EphemerisRecord {
        // x(s) = 1 + 2 s + 3 (2 s² − 1), y(s) = −4 s, z(s) = 5
        EphemerisRecord {
            mid: 1000.0,
            radius: 500.0,
            x: vec![1.0, 2.0, 3.0],
            y: vec![0.0, -4.0, 0.0],
            z: vec![5.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_interpolate_polynomial() {
        let record = quadratic_record();
        // et = 1250 → s = 0.5
        let (pos, vel) = record.interpolate(1250.0);
        assert_relative_eq!(pos, Vector3::new(1.0 + 1.0 + 3.0 * -0.5, -2.0, 5.0));
        // dx/ds = 2 + 12 s, scaled by 1 / radius
        assert_relative_eq!(
            vel,
            Vector3::new((2.0 + 6.0) / 500.0, -4.0 / 500.0, 0.0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let record = EphemerisRecord {
            mid: 0.0,
            radius: 691200.0,
            x: vec![-5.9e7, -1.9e7, 2.9e5, 1.6e4, -133.0, -4.5, 0.034],
            y: vec![1.2e8, -7.6e6, -6.1e5, 6.5e3, 265.0, -2.0, -0.056],
            z: vec![5.3e7, -3.3e6, -2.7e5, 2.8e3, 115.0, -0.87, -0.024],
        };
        let h = 1.0;
        let (p0, _) = record.interpolate(1.0e5 - h);
        let (p1, _) = record.interpolate(1.0e5 + h);
        let (_, v) = record.interpolate(1.0e5);
        assert_relative_eq!(v, (p1 - p0) / (2.0 * h), max_relative = 1e-6);
    }

    #[test]
    fn test_read_segment() {
        let mut kernel = vec![0u8; 8];
        for v in [1000.0f64, 500.0, 1.0, 2.0, 3.0, 0.0, -4.0, 0.0, 5.0, 0.0, 0.0] {
            kernel.extend_from_slice(&v.to_le_bytes());
        }
        let records = EphemerisRecord::read_segment(&kernel, 2, 11, 1).unwrap();
        assert_eq!(records, vec![quadratic_record()]);

        assert!(EphemerisRecord::read_segment(&kernel, 2, 11, 2).is_err());
    }
}
