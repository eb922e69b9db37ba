//! # Planetary ephemeris
//!
//! Thin layer over the SPK reader returning barycentric states in astronomical
//! units, indexed by [`Epoch`] instead of raw ET seconds.
use camino::Utf8Path;
use hifitime::Epoch;
use naif::{naif_data::NaifData, naif_ids::NaifIds};
use nalgebra::Vector3;

use crate::{
    almanac_errors::AlmanacError,
    constants::{AU, SECONDS_PER_DAY},
};

pub mod naif;

/// Barycentric ICRF state: position (AU) and velocity (AU/day).
pub type State = (Vector3<f64>, Vector3<f64>);

#[derive(Debug, Clone)]
pub struct JPLEphem {
    naif: NaifData,
}

impl JPLEphem {
    pub fn from_file(path: &Utf8Path) -> Result<Self, AlmanacError> {
        Ok(JPLEphem {
            naif: NaifData::read_naif_file(path)?,
        })
    }

    pub fn from_naif(naif: NaifData) -> Self {
        JPLEphem { naif }
    }

    pub fn contains(&self, body: NaifIds) -> bool {
        self.naif.contains(body.to_id())
    }

    /// Barycentric state of `body` at `epoch`.
    pub fn barycentric_state(&self, body: NaifIds, epoch: &Epoch) -> Result<State, AlmanacError> {
        let (position, velocity) = self
            .naif
            .barycentric_state(body.to_id(), epoch.to_et_seconds())?;
        Ok((position / AU, velocity * SECONDS_PER_DAY / AU))
    }

    /// Barycentric state of the Earth mass centre at `epoch`.
    pub fn earth_ephemeris(&self, epoch: &Epoch) -> Result<State, AlmanacError> {
        self.barycentric_state(
            NaifIds::PMC(naif::naif_ids::PlanetaryBary::EarthMoon),
            epoch,
        )
    }
}
