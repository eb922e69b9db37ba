#![allow(dead_code)]

use std::collections::HashMap;

use almanac::{
    almanac::AlmanacContext,
    almanac_errors::AlmanacError,
    astrometry::{ApparentPosition, EventKind, NightlyPeak, RiseSetEvent, SkyEngine},
    bodies::{CelestialBody, StarVectors},
    catalogs::hipparcos::StarEntry,
    config::{ReportConfig, SearchSettings},
    constants::Degree,
    jpl_ephem::naif::naif_ids::{NaifIds, PlanetaryBary},
    observers::Observer,
    targets::CelestialTarget,
    time::TimeWindow,
};
use hifitime::{Epoch, Unit};

/// Thu 17 21:00 CDT.
pub fn window_start() -> Epoch {
    Epoch::from_gregorian_utc_hms(2024, 10, 18, 2, 0, 0)
}

pub fn context() -> AlmanacContext {
    AlmanacContext {
        observer: Observer::new(41.5868, -93.6250, 0.0).unwrap(),
        timezone: chrono_tz::US::Central,
        window: TimeWindow::starting_at(window_start()),
        search: SearchSettings::default(),
        report: ReportConfig::default(),
    }
}

pub fn sun() -> CelestialTarget {
    CelestialTarget::new("Sun", CelestialBody::Planet(NaifIds::Sun))
}

pub fn moon() -> CelestialTarget {
    CelestialTarget::new("Moon", CelestialBody::Planet(NaifIds::Moon))
}

pub fn planet(name: &str, bary: PlanetaryBary) -> CelestialTarget {
    CelestialTarget::new(name, CelestialBody::Planet(NaifIds::PB(bary)))
}

pub fn sirius() -> CelestialTarget {
    let entry = StarEntry {
        hip: 32349,
        magnitude: Some(-1.44),
        ra_degrees: 101.28715539,
        dec_degrees: -16.71314306,
        parallax_mas: 379.21,
        ra_mas_per_year: -546.01,
        dec_mas_per_year: -1223.08,
    };
    CelestialTarget::new("Sirius", CelestialBody::Star(StarVectors::from_entry(&entry)))
}

/// Scripted sky: every answer is a simple function of the target name and of
/// the time elapsed since the window start.
pub struct MockSky {
    pub start: Epoch,
    /// Altitude at any instant, per target name; 27.834694° when absent.
    pub altitudes: HashMap<String, Degree>,
    /// Elongation at the window start, per target name; grows by `drift` °/day.
    pub elongations: HashMap<String, Degree>,
    pub drift: f64,
    /// Events as `(hours after start, kind)`.
    pub events: HashMap<String, Vec<(f64, EventKind)>>,
    pub phase: Degree,
    pub peak: (f64, Degree),
    /// Targets for which every query fails.
    pub failing: Vec<String>,
}

impl MockSky {
    pub fn new() -> Self {
        let mut elongations = HashMap::new();
        elongations.insert("Moon".to_string(), 151.361);
        elongations.insert("Mars".to_string(), 47.25);
        elongations.insert("Sirius".to_string(), 98.4);

        let mut events = HashMap::new();
        events.insert(
            "Moon".to_string(),
            vec![(12.0, EventKind::Set), (21.5, EventKind::Rise)],
        );
        events.insert(
            "Sun".to_string(),
            vec![(12.0, EventKind::Rise), (22.5, EventKind::Set)],
        );

        MockSky {
            start: window_start(),
            altitudes: HashMap::new(),
            elongations,
            drift: 3.7,
            events,
            phase: 151.83,
            peak: (2.0, 63.7),
            failing: Vec::new(),
        }
    }

    fn hours(&self, at: &Epoch) -> f64 {
        (*at - self.start).to_unit(Unit::Hour)
    }

    fn check(&self, target: &CelestialTarget) -> Result<(), AlmanacError> {
        if self.failing.contains(&target.name) {
            return Err(AlmanacError::EphemerisBodyNotFound(999));
        }
        Ok(())
    }
}

impl SkyEngine for MockSky {
    fn position(&self, target: &CelestialTarget, at: &Epoch) -> Result<ApparentPosition, AlmanacError> {
        self.check(target)?;
        Ok(ApparentPosition {
            altitude: *self.altitudes.get(&target.name).unwrap_or(&27.834694),
            azimuth: (131.045694 + 15.0 * self.hours(at)).rem_euclid(360.0),
            distance: 1.0,
        })
    }

    fn elongation(&self, target: &CelestialTarget, at: &Epoch) -> Result<Degree, AlmanacError> {
        self.check(target)?;
        let base = *self.elongations.get(&target.name).unwrap_or(&90.0);
        Ok((base + self.drift * self.hours(at) / 24.0).rem_euclid(180.0))
    }

    fn rise_set_events(
        &self,
        target: &CelestialTarget,
        _window: &TimeWindow,
    ) -> Result<Vec<RiseSetEvent>, AlmanacError> {
        self.check(target)?;
        Ok(self
            .events
            .get(&target.name)
            .map(|events| {
                events
                    .iter()
                    .map(|&(hours, kind)| RiseSetEvent {
                        instant: self.start + Unit::Hour * hours,
                        kind,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn altitude_peak(
        &self,
        target: &CelestialTarget,
        _window: &TimeWindow,
    ) -> Result<NightlyPeak, AlmanacError> {
        self.check(target)?;
        Ok(NightlyPeak {
            instant: self.start + Unit::Hour * self.peak.0,
            altitude: self.peak.1,
        })
    }

    fn moon_phase(&self, _at: &Epoch) -> Result<Degree, AlmanacError> {
        Ok(self.phase)
    }
}
