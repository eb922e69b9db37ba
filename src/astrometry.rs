//! # Apparent places
//!
//! [`Sky`] turns barycentric positions into what an observer at a fixed site sees:
//!
//! 1. barycentric state of the observer (Earth from the ephemeris plus the site's
//!    geocentric position and diurnal velocity);
//! 2. astrometric vector to the target, with the light-time iteration for solar
//!    system bodies and the Rømer correction for stars;
//! 3. annual and diurnal aberration from the observer's velocity;
//! 4. rotation to the true equator of date and to the local horizon.
//!
//! Gravitational deflection and atmospheric refraction are ignored; the rise/set
//! search accounts for refraction through its horizon altitude instead.
//!
//! The report pipeline only sees the [`SkyEngine`] trait, implemented here by
//! [`Sky`] and by hand-written doubles in the tests.
use hifitime::{Epoch, Unit};
use nalgebra::Vector3;

use crate::{
    almanac_errors::AlmanacError,
    bodies::CelestialBody,
    config::SearchSettings,
    constants::{Degree, RADEG, VLIGHT_AU},
    earth_orientation::EarthOrientation,
    jpl_ephem::{naif::naif_ids::NaifIds, JPLEphem, State},
    observers::Observer,
    search::{find_discrete, find_maxima},
    targets::CelestialTarget,
    time::TimeWindow,
};

/// Light-time corrections applied to solar system bodies.
const LIGHT_TIME_ITERATIONS: usize = 3;

/// Position of a target on the observer's sky at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentPosition {
    pub altitude: Degree,
    /// From north through east, in `[0, 360)`.
    pub azimuth: Degree,
    /// Astrometric distance (AU).
    pub distance: f64,
}

impl ApparentPosition {
    pub fn above_horizon(&self) -> bool {
        self.altitude > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Rise,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiseSetEvent {
    pub instant: Epoch,
    pub kind: EventKind,
}

/// Highest point of a target during the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightlyPeak {
    pub instant: Epoch,
    pub altitude: Degree,
}

/// Everything the report needs to know about the sky.
pub trait SkyEngine {
    /// Apparent altitude, azimuth and distance of `target` at `at`.
    fn position(&self, target: &CelestialTarget, at: &Epoch) -> Result<ApparentPosition, AlmanacError>;

    /// Angle between the apparent Sun and the apparent target (degrees).
    fn elongation(&self, target: &CelestialTarget, at: &Epoch) -> Result<Degree, AlmanacError>;

    /// Horizon crossings of `target` inside the window, in time order.
    fn rise_set_events(
        &self,
        target: &CelestialTarget,
        window: &TimeWindow,
    ) -> Result<Vec<RiseSetEvent>, AlmanacError>;

    /// First altitude maximum of `target` inside the window.
    fn altitude_peak(
        &self,
        target: &CelestialTarget,
        window: &TimeWindow,
    ) -> Result<NightlyPeak, AlmanacError>;

    /// Moon minus Sun geocentric ecliptic longitude, in `[0, 360)`.
    fn moon_phase(&self, at: &Epoch) -> Result<Degree, AlmanacError>;
}

/// Angle between two directions, in `[0, 180]` degrees.
pub fn separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Degree {
    a.cross(b).norm().atan2(a.dot(b)) / RADEG
}

/// First-order aberration: shift the astrometric vector along the observer's
/// velocity by the distance light travels during `light_time`.
pub(crate) fn correct_aberration(
    astrometric: &Vector3<f64>,
    observer_velocity: &Vector3<f64>,
    light_time: f64,
) -> Vector3<f64> {
    astrometric + observer_velocity * light_time
}

/// Ecliptic longitude of date (degrees) of a GCRS vector.
fn ecliptic_longitude(orientation: &EarthOrientation, gcrs: &Vector3<f64>) -> Degree {
    let ecliptic = orientation.to_true_ecliptic(gcrs);
    ecliptic.y.atan2(ecliptic.x) / RADEG
}

/// Observation engine for one site and one planetary ephemeris.
pub struct Sky<'a> {
    ephem: &'a JPLEphem,
    observer: Observer,
    search: SearchSettings,
}

impl<'a> Sky<'a> {
    pub fn new(ephem: &'a JPLEphem, observer: Observer, search: SearchSettings) -> Self {
        Sky {
            ephem,
            observer,
            search,
        }
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    fn observer_state(&self, epoch: &Epoch) -> Result<(State, EarthOrientation), AlmanacError> {
        let orientation = EarthOrientation::at(epoch);
        let state = self
            .observer
            .barycentric_state(self.ephem, epoch, &orientation)?;
        Ok((state, orientation))
    }

    /// Astrometric vector from `observer_position` to `body` and its light time (days).
    fn astrometric(
        &self,
        body: &CelestialBody,
        epoch: &Epoch,
        observer_position: &Vector3<f64>,
    ) -> Result<(Vector3<f64>, f64), AlmanacError> {
        if let CelestialBody::Star(star) = body {
            // light from a star reaches the observer earlier than the barycenter
            let delay = star.position.normalize().dot(observer_position) / VLIGHT_AU;
            let relative = star.position_at(epoch.to_jde_tdb_days() + delay) - observer_position;
            return Ok((relative, relative.norm() / VLIGHT_AU));
        }

        let mut light_time = 0.0;
        let mut relative = Vector3::zeros();
        for _ in 0..LIGHT_TIME_ITERATIONS {
            let emission = *epoch - Unit::Day * light_time;
            relative = body.barycentric_position(self.ephem, &emission)? - observer_position;
            light_time = relative.norm() / VLIGHT_AU;
        }
        Ok((relative, light_time))
    }

    /// Apparent GCRS vector of `body` seen from an observer with barycentric `state`.
    pub fn apparent_vector(
        &self,
        body: &CelestialBody,
        epoch: &Epoch,
        state: &State,
    ) -> Result<Vector3<f64>, AlmanacError> {
        let (observer_position, observer_velocity) = state;
        let (astrometric, light_time) = self.astrometric(body, epoch, observer_position)?;
        Ok(correct_aberration(&astrometric, observer_velocity, light_time))
    }

    pub fn apparent_position(
        &self,
        body: &CelestialBody,
        epoch: &Epoch,
    ) -> Result<ApparentPosition, AlmanacError> {
        let (state, orientation) = self.observer_state(epoch)?;
        let apparent = self.apparent_vector(body, epoch, &state)?;
        let earth_fixed = orientation.to_earth_fixed(&orientation.to_true_equator(&apparent));
        let (altitude, azimuth) = self.observer.altaz(&earth_fixed);
        Ok(ApparentPosition {
            altitude,
            azimuth,
            distance: apparent.norm(),
        })
    }

    fn altitude(&self, body: &CelestialBody, epoch: &Epoch) -> Result<Degree, AlmanacError> {
        Ok(self.apparent_position(body, epoch)?.altitude)
    }

    /// Topocentric Sun-target separation (degrees).
    pub fn solar_elongation(&self, body: &CelestialBody, epoch: &Epoch) -> Result<Degree, AlmanacError> {
        let (state, _) = self.observer_state(epoch)?;
        let sun = self.apparent_vector(&CelestialBody::Planet(NaifIds::Sun), epoch, &state)?;
        let target = self.apparent_vector(body, epoch, &state)?;
        Ok(separation(&sun, &target))
    }

    /// Lunar phase angle seen from the centre of the Earth.
    pub fn geocentric_moon_phase(&self, epoch: &Epoch) -> Result<Degree, AlmanacError> {
        let earth = self.ephem.earth_ephemeris(epoch)?;
        let orientation = EarthOrientation::at(epoch);
        let sun = self.apparent_vector(&CelestialBody::Planet(NaifIds::Sun), epoch, &earth)?;
        let moon = self.apparent_vector(&CelestialBody::Planet(NaifIds::Moon), epoch, &earth)?;
        let phase = ecliptic_longitude(&orientation, &moon) - ecliptic_longitude(&orientation, &sun);
        Ok(phase.rem_euclid(360.0))
    }
}

impl SkyEngine for Sky<'_> {
    fn position(&self, target: &CelestialTarget, at: &Epoch) -> Result<ApparentPosition, AlmanacError> {
        self.apparent_position(&target.body, at)
    }

    fn elongation(&self, target: &CelestialTarget, at: &Epoch) -> Result<Degree, AlmanacError> {
        self.solar_elongation(&target.body, at)
    }

    fn rise_set_events(
        &self,
        target: &CelestialTarget,
        window: &TimeWindow,
    ) -> Result<Vec<RiseSetEvent>, AlmanacError> {
        let horizon = self.search.horizon_degrees;
        let is_up = |t: &Epoch| Ok(self.altitude(&target.body, t)? > horizon);
        let events = find_discrete(&window.start, &window.end, self.search.rise_set_step_days, is_up)?;

        Ok(events
            .into_iter()
            .map(|(instant, up)| RiseSetEvent {
                instant,
                kind: if up { EventKind::Rise } else { EventKind::Set },
            })
            .collect())
    }

    fn altitude_peak(
        &self,
        target: &CelestialTarget,
        window: &TimeWindow,
    ) -> Result<NightlyPeak, AlmanacError> {
        let altitude = |t: &Epoch| self.altitude(&target.body, t);
        find_maxima(&window.start, &window.end, self.search.peak_step_days, altitude)?
            .first()
            .map(|&(instant, altitude)| NightlyPeak { instant, altitude })
            .ok_or_else(|| AlmanacError::NoAltitudeMaximum(target.name.clone()))
    }

    fn moon_phase(&self, at: &Epoch) -> Result<Degree, AlmanacError> {
        self.geocentric_moon_phase(at)
    }
}

#[cfg(test)]
mod astrometry_test {
    use super::*;
    use crate::{
        bodies::StarVectors,
        constants::{AU, HIPPARCOS_EPOCH_JD, OBLIQUITY_J2000_ARCSEC, RADSEC},
        jpl_ephem::naif::{
            naif_data::{
                test_kernel::{build_kernel, TestSegment},
                NaifData,
            },
            naif_ids::PlanetaryBary,
        },
    };
    use approx::assert_abs_diff_eq;

    const FAR: f64 = 1.0e6 * AU;

    /// Earth at rest at the barycenter, the Sun 1 AU away along +x.
    fn kernel(moon: [f64; 3], mars: [f64; 3]) -> JPLEphem {
        let bytes = build_kernel(
            &[
                TestSegment::constant(3, 0, [0.0, 0.0, 0.0]),
                TestSegment::constant(399, 3, [0.0, 0.0, 0.0]),
                TestSegment::constant(10, 0, [AU, 0.0, 0.0]),
                TestSegment::constant(301, 3, moon),
                TestSegment::constant(4, 0, mars),
            ],
            "LTL-IEEE",
        );
        JPLEphem::from_naif(NaifData::from_bytes(&bytes).unwrap())
    }

    fn des_moines() -> Observer {
        Observer::new(41.5868, -93.6250, 0.0).unwrap()
    }

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc_hms(2024, 10, 18, 2, 0, 0)
    }

    fn mars() -> CelestialTarget {
        CelestialTarget::new("Mars", CelestialBody::Planet(NaifIds::PB(PlanetaryBary::Mars)))
    }

    #[test]
    fn test_separation_symmetric_and_bounded() {
        let a = Vector3::new(1.0, 0.2, -0.3);
        let b = Vector3::new(-0.5, 0.9, 0.1);
        assert_abs_diff_eq!(separation(&a, &b), separation(&b, &a));
        assert_abs_diff_eq!(separation(&a, &a), 0.0);
        assert_abs_diff_eq!(separation(&a, &(-a)), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            separation(&Vector3::x(), &Vector3::y()),
            90.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_aberration_tilts_towards_velocity() {
        let target = Vector3::new(10.0, 0.0, 0.0);
        let velocity = Vector3::new(0.0, 0.01720209895, 0.0);
        let light_time = 10.0 / VLIGHT_AU;
        let apparent = correct_aberration(&target, &velocity, light_time);
        // about 20.5 arcseconds for the Earth's orbital speed
        assert_abs_diff_eq!(separation(&target, &apparent) * 3600.0, 20.5, epsilon = 0.1);
        assert!(apparent.y > 0.0);
    }

    #[test]
    fn test_pole_altitude_is_latitude() {
        let ephem = kernel([384_400.0, 0.0, 0.0], [0.0, 0.0, FAR]);
        let sky = Sky::new(&ephem, des_moines(), SearchSettings::default());
        let pos = sky.position(&mars(), &epoch()).unwrap();
        // the J2000 pole drifts by a few tenths of a degree
        assert_abs_diff_eq!(pos.altitude, 41.5868, epsilon = 0.3);
        assert!(pos.above_horizon());
        assert!(pos.azimuth < 1.0 || pos.azimuth > 359.0);
        assert_abs_diff_eq!(pos.distance, 1.0e6, epsilon = 1.0);
    }

    #[test]
    fn test_equatorial_target_rises_east_and_sets_west() {
        let ephem = kernel([384_400.0, 0.0, 0.0], [FAR, 0.0, 0.0]);
        let sky = Sky::new(&ephem, des_moines(), SearchSettings::default());
        let window = TimeWindow::starting_at(epoch());
        let target = mars();

        let events = sky.rise_set_events(&target, &window).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].instant < events[1].instant);
        for event in &events {
            assert!(window.contains(&event.instant));
            let azimuth = sky.position(&target, &event.instant).unwrap().azimuth;
            match event.kind {
                EventKind::Rise => assert_abs_diff_eq!(azimuth, 90.0, epsilon = 2.0),
                EventKind::Set => assert_abs_diff_eq!(azimuth, 270.0, epsilon = 2.0),
            }
        }
        assert_ne!(events[0].kind, events[1].kind);

        let peak = sky.altitude_peak(&target, &window).unwrap();
        assert!(window.start <= peak.instant && peak.instant <= window.end);
        assert_abs_diff_eq!(peak.altitude, 90.0 - 41.5868, epsilon = 0.3);
        let azimuth = sky.position(&target, &peak.instant).unwrap().azimuth;
        assert_abs_diff_eq!(azimuth, 180.0, epsilon = 0.5);
    }

    #[test]
    fn test_elongation_of_a_star() {
        let ephem = kernel([384_400.0, 0.0, 0.0], [FAR, 0.0, 0.0]);
        let sky = Sky::new(&ephem, des_moines(), SearchSettings::default());
        let star = CelestialTarget::new(
            "Test star",
            CelestialBody::Star(StarVectors {
                position: Vector3::new(0.0, 1.0e11, 0.0),
                velocity: Vector3::zeros(),
                epoch_jd: HIPPARCOS_EPOCH_JD,
            }),
        );
        assert_abs_diff_eq!(sky.elongation(&star, &epoch()).unwrap(), 90.0, epsilon = 0.01);
        assert_abs_diff_eq!(sky.elongation(&mars(), &epoch()).unwrap(), 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_minor_planet_at_opposition() {
        use crate::orbit_type::keplerian_element::KeplerianElements;

        let ephem = kernel([384_400.0, 0.0, 0.0], [FAR, 0.0, 0.0]);
        let sky = Sky::new(&ephem, des_moines(), SearchSettings::default());
        // 2 AU from the Sun on the side opposite to it, 1 AU from the Earth
        let asteroid = CelestialTarget::new(
            "Test asteroid",
            CelestialBody::MinorPlanet(KeplerianElements {
                reference_epoch: epoch().to_mjd_tt_days(),
                semi_major_axis: 2.0,
                eccentricity: 0.0,
                inclination: 0.0,
                ascending_node_longitude: 0.0,
                periapsis_argument: 0.0,
                mean_anomaly: std::f64::consts::PI,
            }),
        );

        assert_abs_diff_eq!(sky.elongation(&asteroid, &epoch()).unwrap(), 180.0, epsilon = 0.05);
        let pos = sky.position(&asteroid, &epoch()).unwrap();
        assert_abs_diff_eq!(pos.distance, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_full_and_first_quarter_moon() {
        let full = kernel([-384_400.0, 0.0, 0.0], [FAR, 0.0, 0.0]);
        let sky = Sky::new(&full, des_moines(), SearchSettings::default());
        assert_abs_diff_eq!(sky.moon_phase(&epoch()).unwrap(), 180.0, epsilon = 1e-6);

        // on the J2000 ecliptic, 90 degrees east of the equinox
        let (sin_eps, cos_eps) = (OBLIQUITY_J2000_ARCSEC * RADSEC).sin_cos();
        let quarter = kernel(
            [0.0, 384_400.0 * cos_eps, 384_400.0 * sin_eps],
            [FAR, 0.0, 0.0],
        );
        let sky = Sky::new(&quarter, des_moines(), SearchSettings::default());
        assert_abs_diff_eq!(sky.moon_phase(&epoch()).unwrap(), 90.0, epsilon = 0.01);
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let ephem = kernel([384_400.0, 0.0, 0.0], [FAR, 0.0, 0.0]);
        let sky = Sky::new(&ephem, des_moines(), SearchSettings::default());
        let venus = CelestialTarget::new("Venus", CelestialBody::Planet(NaifIds::PB(PlanetaryBary::Venus)));
        assert_eq!(
            sky.position(&venus, &epoch()),
            Err(AlmanacError::EphemerisBodyNotFound(2))
        );
    }
}
