//! # Target resolution
//!
//! Turns the configured identifiers into [`CelestialTarget`]s:
//!
//! - ephemeris names (`"Sun"`, `"Mars barycenter"`) become NAIF bodies, which
//!   must be present in the loaded kernel;
//! - identifiers starting with `(` are minor planet designations looked up in the
//!   MPCORB catalog;
//! - `(name, hip)` pairs are looked up in the Hipparcos catalog.
//!
//! Any identifier that cannot be resolved is an error.
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    almanac_errors::AlmanacError,
    bodies::{CelestialBody, StarVectors},
    catalogs::{hipparcos::HipparcosCatalog, mpcorb::MpcOrbCatalog},
    config::{StarTarget, TargetsConfig},
    jpl_ephem::{naif::naif_ids::NaifIds, JPLEphem},
};

static NUMBERED_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\(\d+\)\s*").unwrap());

const BARYCENTER_SUFFIX: &str = " barycenter";

/// A body to report on, with the name printed in the almanac.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialTarget {
    pub name: String,
    pub body: CelestialBody,
}

impl CelestialTarget {
    pub fn new(name: &str, body: CelestialBody) -> Self {
        CelestialTarget {
            name: name.to_string(),
            body,
        }
    }

    pub fn is_sun(&self) -> bool {
        self.body == CelestialBody::Planet(NaifIds::Sun)
    }

    pub fn is_moon(&self) -> bool {
        self.body == CelestialBody::Planet(NaifIds::Moon)
    }

    pub fn is_star(&self) -> bool {
        self.body.is_star()
    }
}

/// Printed name of an identifier: `"Mars barycenter"` → `"Mars"`,
/// `"(1) Ceres"` → `"Ceres"`.
pub fn display_name(identifier: &str) -> String {
    let trimmed = identifier.trim().replace(BARYCENTER_SUFFIX, "");
    NUMBERED_PREFIX.replace(&trimmed, "").into_owned()
}

/// Resolves identifiers against the loaded data.
pub struct TargetResolver<'a> {
    ephem: &'a JPLEphem,
    stars: Option<&'a HipparcosCatalog>,
    minor_planets: Option<&'a MpcOrbCatalog>,
}

impl<'a> TargetResolver<'a> {
    pub fn new(
        ephem: &'a JPLEphem,
        stars: Option<&'a HipparcosCatalog>,
        minor_planets: Option<&'a MpcOrbCatalog>,
    ) -> Self {
        TargetResolver {
            ephem,
            stars,
            minor_planets,
        }
    }

    /// Resolve a solar system identifier: an ephemeris name or a minor planet designation.
    pub fn resolve_planet(&self, identifier: &str) -> Result<CelestialTarget, AlmanacError> {
        let name = display_name(identifier);

        if identifier.trim_start().starts_with('(') {
            let record = self
                .minor_planets
                .ok_or_else(|| AlmanacError::MinorPlanetNotFound(identifier.to_string()))?
                .find(identifier)?;
            record.elements.validate()?;
            debug!(name = %name, orbit = %record.elements, "resolved minor planet");
            return Ok(CelestialTarget::new(
                &name,
                CelestialBody::MinorPlanet(record.elements.clone()),
            ));
        }

        let id = NaifIds::from_name(identifier)
            .ok_or_else(|| AlmanacError::UnknownPlanet(identifier.to_string()))?;
        if !self.ephem.contains(id) {
            return Err(AlmanacError::EphemerisBodyNotFound(id.to_id()));
        }
        debug!(name = %name, naif_id = id.to_id(), "resolved ephemeris body");
        Ok(CelestialTarget::new(&name, CelestialBody::Planet(id)))
    }

    pub fn resolve_star(&self, star: &StarTarget) -> Result<CelestialTarget, AlmanacError> {
        let entry = self
            .stars
            .ok_or(AlmanacError::StarNotFound(star.hip))?
            .get(star.hip)?;
        debug!(name = %star.name, hip = star.hip, "resolved star");
        Ok(CelestialTarget::new(
            &star.name,
            CelestialBody::Star(StarVectors::from_entry(entry)),
        ))
    }

    /// Planets first, then stars, each in configuration order.
    pub fn resolve_all(&self, targets: &TargetsConfig) -> Result<Vec<CelestialTarget>, AlmanacError> {
        let planets = targets.planets.iter().map(|p| self.resolve_planet(p));
        let stars = targets.stars.iter().map(|s| self.resolve_star(s));
        planets.chain(stars).collect()
    }
}

#[cfg(test)]
mod targets_test {
    use super::*;
    use crate::{
        catalogs::{hipparcos::hipparcos_test::SIRIUS, mpcorb::mpcorb_test::CERES},
        constants::AU,
        jpl_ephem::naif::{
            naif_data::{
                test_kernel::{build_kernel, TestSegment},
                NaifData,
            },
            naif_ids::PlanetaryBary,
        },
    };

    fn ephem() -> JPLEphem {
        let bytes = build_kernel(
            &[
                TestSegment::constant(10, 0, [0.0, 0.0, 0.0]),
                TestSegment::constant(3, 0, [AU, 0.0, 0.0]),
                TestSegment::constant(301, 3, [384_400.0, 0.0, 0.0]),
                TestSegment::constant(4, 0, [0.0, 1.5 * AU, 0.0]),
            ],
            "LTL-IEEE",
        );
        JPLEphem::from_naif(NaifData::from_bytes(&bytes).unwrap())
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("Mars barycenter"), "Mars");
        assert_eq!(display_name("(1) Ceres"), "Ceres");
        assert_eq!(display_name("(433) Eros"), "Eros");
        assert_eq!(display_name("Moon"), "Moon");
        assert_eq!(display_name("Pluto barycenter"), "Pluto");
    }

    #[test]
    fn test_resolve_planets() {
        let ephem = ephem();
        let resolver = TargetResolver::new(&ephem, None, None);

        let mars = resolver.resolve_planet("Mars barycenter").unwrap();
        assert_eq!(mars.name, "Mars");
        assert_eq!(mars.body, CelestialBody::Planet(NaifIds::PB(PlanetaryBary::Mars)));

        let sun = resolver.resolve_planet("Sun").unwrap();
        assert!(sun.is_sun());
        assert!(resolver.resolve_planet("MOON").unwrap().is_moon());

        assert_eq!(
            resolver.resolve_planet("Vulcan"),
            Err(AlmanacError::UnknownPlanet("Vulcan".to_string()))
        );
        assert_eq!(
            resolver.resolve_planet("Jupiter barycenter"),
            Err(AlmanacError::EphemerisBodyNotFound(5))
        );
    }

    #[test]
    fn test_resolve_minor_planet() {
        let ephem = ephem();
        let catalog = MpcOrbCatalog::parse(CERES).unwrap();
        let resolver = TargetResolver::new(&ephem, None, Some(&catalog));

        let ceres = resolver.resolve_planet("(1) Ceres").unwrap();
        assert_eq!(ceres.name, "Ceres");
        assert!(matches!(ceres.body, CelestialBody::MinorPlanet(_)));

        assert_eq!(
            resolver.resolve_planet("(2) Pallas"),
            Err(AlmanacError::MinorPlanetNotFound("(2) Pallas".to_string()))
        );
    }

    #[test]
    fn test_resolve_stars() {
        let ephem = ephem();
        let catalog = HipparcosCatalog::from_reader(SIRIUS.as_bytes()).unwrap();
        let resolver = TargetResolver::new(&ephem, Some(&catalog), None);

        let sirius = resolver
            .resolve_star(&StarTarget {
                name: "Sirius".to_string(),
                hip: 32349,
            })
            .unwrap();
        assert_eq!(sirius.name, "Sirius");
        assert!(sirius.is_star());

        let missing = StarTarget {
            name: "Vega".to_string(),
            hip: 91262,
        };
        assert_eq!(resolver.resolve_star(&missing), Err(AlmanacError::StarNotFound(91262)));
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let ephem = ephem();
        let catalog = HipparcosCatalog::from_reader(SIRIUS.as_bytes()).unwrap();
        let resolver = TargetResolver::new(&ephem, Some(&catalog), None);
        let config = TargetsConfig {
            planets: vec!["Sun".to_string(), "Moon".to_string(), "Mars barycenter".to_string()],
            stars: vec![StarTarget {
                name: "Sirius".to_string(),
                hip: 32349,
            }],
        };
        let names: Vec<String> = resolver
            .resolve_all(&config)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Sun", "Moon", "Mars", "Sirius"]);
    }
}
