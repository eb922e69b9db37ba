//! NAIF integer codes of the bodies found in planetary kernels, and the names
//! they are looked up by.
//!
//! Names follow the NAIF conventions, case-insensitive: `"sun"`, `"moon"`,
//! `"earth"`, `"mars barycenter"`, `"jupiter"` (mass centre), `"ssb"`…
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanetaryBary {
    Mercury = 1,
    Venus = 2,
    EarthMoon = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
}

impl PlanetaryBary {
    const ALL: [PlanetaryBary; 9] = [
        PlanetaryBary::Mercury,
        PlanetaryBary::Venus,
        PlanetaryBary::EarthMoon,
        PlanetaryBary::Mars,
        PlanetaryBary::Jupiter,
        PlanetaryBary::Saturn,
        PlanetaryBary::Uranus,
        PlanetaryBary::Neptune,
        PlanetaryBary::Pluto,
    ];

    fn planet_name(&self) -> &'static str {
        match self {
            PlanetaryBary::Mercury => "Mercury",
            PlanetaryBary::Venus => "Venus",
            PlanetaryBary::EarthMoon => "Earth",
            PlanetaryBary::Mars => "Mars",
            PlanetaryBary::Jupiter => "Jupiter",
            PlanetaryBary::Saturn => "Saturn",
            PlanetaryBary::Uranus => "Uranus",
            PlanetaryBary::Neptune => "Neptune",
            PlanetaryBary::Pluto => "Pluto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifIds {
    /// Solar system barycenter (0)
    SSB,
    /// Sun (10)
    Sun,
    /// Planetary system barycenter (1..=9)
    PB(PlanetaryBary),
    /// Planet mass centre (199, 299, …, 999)
    PMC(PlanetaryBary),
    /// Moon (301)
    Moon,
}

impl NaifIds {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(NaifIds::SSB),
            10 => Some(NaifIds::Sun),
            301 => Some(NaifIds::Moon),
            1..=9 => PlanetaryBary::ALL.get(id as usize - 1).copied().map(NaifIds::PB),
            _ if id % 100 == 99 && (1..=9).contains(&(id / 100)) => PlanetaryBary::ALL
                .get((id / 100) as usize - 1)
                .copied()
                .map(NaifIds::PMC),
            _ => None,
        }
    }

    pub fn to_id(&self) -> i32 {
        match self {
            NaifIds::SSB => 0,
            NaifIds::Sun => 10,
            NaifIds::Moon => 301,
            NaifIds::PB(bary) => *bary as i32,
            NaifIds::PMC(bary) => *bary as i32 * 100 + 99,
        }
    }

    /// Resolve a body name, ignoring case and surrounding blanks.
    ///
    /// Both `"<planet> barycenter"` and the bare planet name are understood, the
    /// latter designating the planet mass centre. `"earth barycenter"` and
    /// `"earth moon barycenter"` both name the Earth-Moon barycenter.
    ///
    /// Return
    /// ----------
    /// * `None` when the name designates no body known to planetary kernels.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "ssb" | "solar system barycenter" => return Some(NaifIds::SSB),
            "sun" => return Some(NaifIds::Sun),
            "moon" => return Some(NaifIds::Moon),
            "earth moon barycenter" | "earth-moon barycenter" => {
                return Some(NaifIds::PB(PlanetaryBary::EarthMoon))
            }
            _ => {}
        }

        let (planet, barycenter) = match name.strip_suffix(" barycenter") {
            Some(planet) => (planet.trim_end(), true),
            None => (name.as_str(), false),
        };

        PlanetaryBary::ALL
            .iter()
            .find(|bary| bary.planet_name().eq_ignore_ascii_case(planet))
            .map(|&bary| {
                if barycenter {
                    NaifIds::PB(bary)
                } else {
                    NaifIds::PMC(bary)
                }
            })
    }
}

impl From<NaifIds> for i32 {
    fn from(naif_id: NaifIds) -> Self {
        naif_id.to_id()
    }
}

impl fmt::Display for NaifIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaifIds::SSB => write!(f, "Solar System Barycenter"),
            NaifIds::Sun => write!(f, "Sun"),
            NaifIds::Moon => write!(f, "Moon"),
            NaifIds::PB(PlanetaryBary::EarthMoon) => write!(f, "Earth-Moon Barycenter"),
            NaifIds::PB(bary) => write!(f, "{} Barycenter", bary.planet_name()),
            NaifIds::PMC(bary) => write!(f, "{}", bary.planet_name()),
        }
    }
}
