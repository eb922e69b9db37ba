//! # Configuration
//!
//! Runtime settings loaded once from a TOML file:
//!
//! | Table        | Content                                              |
//! |--------------|------------------------------------------------------|
//! | `[observer]` | site coordinates and IANA timezone                   |
//! | `[targets]`  | planet names and `(name, hip)` star pairs            |
//! | `[data]`     | location of the SPK kernel and catalogs              |
//! | `[search]`   | horizon and sampling steps of the event searches     |
//! | `[report]`   | elongation cadences, failure policy, pinned start    |
//!
//! The file is read from `$ALMANAC_CONFIG`, or `./almanac.toml` when the variable
//! is unset. Every table is optional; missing values fall back to the defaults,
//! which describe a site in Des Moines (Iowa) on US/Central time.
use std::{env, fs, time::Duration};

use camino::Utf8Path;
use chrono_tz::Tz;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    almanac_errors::AlmanacError,
    constants::{Degree, Meter},
    data_files::DataSource,
    observers::Observer,
    time::{parse_start, parse_timezone},
};

pub const CONFIG_ENV_VAR: &str = "ALMANAC_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "almanac.toml";

pub const DE440S_URL: &str = "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/de440s.bsp";
pub const HIPPARCOS_URL: &str = "https://cdsarc.cds.unistra.fr/ftp/cats/I/239/hip_main.dat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub observer: SiteConfig,
    pub targets: TargetsConfig,
    pub data: DataConfig,
    pub search: SearchSettings,
    pub report: ReportConfig,
}

/// Observing site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub latitude: Degree,
    pub longitude: Degree,
    pub elevation: Meter,
    /// IANA zone name, e.g. `US/Central`.
    pub timezone: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            latitude: 41.5868,
            longitude: -93.6250,
            elevation: 0.0,
            timezone: "US/Central".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn observer(&self) -> Result<Observer, AlmanacError> {
        Observer::new(self.latitude, self.longitude, self.elevation)
    }

    pub fn timezone(&self) -> Result<Tz, AlmanacError> {
        parse_timezone(&self.timezone)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarTarget {
    pub name: String,
    /// Hipparcos catalog number.
    pub hip: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Ephemeris names (`"Mars barycenter"`) or minor planet designations (`"(1) Ceres"`).
    pub planets: Vec<String>,
    pub stars: Vec<StarTarget>,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        let planets = [
            "Sun",
            "Moon",
            "Mercury barycenter",
            "Venus barycenter",
            "Mars barycenter",
            "Jupiter barycenter",
            "Saturn barycenter",
            "Uranus barycenter",
            "Neptune barycenter",
        ];
        TargetsConfig {
            planets: planets.iter().map(|p| p.to_string()).collect(),
            stars: vec![StarTarget {
                name: "Sirius".to_string(),
                hip: 32349,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub ephemeris: DataSource,
    pub hipparcos: DataSource,
    pub mpcorb: DataSource,
    /// Global timeout of a download, seconds.
    pub download_timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            ephemeris: DataSource::remote("de440s.bsp", DE440S_URL),
            hipparcos: DataSource::remote("hip_main.dat", HIPPARCOS_URL),
            mpcorb: DataSource::local("mpcorb.excerpt.dat"),
            download_timeout_secs: 300,
        }
    }
}

impl DataConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// Tuning of the rise/set and altitude maximum searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Altitude of the body centre at rise and set (degrees).
    pub horizon_degrees: Degree,
    /// Sampling step of the rise/set search (days).
    pub rise_set_step_days: f64,
    /// Sampling step of the altitude maximum search (days).
    pub peak_step_days: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            // standard refraction at the horizon
            horizon_degrees: -34.0 / 60.0,
            rise_set_step_days: 0.25,
            peak_step_days: 0.04,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Spacing of the future elongation samples of planets (days).
    pub planet_elongation_step_days: f64,
    /// Spacing of the future elongation samples of stars (days).
    pub star_elongation_step_days: f64,
    /// Log and skip targets that fail instead of aborting the run.
    pub skip_failed_targets: bool,
    /// RFC 3339 start of the window; the current instant when absent.
    pub start: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            planet_elongation_step_days: 7.0,
            star_elongation_step_days: 30.0,
            skip_failed_targets: false,
            start: None,
        }
    }
}

impl ReportConfig {
    /// Pinned start of the window, if any.
    pub fn start_epoch(&self) -> Result<Option<Epoch>, AlmanacError> {
        self.start.as_deref().map(parse_start).transpose()
    }
}

impl Config {
    /// Load from `$ALMANAC_CONFIG`, or from `./almanac.toml`.
    ///
    /// An explicitly configured file must exist; the default file is optional.
    pub fn load() -> Result<Self, AlmanacError> {
        Self::load_explicit(env::var(CONFIG_ENV_VAR).ok().as_deref())
    }

    /// Load from `explicit` when given, which must then exist, or from the
    /// default file otherwise.
    pub fn load_explicit(explicit: Option<&str>) -> Result<Self, AlmanacError> {
        match explicit.map(Utf8Path::new) {
            Some(path) if !path.exists() => Err(AlmanacError::DataFileNotFound(path.to_string())),
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_path(Utf8Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Load configuration from `path`, falling back to the defaults when the file
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, AlmanacError> {
        if !path.exists() {
            info!(%path, "no configuration file, using defaults");
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        info!(%path, "loaded configuration");
        Ok(config)
    }

    /// Check every value that is not already constrained by its type.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        self.observer.observer()?;
        self.observer.timezone()?;
        self.report.start_epoch()?;

        let steps = [
            ("search.rise_set_step_days", self.search.rise_set_step_days),
            ("search.peak_step_days", self.search.peak_step_days),
            ("report.planet_elongation_step_days", self.report.planet_elongation_step_days),
            ("report.star_elongation_step_days", self.report.star_elongation_step_days),
        ];
        for (name, value) in steps {
            if !(value.is_finite() && value > 0.0) {
                return Err(AlmanacError::InvalidSetting(format!(
                    "{name} must be a positive number of days, got {value}"
                )));
            }
        }
        if !self.search.horizon_degrees.is_finite() {
            return Err(AlmanacError::InvalidSetting(
                "search.horizon_degrees is not finite".to_string(),
            ));
        }
        Ok(())
    }
}
