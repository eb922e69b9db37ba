//! # Almanac context
//!
//! [`AlmanacContext`] gathers what stays fixed during a run (site, timezone,
//! window, tuning). [`Almanac`] adds the loaded data files and produces the report.
//!
//! ```no_run
//! use almanac::{almanac::Almanac, config::Config, data_files::DataStore};
//!
//! let config = Config::load()?;
//! let store = DataStore::new(config.data.download_timeout())?;
//! let almanac = Almanac::load(&config, &store)?;
//! almanac.write(&mut std::io::stdout().lock())?;
//! # Ok::<(), almanac::almanac_errors::AlmanacError>(())
//! ```
use std::io::Write;

use chrono_tz::Tz;
use tracing::info;

use crate::{
    almanac_errors::AlmanacError,
    astrometry::Sky,
    catalogs::{hipparcos::HipparcosCatalog, mpcorb::MpcOrbCatalog},
    config::{Config, ReportConfig, SearchSettings, TargetsConfig},
    data_files::DataStore,
    jpl_ephem::JPLEphem,
    observers::Observer,
    report::write_report,
    targets::{CelestialTarget, TargetResolver},
    time::{format_local, TimeWindow},
};

/// Immutable settings of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacContext {
    pub observer: Observer,
    pub timezone: Tz,
    pub window: TimeWindow,
    pub search: SearchSettings,
    pub report: ReportConfig,
}

impl AlmanacContext {
    /// Context described by `config`; the window starts now unless pinned.
    pub fn from_config(config: &Config) -> Result<Self, AlmanacError> {
        let window = match config.report.start_epoch()? {
            Some(start) => TimeWindow::starting_at(start),
            None => TimeWindow::from_now()?,
        };
        Ok(AlmanacContext {
            observer: config.observer.observer()?,
            timezone: config.observer.timezone()?,
            window,
            search: config.search,
            report: config.report.clone(),
        })
    }
}

/// Context, data files and resolved targets, ready to report.
pub struct Almanac {
    context: AlmanacContext,
    ephem: JPLEphem,
    targets: Vec<CelestialTarget>,
}

fn needs_minor_planets(targets: &TargetsConfig) -> bool {
    targets
        .planets
        .iter()
        .any(|p| p.trim_start().starts_with('('))
}

impl Almanac {
    /// Load the data files the configured targets need and resolve the targets.
    ///
    /// The Hipparcos catalog is only read when stars are configured and the MPCORB
    /// file only when a minor planet is.
    pub fn load(config: &Config, store: &DataStore) -> Result<Self, AlmanacError> {
        config.validate()?;
        let context = AlmanacContext::from_config(config)?;

        let ephem = JPLEphem::from_file(&store.resolve(&config.data.ephemeris)?)?;

        let stars = if config.targets.stars.is_empty() {
            None
        } else {
            Some(HipparcosCatalog::from_path(&store.resolve(&config.data.hipparcos)?)?)
        };

        let minor_planets = if needs_minor_planets(&config.targets) {
            Some(MpcOrbCatalog::from_path(&store.resolve(&config.data.mpcorb)?)?)
        } else {
            None
        };

        let targets = TargetResolver::new(&ephem, stars.as_ref(), minor_planets.as_ref())
            .resolve_all(&config.targets)?;

        let start = format_local(&context.window.start, &context.timezone)?;
        info!(%start, targets = targets.len(), "almanac ready");

        Ok(Almanac {
            context,
            ephem,
            targets,
        })
    }

    pub fn context(&self) -> &AlmanacContext {
        &self.context
    }

    pub fn targets(&self) -> &[CelestialTarget] {
        &self.targets
    }

    /// Write the report of every target to `out`.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<usize, AlmanacError> {
        let sky = Sky::new(&self.ephem, self.context.observer, self.context.search);
        write_report(&sky, &self.context, &self.targets, out)
    }
}
