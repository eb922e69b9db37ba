use std::io;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use almanac::{almanac::Almanac, config::Config, data_files::DataStore};

fn main() -> anyhow::Result<()> {
    // stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = Config::load().context("loading configuration")?;
    let store = DataStore::new(config.data.download_timeout()).context("preparing data cache")?;
    let almanac = Almanac::load(&config, &store).context("loading almanac data")?;

    let written = almanac
        .write(&mut io::stdout().lock())
        .context("computing the almanac")?;
    info!(written, "done");
    Ok(())
}
