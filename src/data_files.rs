//! # Data file resolution
//!
//! The almanac reads three external files: the SPK kernel, the Hipparcos main
//! catalog and an MPCORB excerpt. Each one is configured as a local path, a URL,
//! or both.
//!
//! Resolution order:
//! 1. the local path, when it exists;
//! 2. a copy previously downloaded into the cache directory
//!    (`<cache>/night_almanac/<file name>`);
//! 3. a fresh download from the URL into that cache.
//!
//! Downloads are blocking and go through a single [`ureq::Agent`] with a global
//! timeout. The payload is streamed to a `.part` file renamed on success, so an
//! interrupted download never leaves a truncated file in the cache.
use std::{fs, io, time::Duration};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ureq::Agent;

use crate::almanac_errors::AlmanacError;

/// Where a data file may be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DataSource {
    /// Local path, absolute or relative to the working directory.
    pub path: Option<String>,
    /// Remote location used when the local path does not exist.
    pub url: Option<String>,
}

impl DataSource {
    pub fn local(path: &str) -> Self {
        DataSource {
            path: Some(path.to_string()),
            url: None,
        }
    }

    pub fn remote(path: &str, url: &str) -> Self {
        DataSource {
            path: Some(path.to_string()),
            url: Some(url.to_string()),
        }
    }

    /// Name under which a downloaded copy is cached.
    fn cache_file_name(&self) -> Option<&str> {
        self.url
            .as_deref()
            .and_then(|url| url.rsplit('/').next())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct DataStore {
    http_client: Agent,
    cache_dir: Utf8PathBuf,
}

impl DataStore {
    /// Data store caching downloads under the user cache directory.
    pub fn new(timeout: Duration) -> Result<Self, AlmanacError> {
        let base_dirs = BaseDirs::new().ok_or_else(|| {
            AlmanacError::UnableToCreateBaseDir("no home directory for this user".to_string())
        })?;
        let cache_root = Utf8Path::from_path(base_dirs.cache_dir()).ok_or_else(|| {
            AlmanacError::UnableToCreateBaseDir(format!(
                "cache directory is not valid UTF-8: {}",
                base_dirs.cache_dir().display()
            ))
        })?;
        Ok(Self::with_cache_dir(
            cache_root.join("night_almanac"),
            timeout,
        ))
    }

    pub fn with_cache_dir(cache_dir: Utf8PathBuf, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        DataStore {
            http_client: config.into(),
            cache_dir,
        }
    }

    pub fn cache_dir(&self) -> &Utf8Path {
        &self.cache_dir
    }

    /// Locate a data file on disk, downloading it if needed.
    ///
    /// Arguments
    /// ---------
    /// * `source`: configured path and/or URL.
    ///
    /// Return
    /// ------
    /// * The path of a file that exists, or [`AlmanacError::DataFileNotFound`] when
    ///   neither the path nor a URL can provide it.
    pub fn resolve(&self, source: &DataSource) -> Result<Utf8PathBuf, AlmanacError> {
        if let Some(path) = source.path.as_deref().map(Utf8Path::new) {
            if path.exists() {
                debug!(%path, "using local data file");
                return Ok(path.to_path_buf());
            }
        }

        let (Some(url), Some(file_name)) = (source.url.as_deref(), source.cache_file_name())
        else {
            return Err(AlmanacError::DataFileNotFound(
                source.path.clone().unwrap_or_default(),
            ));
        };

        let cached = self.cache_dir.join(file_name);
        if cached.exists() {
            debug!(path = %cached, "using cached data file");
            return Ok(cached);
        }

        fs::create_dir_all(&self.cache_dir).map_err(|err| {
            AlmanacError::UnableToCreateBaseDir(format!("{}: {err}", self.cache_dir))
        })?;
        self.download(url, &cached)?;
        Ok(cached)
    }

    fn download(&self, url: &str, destination: &Utf8Path) -> Result<(), AlmanacError> {
        info!(%url, "downloading data file");
        let partial = destination.with_extension("part");

        let mut response = self.http_client.get(url).call()?;
        let mut reader = response.body_mut().as_reader();
        let mut file = fs::File::create(&partial)?;
        let bytes = io::copy(&mut reader, &mut file)?;
        drop(file);

        fs::rename(&partial, destination)?;
        info!(path = %destination, bytes, "download complete");
        Ok(())
    }
}
