//! # Hipparcos main catalog reader
//!
//! `hip_main.dat` (ESA 1997, CDS catalog I/239) is a `|`-separated table with one
//! star per line. The fields used here are:
//!
//! | Index | Field                             | Unit    |
//! |-------|-----------------------------------|---------|
//! | 1     | HIP number                        |         |
//! | 5     | V magnitude                       | mag     |
//! | 8     | right ascension, ICRS, J1991.25   | degrees |
//! | 9     | declination, ICRS, J1991.25       | degrees |
//! | 11    | trigonometric parallax            | mas     |
//! | 12    | proper motion μα·cos δ            | mas/yr  |
//! | 13    | proper motion μδ                  | mas/yr  |
//!
//! A handful of entries have no astrometric solution (blank position); they are
//! skipped since nothing can be computed for them.
use std::{collections::HashMap, io::Read};

use camino::Utf8Path;
use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::almanac_errors::AlmanacError;

#[derive(Debug, Clone, PartialEq)]
pub struct StarEntry {
    pub hip: u32,
    pub magnitude: Option<f64>,
    pub ra_degrees: f64,
    pub dec_degrees: f64,
    pub parallax_mas: f64,
    pub ra_mas_per_year: f64,
    pub dec_mas_per_year: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HipparcosCatalog {
    stars: HashMap<u32, StarEntry>,
}

impl HipparcosCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AlmanacError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut stars = HashMap::new();
        let mut skipped = 0usize;

        for (index, row) in csv_reader.records().enumerate() {
            let line = index + 1;
            let row = row.map_err(|err| AlmanacError::CatalogParse {
                line,
                reason: err.to_string(),
            })?;

            let field = |i: usize| row.get(i).unwrap_or("");
            let number = |i: usize, name: &str| -> Result<f64, AlmanacError> {
                field(i).parse::<f64>().map_err(|_| AlmanacError::CatalogParse {
                    line,
                    reason: format!("invalid {name}: {:?}", field(i)),
                })
            };

            if field(8).is_empty() || field(9).is_empty() {
                skipped += 1;
                continue;
            }

            let hip = field(1).parse::<u32>().map_err(|_| AlmanacError::CatalogParse {
                line,
                reason: format!("invalid HIP number: {:?}", field(1)),
            })?;

            let entry = StarEntry {
                hip,
                magnitude: field(5).parse().ok(),
                ra_degrees: number(8, "right ascension")?,
                dec_degrees: number(9, "declination")?,
                parallax_mas: number(11, "parallax").unwrap_or(0.0),
                ra_mas_per_year: number(12, "proper motion in RA").unwrap_or(0.0),
                dec_mas_per_year: number(13, "proper motion in Dec").unwrap_or(0.0),
            };
            stars.insert(hip, entry);
        }

        debug!(count = stars.len(), skipped, "parsed Hipparcos entries");
        Ok(HipparcosCatalog { stars })
    }

    pub fn from_path(path: &Utf8Path) -> Result<Self, AlmanacError> {
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;
        info!(path = %path, count = catalog.len(), "loaded Hipparcos catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn get(&self, hip: u32) -> Result<&StarEntry, AlmanacError> {
        self.stars.get(&hip).ok_or(AlmanacError::StarNotFound(hip))
    }
}
