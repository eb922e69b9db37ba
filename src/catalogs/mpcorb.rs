//! # MPCORB orbital elements reader
//!
//! Reads the Minor Planet Center's `MPCORB.DAT` format (or any excerpt of it) into
//! [`MinorPlanetRecord`]s, one per line.
//!
//! ## Layout
//! -----------------
//! Fixed columns (0-based, end exclusive):
//!
//! | Range     | Field                                   |
//! |-----------|-----------------------------------------|
//! | `0..7`    | packed designation                      |
//! | `8..13`   | absolute magnitude H                    |
//! | `14..19`  | slope parameter G                       |
//! | `20..25`  | packed epoch (TT)                       |
//! | `26..35`  | mean anomaly (deg)                      |
//! | `37..46`  | argument of perihelion (deg, J2000)     |
//! | `48..57`  | longitude of ascending node (deg, J2000)|
//! | `59..68`  | inclination (deg, J2000)                |
//! | `70..79`  | eccentricity                            |
//! | `80..91`  | mean daily motion (deg/day)             |
//! | `92..103` | semi-major axis (AU)                    |
//! | `166..194`| readable designation, e.g. `(1) Ceres`  |
//!
//! The full file starts with a free-text preamble closed by a line of dashes; it is
//! skipped when present. Blank lines are ignored.
//!
//! ## Packed epochs
//! -----------------
//! `K24AH` reads century `K` (20), year `24`, month `A` (10), day `H` (17), i.e.
//! 2024-10-17 at 0h TT. Digits count for themselves and letters from `A = 10`.
use std::ops::Range;

use camino::Utf8Path;
use hifitime::{Epoch, TimeScale};
use tracing::{debug, info};

use crate::{almanac_errors::AlmanacError, constants::MJD, orbit_type::keplerian_element::KeplerianElements};

#[derive(Debug, Clone, PartialEq)]
pub struct MinorPlanetRecord {
    pub designation_packed: String,
    /// Readable designation, e.g. `(1) Ceres`.
    pub designation: String,
    pub magnitude_h: Option<f64>,
    pub magnitude_g: Option<f64>,
    pub epoch_packed: String,
    /// Daily motion as published (deg/day); informational only.
    pub mean_daily_motion: f64,
    pub elements: KeplerianElements,
}

/// Slice `line[range]`, clamping the end to the line length.
fn column(line: &str, range: Range<usize>) -> &str {
    let end = range.end.min(line.len());
    line.get(range.start..end).unwrap_or("").trim()
}

fn packed_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - 48),
        'A'..='Z' => Some(c as u32 - 55),
        'a'..='z' => Some(c as u32 - 61),
        _ => None,
    }
}

/// Decode a packed MPC epoch into MJD (TT).
pub fn unpack_epoch(packed: &str) -> Option<MJD> {
    let chars: Vec<char> = packed.chars().collect();
    if chars.len() != 5 {
        return None;
    }
    let century = packed_value(chars[0])?;
    let year_in_century: String = chars[1..3].iter().collect();
    let year = century * 100 + year_in_century.parse::<u32>().ok()?;
    let month = packed_value(chars[3])?;
    let day = packed_value(chars[4])?;

    Epoch::maybe_from_gregorian(year as i32, month as u8, day as u8, 0, 0, 0, 0, TimeScale::TT)
        .ok()
        .map(|epoch| epoch.to_mjd_tt_days())
}

impl MinorPlanetRecord {
    /// Parse one MPCORB line.
    ///
    /// Arguments
    /// -----------------
    /// * `line`: the raw line.
    /// * `line_number`: 1-based position in the file, for error messages.
    pub fn from_line(line: &str, line_number: usize) -> Result<Self, AlmanacError> {
        let fail = |reason: String| AlmanacError::CatalogParse {
            line: line_number,
            reason,
        };
        if line.len() < 103 {
            return Err(fail(format!("line too short ({} characters)", line.len())));
        }

        let number = |range: Range<usize>, name: &str| -> Result<f64, AlmanacError> {
            let raw = column(line, range);
            raw.parse::<f64>()
                .map_err(|_| fail(format!("invalid {name}: {raw:?}")))
        };
        let optional = |range: Range<usize>| column(line, range).parse::<f64>().ok();

        let epoch_packed = column(line, 20..25).to_string();
        let reference_epoch =
            unpack_epoch(&epoch_packed).ok_or_else(|| fail(format!("invalid epoch {epoch_packed:?}")))?;

        let elements = KeplerianElements {
            reference_epoch,
            semi_major_axis: number(92..103, "semi-major axis")?,
            eccentricity: number(70..79, "eccentricity")?,
            inclination: number(59..68, "inclination")?.to_radians(),
            ascending_node_longitude: number(48..57, "ascending node")?.to_radians(),
            periapsis_argument: number(37..46, "argument of perihelion")?.to_radians(),
            mean_anomaly: number(26..35, "mean anomaly")?.to_radians(),
        };

        let designation_packed = column(line, 0..7).to_string();
        let designation = match column(line, 166..194) {
            "" => designation_packed.clone(),
            readable => readable.to_string(),
        };

        Ok(MinorPlanetRecord {
            designation_packed,
            designation,
            magnitude_h: optional(8..13),
            magnitude_g: optional(14..19),
            epoch_packed,
            mean_daily_motion: number(80..91, "mean daily motion")?,
            elements,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MpcOrbCatalog {
    records: Vec<MinorPlanetRecord>,
}

impl MpcOrbCatalog {
    pub fn parse(content: &str) -> Result<Self, AlmanacError> {
        let lines: Vec<&str> = content.lines().collect();
        let first_data = lines
            .iter()
            .position(|line| line.starts_with("-----"))
            .map_or(0, |dashes| dashes + 1);

        let records = lines
            .iter()
            .enumerate()
            .skip(first_data)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| MinorPlanetRecord::from_line(line, i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "parsed MPCORB records");
        Ok(MpcOrbCatalog { records })
    }

    pub fn from_path(path: &Utf8Path) -> Result<Self, AlmanacError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&content)?;
        info!(path = %path, count = catalog.len(), "loaded minor planet elements");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by readable designation (`"(1) Ceres"`) or packed designation.
    pub fn find(&self, designation: &str) -> Result<&MinorPlanetRecord, AlmanacError> {
        let wanted = designation.trim();
        self.records
            .iter()
            .find(|r| r.designation == wanted || r.designation_packed == wanted)
            .ok_or_else(|| AlmanacError::MinorPlanetNotFound(wanted.to_string()))
    }
}
