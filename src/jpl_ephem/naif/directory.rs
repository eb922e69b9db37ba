//! Segment directory of an SPK type 2 segment.
//!
//! The last four DP-words of every type 2 segment are
//! `init` (ET seconds of the first record start), `intlen` (seconds covered by one
//! record), `rsize` (record size in DP-words) and `n` (number of records).
use std::fmt;

use hifitime::{Duration, Epoch};
use nom::number::complete::le_f64;

use crate::almanac_errors::AlmanacError;

#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    /// Decode the directory of the segment ending at `final_addr`.
    ///
    /// Arguments
    /// -----------------
    /// * `kernel`: the full file content.
    /// * `final_addr`: last DP-word address of the segment (1-based).
    pub fn read(kernel: &[u8], final_addr: usize) -> Result<Self, AlmanacError> {
        let start = final_addr.checked_sub(4).map(|w| w * 8).ok_or_else(|| {
            AlmanacError::UnsupportedBinaryFormat(format!("segment end address {final_addr}"))
        })?;
        let bytes = kernel.get(start..start + 32).ok_or_else(|| {
            AlmanacError::UnsupportedBinaryFormat(format!(
                "segment directory at word {final_addr} lies past the end of the file"
            ))
        })?;

        let (input, init) = le_f64::<_, nom::error::Error<&[u8]>>(bytes)?;
        let (input, intlen) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;
        let (input, rsize) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;
        let (_, n_records) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;

        if intlen <= 0.0 || rsize < 5.0 || n_records < 1.0 {
            return Err(AlmanacError::UnsupportedBinaryFormat(format!(
                "malformed segment directory (intlen={intlen}, rsize={rsize}, n={n_records})"
            )));
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize: rsize as usize,
            n_records: n_records as usize,
        })
    }

    /// Index of the record covering `et_seconds`, clamped to the valid range.
    ///
    /// An epoch falling exactly on the segment end belongs to the last record.
    pub fn record_index(&self, et_seconds: f64) -> usize {
        let raw = ((et_seconds - self.init) / self.intlen).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.n_records - 1)
        }
    }
}

impl fmt::Display for DirectoryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records of {} from {} ({} words each)",
            self.n_records,
            Duration::from_seconds(self.intlen),
            Epoch::from_et_seconds(self.init),
            self.rsize
        )
    }
}
