//! DAF (Double precision Array File) file record.
//!
//! The first 1024-byte record of an SPK kernel describes how the rest of the
//! file is laid out:
//!
//! * **`idword`**: format identifier, `"DAF/SPK"` for planetary kernels,
//! * **`nd`** / **`ni`**: number of double / integer components in each segment
//!   summary (`2` and `6` for SPK),
//! * **`fward`** / **`bward`**: 1-based record numbers of the first and last
//!   summary records,
//! * **`free`**: first free DP-word address,
//! * **`locfmt`**: binary encoding of the numeric data (`"LTL-IEEE"` or `"BIG-IEEE"`).
//!
//! Only little-endian kernels are read; [`DAFHeader::validate`] rejects anything else
//! before a single coefficient is decoded.
use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::almanac_errors::AlmanacError;

/// Size of one DAF physical record in bytes.
pub const DAF_RECORD_BYTES: usize = 1024;

#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
}

fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

impl DAFHeader {
    /// Decode the file record.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: bytes starting at offset 0 of the kernel.
    ///
    /// Return
    /// ----------
    /// * The remaining input (reserved area and FTP string are skipped) and the header.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, idword) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        Ok((
            input,
            DAFHeader {
                idword: trimmed(idword),
                internal_filename: trimmed(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: trimmed(locfmt),
            },
        ))
    }

    /// Check that the kernel can be read by this crate.
    ///
    /// Pre-1995 kernels carry no `locfmt`; they are little-endian on every platform
    /// still producing them, so an empty tag is accepted.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        if !self.idword.starts_with("DAF/SPK") && !self.idword.starts_with("NAIF/DAF") {
            return Err(AlmanacError::UnsupportedBinaryFormat(format!(
                "not an SPK kernel (id word {:?})",
                self.idword
            )));
        }
        if !(self.locfmt.is_empty() || self.locfmt == "LTL-IEEE") {
            return Err(AlmanacError::UnsupportedBinaryFormat(self.locfmt.clone()));
        }
        if self.nd != 2 || self.ni != 6 {
            return Err(AlmanacError::UnsupportedBinaryFormat(format!(
                "unexpected summary layout ND={} NI={}",
                self.nd, self.ni
            )));
        }
        if self.fward < 2 {
            return Err(AlmanacError::UnsupportedBinaryFormat(format!(
                "invalid first summary record {}",
                self.fward
            )));
        }
        Ok(())
    }

    /// Number of DP-words in one segment summary: `ND + (NI + 1) / 2`.
    pub fn summary_words(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' (ND={}, NI={}, summaries {}..{}, {})",
            self.idword, self.internal_filename, self.nd, self.ni, self.fward, self.bward, self.locfmt
        )
    }
}
