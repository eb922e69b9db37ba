//! Comment area of a DAF file.
//!
//! Records 2 to `FWARD - 1` hold free text: lines are separated by NUL bytes and
//! the text ends with an EOT (`0x04`). JPL planetary kernels describe themselves
//! there, e.g.
//!
//! ```text
//! JPL planetary and lunar ephemeris DE440
//! ...
//! JD   2287184.5   to   JD   2688976.5
//! ```
//!
//! The version and the Julian date coverage are extracted when present; kernels
//! without these lines (or without comments at all) are still valid.
use std::fmt;

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{not_line_ending, space1},
    number::complete::double,
    IResult, Parser,
};

use super::daf_header::{DAFHeader, DAF_RECORD_BYTES};

const END_OF_COMMENT: u8 = 0x04;

#[derive(Debug, PartialEq, Clone, Default)]
pub struct KernelComment {
    pub text: String,
    /// Ephemeris name, e.g. `DE440`.
    pub version: Option<String>,
    /// First and last Julian dates covered.
    pub coverage_jd: Option<(f64, f64)>,
}

fn parse_version(input: &str) -> IResult<&str, &str> {
    let (input, _) = take_until("JPL planetary and lunar ephemeris")(input)?;
    let (input, _) = tag("JPL planetary and lunar ephemeris ")(input)?;
    let (input, version) = not_line_ending(input)?;
    Ok((input, version.trim()))
}

fn parse_jd_range(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, _) = take_until("JD ")(input)?;
    let (input, (_, _, start_jd, _, _, _, _, end_jd)) = (
        tag("JD"),
        space1,
        |s| double(s),
        space1,
        tag("to"),
        space1,
        (tag("JD"), space1),
        |s| double(s),
    )
        .parse(input)?;
    Ok((input, (start_jd, end_jd)))
}

impl KernelComment {
    /// Decode the raw comment records.
    pub fn from_records(bytes: &[u8]) -> Self {
        let end = bytes
            .iter()
            .position(|&b| b == END_OF_COMMENT)
            .unwrap_or(bytes.len());
        let text: String = String::from_utf8_lossy(&bytes[..end])
            .replace('\0', "\n")
            .trim_end()
            .to_string();

        let version = parse_version(&text).ok().map(|(_, v)| v.to_string());
        let coverage_jd = parse_jd_range(&text).ok().map(|(_, range)| range);

        KernelComment {
            text,
            version,
            coverage_jd,
        }
    }

    /// Comment area of `kernel`, `None` when the file has no comment records.
    pub fn read(kernel: &[u8], header: &DAFHeader) -> Option<Self> {
        let first = DAF_RECORD_BYTES;
        let last = (header.fward.max(1) as usize - 1) * DAF_RECORD_BYTES;
        if last <= first || last > kernel.len() {
            return None;
        }
        Some(Self::from_records(&kernel[first..last]))
    }
}

impl fmt::Display for KernelComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version.as_deref().unwrap_or("unnamed ephemeris"))?;
        if let Some((start, end)) = self.coverage_jd {
            write!(f, " (JD {start} to JD {end})")?;
        }
        Ok(())
    }
}
