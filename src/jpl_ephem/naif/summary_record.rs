//! Segment summaries of an SPK kernel.
//!
//! Summary records form a doubly linked list starting at the record pointed to by
//! `fward`. Each record starts with three control words (`next`, `prev`, `nsum`)
//! followed by `nsum` packed summaries of `ND` doubles and `NI` integers.
use std::fmt;

use hifitime::Epoch;
use nom::{
    number::complete::{le_f64, le_i32},
    IResult,
};

use crate::almanac_errors::AlmanacError;

use super::daf_header::DAF_RECORD_BYTES;

/// SPK data type 2: Chebyshev polynomials for position, velocity by differentiation.
pub const SPK_CHEBYSHEV_POSITION: i32 = 2;

#[derive(Debug, PartialEq, Clone)]
pub struct Summary {
    /// First covered epoch, ET seconds past J2000.
    pub start_epoch: f64,
    /// Last covered epoch, ET seconds past J2000.
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    /// First DP-word address of the segment (1-based).
    pub initial_addr: i32,
    /// Last DP-word address of the segment (1-based).
    pub final_addr: i32,
}

impl Summary {
    /// Decode one `ND = 2`, `NI = 6` summary.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;
        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        (self.start_epoch..=self.end_epoch).contains(&et_seconds)
    }
}

/// One physical summary record: its link to the next record and the summaries it holds.
#[derive(Debug, PartialEq)]
pub struct SummaryRecord {
    /// Record number of the next summary record, `0` on the last one.
    pub next: usize,
    pub summaries: Vec<Summary>,
}

impl SummaryRecord {
    /// Read the summary record number `record` (1-based) from the whole kernel.
    ///
    /// Arguments
    /// -----------------
    /// * `kernel`: the full file content.
    /// * `record`: 1-based record number.
    /// * `summary_words`: size of one summary in DP-words.
    pub fn read(
        kernel: &[u8],
        record: usize,
        summary_words: usize,
    ) -> Result<Self, AlmanacError> {
        let start = (record - 1) * DAF_RECORD_BYTES;
        let bytes = kernel
            .get(start..start + DAF_RECORD_BYTES)
            .ok_or_else(|| {
                AlmanacError::UnsupportedBinaryFormat(format!(
                    "summary record {record} lies past the end of the file"
                ))
            })?;

        let (input, next) = le_f64::<_, nom::error::Error<&[u8]>>(bytes)?;
        let (input, _prev) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;
        let (_, nsum) = le_f64::<_, nom::error::Error<&[u8]>>(input)?;

        let stride = summary_words * 8;
        let nsum = nsum as usize;
        if 24 + nsum * stride > DAF_RECORD_BYTES {
            return Err(AlmanacError::UnsupportedBinaryFormat(format!(
                "{nsum} summaries do not fit in record {record}"
            )));
        }

        let summaries = (0..nsum)
            .map(|i| {
                let offset = 24 + i * stride;
                Summary::parse(&bytes[offset..offset + stride])
                    .map(|(_, summary)| summary)
                    .map_err(AlmanacError::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SummaryRecord {
            next: next as usize,
            summaries,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} wrt {} [{} .. {}] type {} words {}..{}",
            self.target,
            self.center,
            Epoch::from_et_seconds(self.start_epoch),
            Epoch::from_et_seconds(self.end_epoch),
            self.data_type,
            self.initial_addr,
            self.final_addr
        )
    }
}
