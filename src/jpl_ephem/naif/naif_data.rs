//! In-memory SPK kernel.
//!
//! The whole file is read once, the DAF header is validated, the chain of summary
//! records is followed and every type 2 segment is decoded into its Chebyshev
//! records. Segments are indexed by target; a state is always expressed relative
//! to the segment centre and [`NaifData::barycentric_state`] walks the centres
//! down to the solar system barycenter.
//!
//! # Units & time scales
//! * Epochs are **ET/TDB seconds from J2000**.
//! * Positions in **km**, velocities in **km/s**, ICRF axes.
use std::collections::HashMap;

use camino::Utf8Path;
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::almanac_errors::AlmanacError;

use super::{
    daf_header::DAFHeader,
    directory::DirectoryData,
    ephemeris_record::EphemerisRecord,
    kernel_comment::KernelComment,
    summary_record::{Summary, SummaryRecord, SPK_CHEBYSHEV_POSITION},
};

/// Longest chain of centres followed before giving up (guards against cyclic kernels).
const MAX_CENTER_CHAIN: usize = 8;

#[derive(Debug, Clone)]
pub struct Segment {
    pub summary: Summary,
    pub directory: DirectoryData,
    pub records: Vec<EphemerisRecord>,
}

impl Segment {
    fn state(&self, et_seconds: f64) -> (Vector3<f64>, Vector3<f64>) {
        self.records[self.directory.record_index(et_seconds)].interpolate(et_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct NaifData {
    pub(crate) daf_header: DAFHeader,
    comment: Option<KernelComment>,
    segments: HashMap<i32, Vec<Segment>>,
}

impl NaifData {
    /// Read and decode an SPK kernel from disk.
    pub fn read_naif_file(path: &Utf8Path) -> Result<Self, AlmanacError> {
        if !path.exists() {
            return Err(AlmanacError::DataFileNotFound(path.to_string()));
        }
        let kernel = std::fs::read(path)?;
        let data = Self::from_bytes(&kernel)?;
        info!(
            path = %path,
            segments = data.segments.values().map(Vec::len).sum::<usize>(),
            ephemeris = %data.comment.clone().unwrap_or_default(),
            "loaded SPK kernel {}",
            data.daf_header.internal_filename
        );
        Ok(data)
    }

    /// Decode an SPK kernel already held in memory.
    ///
    /// Fails on big-endian kernels and on any segment whose data type is not 2.
    pub fn from_bytes(kernel: &[u8]) -> Result<Self, AlmanacError> {
        let (_, daf_header) = DAFHeader::parse(kernel)?;
        daf_header.validate()?;
        debug!("{daf_header}");

        let summary_words = daf_header.summary_words();
        let mut segments: HashMap<i32, Vec<Segment>> = HashMap::new();
        let mut next_record = daf_header.fward as usize;
        let mut visited = 0usize;

        while next_record != 0 {
            visited += 1;
            if visited > kernel.len() / super::daf_header::DAF_RECORD_BYTES {
                return Err(AlmanacError::UnsupportedBinaryFormat(
                    "cyclic summary record chain".to_string(),
                ));
            }

            let record = SummaryRecord::read(kernel, next_record, summary_words)?;
            for summary in record.summaries {
                if summary.data_type != SPK_CHEBYSHEV_POSITION {
                    return Err(AlmanacError::InvalidSpkDataType(summary.data_type));
                }
                let directory = DirectoryData::read(kernel, summary.final_addr as usize)?;
                let records = EphemerisRecord::read_segment(
                    kernel,
                    summary.initial_addr as usize,
                    directory.rsize,
                    directory.n_records,
                )?;
                debug!("segment {summary}: {directory}");

                segments.entry(summary.target).or_default().push(Segment {
                    summary,
                    directory,
                    records,
                });
            }
            next_record = record.next;
        }

        Ok(NaifData {
            comment: KernelComment::read(kernel, &daf_header),
            daf_header,
            segments,
        })
    }

    /// Self-description found in the comment area, if any.
    pub fn comment(&self) -> Option<&KernelComment> {
        self.comment.as_ref()
    }

    /// `true` when the kernel holds a segment for `target`.
    pub fn contains(&self, target: i32) -> bool {
        target == 0 || self.segments.contains_key(&target)
    }

    /// State of `target` relative to its segment centre.
    ///
    /// Return
    /// ----------
    /// * `(center, position km, velocity km/s)`.
    pub fn state(
        &self,
        target: i32,
        et_seconds: f64,
    ) -> Result<(i32, Vector3<f64>, Vector3<f64>), AlmanacError> {
        let candidates = self
            .segments
            .get(&target)
            .ok_or(AlmanacError::EphemerisBodyNotFound(target))?;

        // later segments take precedence, as in SPICE
        let segment = candidates
            .iter()
            .rev()
            .find(|segment| segment.summary.covers(et_seconds))
            .ok_or(AlmanacError::EpochOutOfRange {
                body: target,
                et: et_seconds,
            })?;

        let (position, velocity) = segment.state(et_seconds);
        Ok((segment.summary.center, position, velocity))
    }

    /// State of `target` relative to the solar system barycenter (km, km/s).
    pub fn barycentric_state(
        &self,
        target: i32,
        et_seconds: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), AlmanacError> {
        let mut position = Vector3::zeros();
        let mut velocity = Vector3::zeros();
        let mut body = target;

        for _ in 0..MAX_CENTER_CHAIN {
            if body == 0 {
                return Ok((position, velocity));
            }
            let (center, p, v) = self.state(body, et_seconds)?;
            position += p;
            velocity += v;
            body = center;
        }

        Err(AlmanacError::UnsupportedBinaryFormat(format!(
            "no path from body {target} to the solar system barycenter"
        )))
    }
}
