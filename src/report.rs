//! # Almanac report
//!
//! One text block per target, built from the answers of a [`SkyEngine`]:
//!
//! ```text
//! Moon (above horizon)
//! Azimuth: 131deg 02' 44.5" (SE)
//! Altitude: 27deg 50' 04.9"
//! Elongation: 151deg 21' 39.2"
//! Phase: 151.8 (Waxing Gibbous)
//! Fri 18 09:12 CDT - set at 290deg 52' 10.3" (WNW)
//! Fri 18 18:27 CDT - rise at 73deg 32' 51.0" (ENE)
//!
//! ```
//!
//! Stars add a `Max altitude tonight` line right after the name and sample their
//! future elongation monthly; planets sample it weekly. The Sun has no elongation
//! lines, the Moon no future elongation but a phase line.
//!
//! A block is assembled completely before it is written, so a target that fails
//! halfway never leaves a partial block on the output.
use std::io::Write;

use hifitime::Epoch;
use tracing::{info, warn};

use crate::{
    almanac::AlmanacContext,
    almanac_errors::AlmanacError,
    astrometry::{EventKind, RiseSetEvent, SkyEngine},
    constants::ELONGATION_SAMPLES,
    labels::{compass_label, format_dms, phase_label},
    targets::CelestialTarget,
    time::{format_local, TimeWindow},
};

/// Solar elongation of a target at a future instant, truncated toward zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElongationSample {
    pub instant: Epoch,
    pub degrees: i64,
}

/// The twelve elongation samples following the start of the window.
pub fn future_elongations<E: SkyEngine>(
    engine: &E,
    target: &CelestialTarget,
    window: &TimeWindow,
    step_days: f64,
) -> Result<Vec<ElongationSample>, AlmanacError> {
    (1..=ELONGATION_SAMPLES)
        .map(|n| {
            let instant = window.sample_after_start(n, step_days);
            let elongation = engine.elongation(target, &instant)?;
            Ok(ElongationSample {
                instant,
                degrees: elongation.trunc() as i64,
            })
        })
        .collect()
}

fn event_line<E: SkyEngine>(
    engine: &E,
    context: &AlmanacContext,
    target: &CelestialTarget,
    event: &RiseSetEvent,
) -> Result<String, AlmanacError> {
    let azimuth = engine.position(target, &event.instant)?.azimuth;
    let direction = match event.kind {
        EventKind::Rise => "rise at",
        EventKind::Set => "set at",
    };
    Ok(format!(
        "{} - {direction} {} ({})",
        format_local(&event.instant, &context.timezone)?,
        format_dms(azimuth),
        compass_label(azimuth)
    ))
}

/// Text block of one target, blank separator line included.
pub fn target_block<E: SkyEngine>(
    engine: &E,
    context: &AlmanacContext,
    target: &CelestialTarget,
) -> Result<String, AlmanacError> {
    let now = context.window.start;
    let position = engine.position(target, &now)?;
    let horizon = if position.above_horizon() {
        "above horizon"
    } else {
        "below horizon"
    };

    let mut lines = vec![format!("{} ({horizon})", target.name)];

    if target.is_star() {
        let peak = engine.altitude_peak(target, &context.window)?;
        lines.push(format!(
            "Max altitude tonight: {} degrees at {}",
            peak.altitude.trunc() as i64,
            format_local(&peak.instant, &context.timezone)?
        ));
    }

    if position.above_horizon() {
        lines.push(format!(
            "Azimuth: {} ({})",
            format_dms(position.azimuth),
            compass_label(position.azimuth)
        ));
        lines.push(format!("Altitude: {}", format_dms(position.altitude)));
    }

    if !target.is_sun() {
        let elongation = engine.elongation(target, &now)?;
        lines.push(format!("Elongation: {}", format_dms(elongation)));
    }

    if !target.is_sun() && !target.is_moon() {
        let (period, step_days) = if target.is_star() {
            ("Month", context.report.star_elongation_step_days)
        } else {
            ("Week", context.report.planet_elongation_step_days)
        };
        let degrees: Vec<i64> = future_elongations(engine, target, &context.window, step_days)?
            .iter()
            .map(|sample| sample.degrees)
            .collect();
        lines.push(format!("Future Elongation by {period}: {degrees:?}"));
    }

    if target.is_moon() {
        let phase = engine.moon_phase(&now)?;
        lines.push(format!("Phase: {phase:.1} ({})", phase_label(phase)));
    }

    for event in engine
        .rise_set_events(target, &context.window)?
        .iter()
        .filter(|event| context.window.contains(&event.instant))
    {
        lines.push(event_line(engine, context, target, event)?);
    }

    lines.push(String::new());
    Ok(lines.join("\n") + "\n")
}

/// Write the blocks of every target to `out`.
///
/// Return
/// ----------
/// * The number of blocks written. With `skip_failed_targets`, a failing target
///   is logged and left out; otherwise the first failure aborts the report.
pub fn write_report<E: SkyEngine, W: Write>(
    engine: &E,
    context: &AlmanacContext,
    targets: &[CelestialTarget],
    out: &mut W,
) -> Result<usize, AlmanacError> {
    let mut written = 0;
    for target in targets {
        match target_block(engine, context, target) {
            Ok(block) => {
                out.write_all(block.as_bytes())?;
                written += 1;
            }
            Err(err) if context.report.skip_failed_targets => {
                warn!(target_name = %target.name, error = %err, "skipping target");
            }
            Err(err) => return Err(err),
        }
    }
    out.flush()?;
    info!(written, total = targets.len(), "almanac report done");
    Ok(written)
}
