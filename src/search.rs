//! # Searches over time
//!
//! Two searches drive the almanac:
//!
//! - [`find_discrete`] locates the instants where a boolean function of time
//!   changes value (a body crossing the horizon);
//! - [`find_maxima`] locates the local maxima of a scalar function of time (the
//!   culmination of a star).
//!
//! Both sample the window at a fixed step, keep the intervals that bracket an
//! event and then refine those brackets. Sampling steps must be shorter than the
//! time between two events, otherwise the pair is missed.
use hifitime::{Epoch, Unit};
use itertools::Itertools;

use crate::{almanac_errors::AlmanacError, constants::SECONDS_PER_DAY};

/// Width under which a discrete bracket is considered solved (1 ms, in days).
pub const DISCRETE_EPSILON_DAYS: f64 = 0.001 / SECONDS_PER_DAY;

/// Width under which a maximum bracket is considered solved (1 s, in days).
pub const MAXIMA_EPSILON_DAYS: f64 = 1.0 / SECONDS_PER_DAY;

/// Points sampled inside a bracket at each refinement pass.
const SUBDIVISIONS: usize = 12;

const INV_GOLDEN_RATIO: f64 = 0.618_033_988_749_894_8;

fn offset(start: &Epoch, days: f64) -> Epoch {
    *start + Unit::Day * days
}

/// Instants in `(start, end]` where `f` changes value.
///
/// Arguments
/// -----------------
/// * `start`, `end`: bounds of the search.
/// * `step_days`: coarse sampling step.
/// * `f`: the function searched, evaluated at arbitrary instants of the window.
///
/// Return
/// ----------
/// * The events in increasing order, each given as the first instant (to within
///   1 ms) where `f` holds its new value, together with that value.
pub fn find_discrete<F>(
    start: &Epoch,
    end: &Epoch,
    step_days: f64,
    mut f: F,
) -> Result<Vec<(Epoch, bool)>, AlmanacError>
where
    F: FnMut(&Epoch) -> Result<bool, AlmanacError>,
{
    let span = (*end - *start).to_unit(Unit::Day);
    if span <= 0.0 {
        return Ok(Vec::new());
    }
    let intervals = (span / step_days).ceil().max(1.0) as usize;
    let mut days: Vec<f64> = (0..=intervals)
        .map(|i| span * i as f64 / intervals as f64)
        .collect();

    loop {
        let values = days
            .iter()
            .map(|d| f(&offset(start, *d)))
            .collect::<Result<Vec<bool>, _>>()?;

        let brackets: Vec<(f64, f64, bool)> = days
            .iter()
            .zip(values)
            .tuple_windows()
            .filter(|((_, before), (_, after))| before != after)
            .map(|((&a, _), (&b, after))| (a, b, after))
            .collect();

        let Some(&(a, b, _)) = brackets.first() else {
            return Ok(Vec::new());
        };

        // all brackets shrink at the same rate
        if b - a <= DISCRETE_EPSILON_DAYS {
            return Ok(brackets
                .into_iter()
                .map(|(_, b, value)| (offset(start, b), value))
                .collect());
        }

        days = brackets
            .iter()
            .flat_map(|&(a, b, _)| {
                (0..SUBDIVISIONS).map(move |k| a + (b - a) * k as f64 / (SUBDIVISIONS - 1) as f64)
            })
            .collect();
    }
}

/// Golden-section search of a maximum of `f` inside `[a, b]` (days from `start`).
fn golden_section<F>(
    start: &Epoch,
    mut a: f64,
    mut b: f64,
    f: &mut F,
) -> Result<(f64, f64), AlmanacError>
where
    F: FnMut(&Epoch) -> Result<f64, AlmanacError>,
{
    let mut c = b - INV_GOLDEN_RATIO * (b - a);
    let mut d = a + INV_GOLDEN_RATIO * (b - a);
    let mut fc = f(&offset(start, c))?;
    let mut fd = f(&offset(start, d))?;

    while b - a > MAXIMA_EPSILON_DAYS {
        if fc > fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_GOLDEN_RATIO * (b - a);
            fc = f(&offset(start, c))?;
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_GOLDEN_RATIO * (b - a);
            fd = f(&offset(start, d))?;
        }
    }

    let x = 0.5 * (a + b);
    Ok((x, f(&offset(start, x))?))
}

/// Local maxima of `f` inside `[start, end]`.
///
/// The function is sampled every `step_days`, starting one step before `start`
/// and ending one step after `end` so that a maximum close to a bound is still
/// bracketed. Each sample greater than its left neighbour and not smaller than
/// its right one is refined by golden-section search.
///
/// Return
/// ----------
/// * `(instant, value)` pairs in increasing time order.
pub fn find_maxima<F>(
    start: &Epoch,
    end: &Epoch,
    step_days: f64,
    mut f: F,
) -> Result<Vec<(Epoch, f64)>, AlmanacError>
where
    F: FnMut(&Epoch) -> Result<f64, AlmanacError>,
{
    let span = (*end - *start).to_unit(Unit::Day);
    if span <= 0.0 {
        return Ok(Vec::new());
    }
    let intervals = (span / step_days).ceil().max(1.0) as usize;
    let step = span / intervals as f64;

    let samples = (0..=intervals + 2)
        .map(|i| {
            let day = (i as f64 - 1.0) * step;
            f(&offset(start, day)).map(|value| (day, value))
        })
        .collect::<Result<Vec<(f64, f64)>, _>>()?;

    let mut maxima = Vec::new();
    for (left, mid, right) in samples.iter().tuple_windows() {
        if left.1 < mid.1 && mid.1 >= right.1 {
            let (day, value) = golden_section(start, left.0, right.0, &mut f)?;
            if (0.0..=span).contains(&day) {
                maxima.push((offset(start, day), value));
            }
        }
    }
    Ok(maxima)
}
