//! Cycle arithmetic: maps a raw tap count onto completed maalas.
//!
//! Every function here is total. A cycle length of zero or below is a
//! caller configuration error; it never panics. Division falls back to a
//! cycle of 1 and boundary checks report no crossing.

use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_MAX;

/// Cycle length used for division. Non-positive lengths become 1.
fn effective_cycle(cycle_length: i64) -> u64 {
    if cycle_length <= 0 {
        1
    } else {
        cycle_length as u64
    }
}

/// Completed cycles for `raw` taps, shifted by `manual_delta` and clamped at 0.
///
/// `max(0, floor(raw / max(1, cycle_length)) + manual_delta)`. There is no
/// upper clamp; the sum saturates at `u64::MAX`.
pub fn derive_cycles(raw: u64, manual_delta: i64, cycle_length: i64) -> u64 {
    let completed = raw / effective_cycle(cycle_length);
    if manual_delta >= 0 {
        completed.saturating_add(manual_delta as u64)
    } else {
        completed.saturating_sub(manual_delta.unsigned_abs())
    }
}

/// True when moving from `previous` to `next` entered a new completed cycle.
pub fn crossed_upper_boundary(previous: u64, next: u64, cycle_length: i64) -> bool {
    if cycle_length <= 0 {
        return false;
    }
    let c = cycle_length as u64;
    previous / c < next / c
}

/// True when moving from `previous` to `next` dropped out of a completed cycle.
pub fn crossed_lower_boundary(previous: u64, next: u64, cycle_length: i64) -> bool {
    if cycle_length <= 0 {
        return false;
    }
    let c = cycle_length as u64;
    previous / c > next / c
}

/// Percent of the current cycle completed, rounded half up, in `[0, 100]`.
///
/// Exact multiples of the cycle (including 0) read 0: the ring has rolled
/// over into a fresh cycle.
pub fn progress_percent(current: u64, cycle_length: i64) -> u8 {
    let c = u128::from(effective_cycle(cycle_length));
    let rem = u128::from(current) % c;
    // floor(rem / c * 100 + 0.5) in integers
    let percent = (rem * 200 + c) / (2 * c);
    percent.min(u128::from(PERCENT_MAX)) as u8
}

/// Taps left before the ring completes, in `[1, cycle_length]`.
///
/// On a boundary the whole cycle remains, never 0.
pub fn taps_until_next_boundary(current: u64, cycle_length: i64) -> u64 {
    let c = effective_cycle(cycle_length);
    c - current % c
}

/// Direction of a boundary crossing between two raw counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crossing {
    None,
    /// A new cycle was completed.
    Upper,
    /// A previously completed cycle was undone.
    Lower,
}

/// Classify the move from `previous` to `next`.
pub fn boundary_crossing(previous: u64, next: u64, cycle_length: i64) -> Crossing {
    if crossed_upper_boundary(previous, next, cycle_length) {
        Crossing::Upper
    } else if crossed_lower_boundary(previous, next, cycle_length) {
        Crossing::Lower
    } else {
        Crossing::None
    }
}

/// Display figures for one raw count, as a progress ring would show them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProgress {
    pub raw: u64,
    pub cycle_length: i64,
    /// Completed cycles including the manual adjustment.
    pub cycles: u64,
    /// Taps into the current cycle.
    pub position: u64,
    pub percent: u8,
    pub remaining: u64,
}

impl CycleProgress {
    pub fn compute(raw: u64, manual_delta: i64, cycle_length: i64) -> Self {
        Self {
            raw,
            cycle_length,
            cycles: derive_cycles(raw, manual_delta, cycle_length),
            position: raw % effective_cycle(cycle_length),
            percent: progress_percent(raw, cycle_length),
            remaining: taps_until_next_boundary(raw, cycle_length),
        }
    }
}
