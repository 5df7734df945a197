//! Tolerance window arithmetic.
//!
//! An instant `A` is inside the window around a reference `R` with tolerance
//! `T` iff `R - T <= A <= R + T`. Both bounds are inclusive. A tolerance too
//! large to represent leaves the corresponding side unbounded.

use chrono::{DateTime, TimeDelta, Utc};

/// Side of the window an instant fell out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowViolation {
    /// The instant is before `reference - tolerance`.
    TooEarly,
    /// The instant is after `reference + tolerance`.
    TooLate,
}

fn tolerance(tolerance_ms: u64) -> Option<TimeDelta> {
    i64::try_from(tolerance_ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
}

/// Checks that `instant` lies within `reference ± tolerance_ms`.
pub fn check_window(
    instant: DateTime<Utc>,
    reference: DateTime<Utc>,
    tolerance_ms: u64,
) -> Result<(), WindowViolation> {
    if !is_not_before(instant, reference, tolerance_ms) {
        return Err(WindowViolation::TooEarly);
    }
    if !is_not_after(instant, reference, tolerance_ms) {
        return Err(WindowViolation::TooLate);
    }
    Ok(())
}

/// Returns true if `instant` lies within `reference ± tolerance_ms`.
#[must_use]
pub fn is_within_window(instant: DateTime<Utc>, reference: DateTime<Utc>, tolerance_ms: u64) -> bool {
    check_window(instant, reference, tolerance_ms).is_ok()
}

/// Returns true if `instant >= reference - tolerance_ms`.
#[must_use]
pub fn is_not_before(instant: DateTime<Utc>, reference: DateTime<Utc>, tolerance_ms: u64) -> bool {
    match tolerance(tolerance_ms).and_then(|t| reference.checked_sub_signed(t)) {
        Some(lower) => instant >= lower,
        None => true,
    }
}

/// Returns true if `instant <= reference + tolerance_ms`.
#[must_use]
pub fn is_not_after(instant: DateTime<Utc>, reference: DateTime<Utc>, tolerance_ms: u64) -> bool {
    match tolerance(tolerance_ms).and_then(|t| reference.checked_add_signed(t)) {
        Some(upper) => instant <= upper,
        None => true,
    }
}
