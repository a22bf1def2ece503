//! Clock arithmetic over workday timestamps.
//!
//! Everything works in whole seconds since midnight. Intervals are the
//! signed end-minus-start difference: a row whose `end` precedes its
//! `start` yields a negative interval, and nothing wraps across
//! midnight.

use chrono::{NaiveTime, Timelike};

/// Seconds elapsed since midnight for a clock time (0..=86399).
pub fn seconds_since_midnight(t: NaiveTime) -> i64 {
    i64::from(t.hour()) * 3600 + i64::from(t.minute()) * 60 + i64::from(t.second())
}

/// Signed presence interval in seconds between two clock times.
pub fn interval(start: NaiveTime, end: NaiveTime) -> i64 {
    seconds_since_midnight(end) - seconds_since_midnight(start)
}

/// Arithmetic mean of a sequence. Empty input yields 0.0, never NaN.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}
