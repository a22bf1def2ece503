//! Per-weekday grouping of one user's presence data.

use chrono::Datelike;
use common::UserPresenceMap;

use crate::clock::{interval, seconds_since_midnight};

/// Weekday labels in bucket order (Monday first).
pub const WEEKDAY_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Clock-in and clock-out seconds for one weekday, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartEndLists {
    pub start_list: Vec<i64>,
    pub end_list: Vec<i64>,
}

/// Group presence intervals by weekday, bucket 0 = Monday.
///
/// All seven buckets are always present, empty input included. Negative
/// intervals pass through untouched.
pub fn group_by_weekday(days: &UserPresenceMap) -> [Vec<i64>; 7] {
    let mut buckets: [Vec<i64>; 7] = Default::default();
    for (date, record) in days {
        let idx = date.weekday().num_days_from_monday() as usize;
        buckets[idx].push(interval(record.start, record.end));
    }
    buckets
}

/// Group clock-in and clock-out times by weekday, bucket 0 = Monday.
pub fn group_by_start_end(days: &UserPresenceMap) -> [StartEndLists; 7] {
    let mut buckets: [StartEndLists; 7] = Default::default();
    for (date, record) in days {
        let bucket = &mut buckets[date.weekday().num_days_from_monday() as usize];
        bucket.start_list.push(seconds_since_midnight(record.start));
        bucket.end_list.push(seconds_since_midnight(record.end));
    }
    buckets
}
