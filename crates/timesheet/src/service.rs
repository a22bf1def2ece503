//! Query shaping for the JSON API.
//!
//! Bridges the cached dataset to the row arrays the chart pages
//! consume. An unknown user resolves to an empty row list, never an
//! error.

use std::sync::Arc;

use common::{Dataset, Result, UserId, UserPresenceMap};
use serde_json::{json, Value};
use tracing::debug;

use crate::cache::PresenceCache;
use crate::clock::mean;
use crate::weekday::{group_by_start_end, group_by_weekday, WEEKDAY_ABBR};

/// Read-side query layer over the presence cache.
pub struct QueryService {
    cache: Arc<PresenceCache>,
}

impl QueryService {
    pub fn new(cache: Arc<PresenceCache>) -> Self {
        Self { cache }
    }

    /// Users present in the log, with synthesized display names.
    pub async fn users(&self) -> Result<Vec<Value>> {
        let dataset = self.cache.get().await?;
        Ok(dataset
            .keys()
            .map(|id| json!({ "user_id": id, "name": format!("User {}", id) }))
            .collect())
    }

    /// Mean presence interval per weekday: 7 `[label, seconds]` rows.
    pub async fn mean_time_weekday(&self, user_id: UserId) -> Result<Vec<Value>> {
        let dataset = self.cache.get().await?;
        let Some(days) = lookup(&dataset, user_id) else {
            return Ok(Vec::new());
        };
        let buckets = group_by_weekday(days);
        Ok(WEEKDAY_ABBR
            .iter()
            .zip(buckets.iter())
            .map(|(label, intervals)| {
                json!([label, mean(intervals.iter().map(|&v| v as f64))])
            })
            .collect())
    }

    /// Total presence per weekday: a header row plus 7 `[label, total]`
    /// rows.
    pub async fn presence_weekday(&self, user_id: UserId) -> Result<Vec<Value>> {
        let dataset = self.cache.get().await?;
        let Some(days) = lookup(&dataset, user_id) else {
            return Ok(Vec::new());
        };
        let buckets = group_by_weekday(days);
        let mut rows = vec![json!(["Weekday", "Presence (s)"])];
        rows.extend(
            WEEKDAY_ABBR
                .iter()
                .zip(buckets.iter())
                .map(|(label, intervals)| json!([label, intervals.iter().sum::<i64>()])),
        );
        Ok(rows)
    }

    /// Mean clock-in and clock-out per weekday: 7 `[label, start, end]`
    /// rows.
    pub async fn presence_start_end(&self, user_id: UserId) -> Result<Vec<Value>> {
        let dataset = self.cache.get().await?;
        let Some(days) = lookup(&dataset, user_id) else {
            return Ok(Vec::new());
        };
        let buckets = group_by_start_end(days);
        Ok(WEEKDAY_ABBR
            .iter()
            .zip(buckets.iter())
            .map(|(label, lists)| {
                json!([
                    label,
                    mean(lists.start_list.iter().map(|&v| v as f64)),
                    mean(lists.end_list.iter().map(|&v| v as f64)),
                ])
            })
            .collect())
    }
}

fn lookup(dataset: &Dataset, user_id: UserId) -> Option<&UserPresenceMap> {
    let days = dataset.get(&user_id);
    if days.is_none() {
        debug!("user {} not found", user_id);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use common::PresenceRecord;
    use std::time::Duration;

    fn record(start: (u32, u32, u32), end: (u32, u32, u32)) -> PresenceRecord {
        PresenceRecord {
            start: NaiveTime::from_hms_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    fn fixture_dataset() -> Dataset {
        let mut ten = UserPresenceMap::new();
        // Tuesday and Thursday.
        ten.insert(
            NaiveDate::from_ymd_opt(2013, 9, 10).unwrap(),
            record((9, 39, 5), (17, 59, 52)),
        );
        ten.insert(
            NaiveDate::from_ymd_opt(2013, 9, 12).unwrap(),
            record((10, 48, 46), (17, 23, 51)),
        );

        let mut eleven = UserPresenceMap::new();
        eleven.insert(
            NaiveDate::from_ymd_opt(2013, 9, 10).unwrap(),
            record((9, 19, 50), (13, 55, 12)),
        );

        let mut dataset = Dataset::new();
        dataset.insert(10, ten);
        dataset.insert(11, eleven);
        dataset
    }

    fn service() -> QueryService {
        let cache = PresenceCache::new(Duration::from_secs(600), || Ok(fixture_dataset()));
        QueryService::new(Arc::new(cache))
    }

    #[tokio::test]
    async fn test_users_synthesizes_names_in_id_order() {
        let rows = service().users().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], json!({ "user_id": 10, "name": "User 10" }));
        assert_eq!(rows[1], json!({ "user_id": 11, "name": "User 11" }));
    }

    #[tokio::test]
    async fn test_mean_time_rows_cover_the_whole_week() {
        let rows = service().mean_time_weekday(10).await.unwrap();
        assert_eq!(rows.len(), 7, "one row per weekday, always");
        assert_eq!(rows[0], json!(["Mon", 0.0]));
        assert_eq!(rows[1], json!(["Tue", 30047.0]));
        assert_eq!(rows[3], json!(["Thu", 23705.0]));
        assert_eq!(rows[6], json!(["Sun", 0.0]));
    }

    #[tokio::test]
    async fn test_presence_weekday_has_header_then_totals() {
        let rows = service().presence_weekday(10).await.unwrap();
        assert_eq!(rows.len(), 8, "header plus seven weekday rows");
        assert_eq!(rows[0], json!(["Weekday", "Presence (s)"]));
        assert_eq!(rows[2], json!(["Tue", 30047]));
        assert_eq!(rows[4], json!(["Thu", 23705]));
        assert_eq!(rows[1], json!(["Mon", 0]));
    }

    #[tokio::test]
    async fn test_start_end_rows_carry_both_means() {
        let rows = service().presence_start_end(10).await.unwrap();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[1], json!(["Tue", 34745.0, 64792.0]));
        assert_eq!(rows[0], json!(["Mon", 0.0, 0.0]));
    }

    #[tokio::test]
    async fn test_unknown_user_yields_empty_rows_everywhere() {
        let svc = service();
        assert!(svc.mean_time_weekday(101).await.unwrap().is_empty());
        assert!(svc.presence_weekday(101).await.unwrap().is_empty());
        assert!(svc.presence_start_end(101).await.unwrap().is_empty());
    }
}
