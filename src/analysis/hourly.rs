//! Hour bucketing: per-hour loss statistics and gap-filled hour ranges.

use chrono::{DateTime, NaiveDateTime};
use std::collections::BTreeMap;

use super::models::{HourlyStat, ProbeEvent};

const HOUR_SECONDS: i64 = 3600;

/// Truncate a timestamp to the start of its containing hour.
pub fn truncate_to_hour(dt: NaiveDateTime) -> NaiveDateTime {
    let ts = dt.and_utc().timestamp();
    let truncated = ts - ts.rem_euclid(HOUR_SECONDS);
    DateTime::from_timestamp(truncated, 0)
        .map(|t| t.naive_utc())
        .unwrap_or(dt)
}

/// Group events by hour bucket. Only hours with at least one event appear.
pub fn aggregate_hourly(events: &[ProbeEvent]) -> Vec<HourlyStat> {
    // hour -> (successes, failures)
    let mut buckets: BTreeMap<NaiveDateTime, (usize, usize)> = BTreeMap::new();

    for event in events {
        let counts = buckets.entry(event.hour_bucket()).or_default();
        if event.is_failure() {
            counts.1 += 1;
        } else {
            counts.0 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(hour, (successes, failures))| HourlyStat::new(hour, successes, failures))
        .collect()
}

/// Every hour from the earliest to the latest event's bucket, inclusive.
pub fn hour_range(events: &[ProbeEvent]) -> Vec<NaiveDateTime> {
    let first = events.iter().map(ProbeEvent::hour_bucket).min();
    let last = events.iter().map(ProbeEvent::hour_bucket).max();

    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let start = first.and_utc().timestamp();
    let end = last.and_utc().timestamp();

    (start..=end)
        .step_by(HOUR_SECONDS as usize)
        .filter_map(|ts| DateTime::from_timestamp(ts, 0).map(|t| t.naive_utc()))
        .collect()
}
