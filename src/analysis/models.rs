//! Analysis model types.

use chrono::{Duration as ChronoDuration, NaiveDateTime};
use serde::Serialize;

use super::hourly::truncate_to_hour;

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// A single parsed probe line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeEvent {
    pub timestamp: NaiveDateTime,
    pub outcome: Outcome,
    /// Round-trip time in milliseconds; only set for successes that reported one.
    pub latency_ms: Option<u32>,
}

impl ProbeEvent {
    pub fn success(timestamp: NaiveDateTime, latency_ms: Option<u32>) -> Self {
        Self {
            timestamp,
            outcome: Outcome::Success,
            latency_ms,
        }
    }

    pub fn failure(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            outcome: Outcome::Failure,
            latency_ms: None,
        }
    }

    /// The timestamp truncated to the start of its hour.
    pub fn hour_bucket(&self) -> NaiveDateTime {
        truncate_to_hour(self.timestamp)
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failure
    }
}

/// Probe counts for one observed hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyStat {
    pub hour: NaiveDateTime,
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Failure percentage for this hour.
    pub loss_rate: f64,
}

impl HourlyStat {
    pub fn new(hour: NaiveDateTime, successes: usize, failures: usize) -> Self {
        let total = successes + failures;
        let loss_rate = if total == 0 {
            0.0
        } else {
            failures as f64 / total as f64 * 100.0
        };

        Self {
            hour,
            total,
            successes,
            failures,
            loss_rate,
        }
    }
}

/// A maximal run of consecutive failures that reached the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disconnection {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: i64,
    pub failure_count: usize,
}

impl Disconnection {
    /// Build a disconnection record.
    ///
    /// The input is assumed to be chronological. If `end_time` is earlier
    /// than `start_time` (out-of-order log lines), the duration is reported
    /// as 0 rather than negative; both timestamps are kept as given.
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime, failure_count: usize) -> Self {
        Self {
            start_time,
            end_time,
            duration_seconds: (end_time - start_time).num_seconds().max(0),
            failure_count,
        }
    }
}

/// Number of disconnections that started in a given hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisconnectionHourly {
    pub hour: NaiveDateTime,
    pub count: usize,
}

/// First and last observed timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    pub fn duration(&self) -> ChronoDuration {
        self.end - self.start
    }
}

/// Average, minimum and maximum disconnection duration.
///
/// The indexes are 1-based positions of the first disconnection (in start
/// order) with exactly that duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub avg_seconds: f64,
    pub min_seconds: i64,
    pub min_index: usize,
    pub max_seconds: i64,
    pub max_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub time_range: Option<TimeRange>,
    pub total_probes: usize,
    pub successful_probes: usize,
    pub failed_probes: usize,
    pub overall_loss_rate: f64,
    pub disconnection_count: usize,
    /// `None` when no disconnections were detected.
    pub durations: Option<DurationStats>,
    pub avg_failures_per_disconnection: Option<f64>,
    pub avg_disconnections_per_hour: f64,
}

/// Everything computed for one probe log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub host: String,
    pub threshold: usize,
    pub hourly: Vec<HourlyStat>,
    pub disconnections: Vec<Disconnection>,
    pub disconnection_hourly: Vec<DisconnectionHourly>,
    pub summary: SummaryStats,
}
