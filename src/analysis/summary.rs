//! Aggregate figures derived from the hourly stats and disconnections.

use super::models::{Disconnection, DurationStats, HourlyStat, ProbeEvent, SummaryStats, TimeRange};

/// Compute the summary for one analysis run.
pub fn summarize(
    events: &[ProbeEvent],
    hourly: &[HourlyStat],
    disconnections: &[Disconnection],
) -> SummaryStats {
    let total_probes = events.len();
    let failed_probes = events.iter().filter(|e| e.is_failure()).count();
    let overall_loss_rate = if total_probes > 0 {
        failed_probes as f64 / total_probes as f64 * 100.0
    } else {
        0.0
    };

    let avg_failures_per_disconnection = if disconnections.is_empty() {
        None
    } else {
        let failures: usize = disconnections.iter().map(|d| d.failure_count).sum();
        Some(failures as f64 / disconnections.len() as f64)
    };

    let avg_disconnections_per_hour = if hourly.is_empty() {
        0.0
    } else {
        disconnections.len() as f64 / hourly.len() as f64
    };

    SummaryStats {
        time_range: time_range(events),
        total_probes,
        successful_probes: total_probes - failed_probes,
        failed_probes,
        overall_loss_rate,
        disconnection_count: disconnections.len(),
        durations: duration_stats(disconnections),
        avg_failures_per_disconnection,
        avg_disconnections_per_hour,
    }
}

fn time_range(events: &[ProbeEvent]) -> Option<TimeRange> {
    let start = events.iter().map(|e| e.timestamp).min()?;
    let end = events.iter().map(|e| e.timestamp).max()?;
    Some(TimeRange { start, end })
}

fn duration_stats(disconnections: &[Disconnection]) -> Option<DurationStats> {
    let durations: Vec<i64> = disconnections.iter().map(|d| d.duration_seconds).collect();
    let min_seconds = *durations.iter().min()?;
    let max_seconds = *durations.iter().max()?;
    let avg_seconds = durations.iter().sum::<i64>() as f64 / durations.len() as f64;

    // 1-based, first occurrence wins
    let position = |target: i64| {
        durations
            .iter()
            .position(|&d| d == target)
            .map(|i| i + 1)
            .unwrap_or(0)
    };

    Some(DurationStats {
        avg_seconds,
        min_seconds,
        min_index: position(min_seconds),
        max_seconds,
        max_index: position(max_seconds),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::hourly::aggregate_hourly;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn run(start: NaiveDateTime, secs: i64, failures: usize) -> Disconnection {
        Disconnection::new(start, start + chrono::Duration::seconds(secs), failures)
    }

    #[test]
    fn test_summary_without_events() {
        let summary = summarize(&[], &[], &[]);
        assert_eq!(summary.total_probes, 0);
        assert_eq!(summary.overall_loss_rate, 0.0);
        assert_eq!(summary.avg_disconnections_per_hour, 0.0);
        assert!(summary.durations.is_none());
        assert!(summary.avg_failures_per_disconnection.is_none());
        assert!(summary.time_range.is_none());
    }

    #[test]
    fn test_duration_stats_first_occurrence_wins() {
        let disconnections = vec![
            run(at(10, 0, 0), 5, 3),
            run(at(10, 10, 0), 20, 6),
            run(at(10, 20, 0), 5, 3),
            run(at(10, 30, 0), 20, 9),
        ];

        let stats = duration_stats(&disconnections).unwrap();
        assert_eq!(stats.min_seconds, 5);
        assert_eq!(stats.min_index, 1);
        assert_eq!(stats.max_seconds, 20);
        assert_eq!(stats.max_index, 2);
        assert!((stats.avg_seconds - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_rates() {
        let events = vec![
            ProbeEvent::failure(at(10, 0, 0)),
            ProbeEvent::failure(at(10, 0, 1)),
            ProbeEvent::failure(at(10, 0, 2)),
            ProbeEvent::success(at(10, 0, 3), Some(4)),
            ProbeEvent::success(at(11, 0, 0), Some(4)),
        ];
        let hourly = aggregate_hourly(&events);
        let disconnections = vec![run(at(10, 0, 0), 3, 3)];

        let summary = summarize(&events, &hourly, &disconnections);
        assert_eq!(summary.total_probes, 5);
        assert_eq!(summary.failed_probes, 3);
        assert_eq!(summary.successful_probes, 2);
        assert!((summary.overall_loss_rate - 60.0).abs() < 1e-9);
        assert_eq!(summary.disconnection_count, 1);
        assert_eq!(summary.avg_failures_per_disconnection, Some(3.0));
        assert!((summary.avg_disconnections_per_hour - 0.5).abs() < f64::EPSILON);

        let range = summary.time_range.unwrap();
        assert_eq!(range.start, at(10, 0, 0));
        assert_eq!(range.end, at(11, 0, 0));
        assert_eq!(range.duration().num_seconds(), 3600);
    }
}
