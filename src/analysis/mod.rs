//! Analysis module for probe logs.
//!
//! Turns a parsed probe sequence into hourly loss statistics, disconnection
//! events and summary figures. Nothing here does I/O.

mod detector;
mod hourly;
mod models;
mod summary;

pub use detector::*;
pub use hourly::*;
pub use models::*;
pub use summary::*;

use crate::parse::ProbeLog;

/// Run the full analysis over a parsed log.
pub fn analyze(log: &ProbeLog, threshold: usize) -> Analysis {
    let events = &log.events;

    let hourly = aggregate_hourly(events);
    let disconnections = detect_disconnections(events, threshold);
    let disconnection_hourly = disconnections_per_hour(events, &disconnections);
    let summary = summarize(events, &hourly, &disconnections);

    tracing::info!(
        "Analyzed {} probes over {} hours: {} disconnections (threshold {})",
        events.len(),
        hourly.len(),
        disconnections.len(),
        threshold
    );

    Analysis {
        host: log.host.clone(),
        threshold,
        hourly,
        disconnections,
        disconnection_hourly,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_log;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    const SCENARIO: &str = "\
PingInfoView Log, Target Host=10.0.0.1
2024/03/05 12:00:00 Request timed out.
2024/03/05 12:00:01 Request timed out.
2024/03/05 12:00:02 Request timed out.
2024/03/05 12:00:03 Reply from 10.0.0.1: bytes=32 time=14ms TTL=64
";

    #[test]
    fn test_concrete_scenario() {
        let log = parse_log(SCENARIO).unwrap();
        let analysis = analyze(&log, 3);

        assert_eq!(analysis.host, "10.0.0.1");
        assert_eq!(
            analysis.disconnections,
            vec![Disconnection {
                start_time: at(12, 0, 0),
                end_time: at(12, 0, 3),
                duration_seconds: 3,
                failure_count: 3,
            }]
        );
        assert!((analysis.summary.overall_loss_rate - 75.0).abs() < 1e-9);
        assert_eq!(analysis.disconnection_hourly.len(), 1);
        assert_eq!(analysis.disconnection_hourly[0].count, 1);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let log = parse_log(SCENARIO).unwrap();
        assert_eq!(analyze(&log, 3), analyze(&log, 3));
    }

    #[test]
    fn test_hour_coverage_and_conservation() {
        let text = "\
Target Host=192.168.1.1
2024/03/05 09:10:00 Request timed out.
2024/03/05 09:10:01 Request timed out.
2024/03/05 09:10:02 Reply from 192.168.1.1: bytes=32 time=3ms TTL=64
2024/03/05 12:59:59 Request timed out.
2024/03/05 12:59:59 General failure.
2024/03/05 13:00:00 Request timed out.
";
        let log = parse_log(text).unwrap();
        let analysis = analyze(&log, 3);

        let hourly_hours: Vec<_> = analysis.hourly.iter().map(|h| h.hour).collect();
        assert_eq!(hourly_hours, vec![at(9, 0, 0), at(12, 0, 0), at(13, 0, 0)]);

        let dense_hours: Vec<_> = analysis.disconnection_hourly.iter().map(|h| h.hour).collect();
        assert_eq!(
            dense_hours,
            vec![at(9, 0, 0), at(10, 0, 0), at(11, 0, 0), at(12, 0, 0), at(13, 0, 0)]
        );

        let total: usize = analysis.hourly.iter().map(|h| h.total).sum();
        assert_eq!(total, log.events.len());

        let failures: usize = analysis.hourly.iter().map(|h| h.failures).sum();
        let in_runs: usize = analysis.disconnections.iter().map(|d| d.failure_count).sum();
        assert!(failures >= in_runs);

        // The trailing run is still open at end of input.
        assert_eq!(analysis.disconnections.len(), 1);
        assert_eq!(analysis.disconnections[0].start_time, at(12, 59, 59));
        assert_eq!(analysis.disconnections[0].end_time, at(13, 0, 0));
        assert_eq!(analysis.disconnection_hourly[3].count, 1);
    }
}
