//! Plain-text rendering of an analysis.

use std::io::{self, Write};

use chrono::{Duration as ChronoDuration, NaiveDateTime};

use crate::analysis::Analysis;
use crate::parse::LineParseWarning;

fn format_time(dt: &NaiveDateTime) -> String {
    dt.format("%Y/%m/%d %H:%M:%S").to_string()
}

/// Format an elapsed time as `H:MM:SS`, prefixed with whole days if any.
pub fn format_duration(duration: ChronoDuration) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let rest = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Write the full text report.
pub fn write_report<W: Write>(
    out: &mut W,
    analysis: &Analysis,
    warnings: &[LineParseWarning],
) -> io::Result<()> {
    let summary = &analysis.summary;

    writeln!(out, "===== Ping Data Analysis for {} =====\n", analysis.host)?;

    if let Some(range) = &summary.time_range {
        writeln!(out, "Analysis Time Range:")?;
        writeln!(out, "Start Time: {}", format_time(&range.start))?;
        writeln!(out, "End Time: {}", format_time(&range.end))?;
        writeln!(out, "Duration: {}", format_duration(range.duration()))?;
        writeln!(out)?;
    }

    writeln!(out, "Overall Packet Loss Rate: {:.2}%\n", summary.overall_loss_rate)?;

    writeln!(out, "Hourly Packet Loss Rates:")?;
    writeln!(out, "-------------------------")?;
    for stat in &analysis.hourly {
        writeln!(
            out,
            "{}: {:.2}% ({} of {} pings)",
            stat.hour.format("%Y/%m/%d %H:00"),
            stat.loss_rate,
            stat.failures,
            stat.total
        )?;
    }

    if analysis.disconnections.is_empty() {
        writeln!(out, "\nNo disconnection events detected.")?;
    } else {
        write_disconnections(out, analysis)?;
    }

    if !warnings.is_empty() {
        writeln!(out, "\nSkipped Lines:")?;
        writeln!(out, "--------------")?;
        for warning in warnings {
            writeln!(out, "{}", warning)?;
        }
    }

    Ok(())
}

fn write_disconnections<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    let summary = &analysis.summary;

    writeln!(out, "\nDisconnection Summary:")?;
    writeln!(out, "---------------------")?;
    writeln!(out, "Total disconnections: {}", summary.disconnection_count)?;

    if let Some(d) = &summary.durations {
        writeln!(out, "Average disconnection duration: {:.2} seconds", d.avg_seconds)?;
        writeln!(
            out,
            "Maximum disconnection duration: {:.2} seconds (Disconnection #{})",
            d.max_seconds as f64, d.max_index
        )?;
        writeln!(
            out,
            "Minimum disconnection duration: {:.2} seconds (Disconnection #{})",
            d.min_seconds as f64, d.min_index
        )?;
    }

    if let Some(avg) = summary.avg_failures_per_disconnection {
        writeln!(out, "Average packet loss per disconnection: {:.2}", avg)?;
    }
    if !analysis.hourly.is_empty() {
        writeln!(
            out,
            "Average disconnections per hour: {:.2}",
            summary.avg_disconnections_per_hour
        )?;
    }

    writeln!(out, "\nDisconnection Events:")?;
    writeln!(out, "--------------------")?;
    for (i, d) in analysis.disconnections.iter().enumerate() {
        writeln!(out, "Disconnection #{}:", i + 1)?;
        writeln!(out, "  Start time: {}", format_time(&d.start_time))?;
        writeln!(out, "  End time:   {}", format_time(&d.end_time))?;
        writeln!(out, "  Duration:   {:.2} seconds", d.duration_seconds as f64)?;
        writeln!(out, "  Packet loss count: {}", d.failure_count)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::parse::parse_log;

    fn render(text: &str) -> String {
        let log = parse_log(text).unwrap();
        let analysis = analyze(&log, 3);
        let mut out = Vec::new();
        write_report(&mut out, &analysis, &log.warnings).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(ChronoDuration::seconds(3)), "0:00:03");
        assert_eq!(format_duration(ChronoDuration::seconds(3725)), "1:02:05");
        assert_eq!(format_duration(ChronoDuration::seconds(86_400 + 61)), "1 day, 0:01:01");
        assert_eq!(format_duration(ChronoDuration::seconds(2 * 86_400)), "2 days, 0:00:00");
    }

    #[test]
    fn test_report_with_disconnection() {
        let report = render(
            "\
Target Host=10.0.0.1
2024/03/05 12:00:00 Request timed out.
2024/03/05 12:00:01 Request timed out.
2024/03/05 12:00:02 Request timed out.
2024/03/05 12:00:03 Reply from 10.0.0.1: bytes=32 time=14ms TTL=64
",
        );

        assert!(report.starts_with("===== Ping Data Analysis for 10.0.0.1 =====\n\n"));
        assert!(report.contains("Start Time: 2024/03/05 12:00:00\n"));
        assert!(report.contains("Duration: 0:00:03\n"));
        assert!(report.contains("Overall Packet Loss Rate: 75.00%\n"));
        assert!(report.contains("2024/03/05 12:00: 75.00% (3 of 4 pings)\n"));
        assert!(report.contains("Total disconnections: 1\n"));
        assert!(report.contains("Maximum disconnection duration: 3.00 seconds (Disconnection #1)\n"));
        assert!(report.contains("Average packet loss per disconnection: 3.00\n"));
        assert!(report.contains("Average disconnections per hour: 1.00\n"));
        assert!(report.contains("  Packet loss count: 3\n"));
        assert!(!report.contains("Skipped Lines"));
    }

    #[test]
    fn test_report_without_disconnection_lists_warnings() {
        let report = render(
            "\
Target Host=10.0.0.1
2024/03/05 12:00:00 Reply from 10.0.0.1: bytes=32 time=14ms TTL=64
2024/03/05 99:00:01 Request timed out.
",
        );

        assert!(report.contains("\nNo disconnection events detected.\n"));
        assert!(!report.contains("Disconnection Summary"));
        assert!(report.contains("Skipped Lines:\n"));
        assert!(report.contains("error parsing line: 2024/03/05 99:00:01 Request timed out."));
    }
}
