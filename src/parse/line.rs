//! Line-level parsing of ping log output.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::LineParseWarning;
use crate::analysis::ProbeEvent;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

fn host_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Target Host=(?P<host>\d+\.\d+\.\d+\.\d+)").unwrap())
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<ts>\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})").unwrap()
    })
}

fn latency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"time=(?P<ms>\d+)ms").unwrap())
}

/// Extract the target IPv4 address from a `Target Host=` header.
pub fn extract_host(header: &str) -> Option<String> {
    host_re()
        .captures(header)
        .and_then(|caps| caps.name("host"))
        .map(|m| m.as_str().to_string())
}

/// Parse a single log line.
///
/// Returns `Ok(None)` for lines that do not start with a timestamp; these are
/// banners and other noise. A line that has a timestamp but can't be
/// interpreted produces a warning instead.
pub fn parse_line(line: &str) -> Result<Option<ProbeEvent>, LineParseWarning> {
    let line = line.trim();

    let Some(ts) = timestamp_re().captures(line).and_then(|caps| caps.name("ts")) else {
        return Ok(None);
    };

    let timestamp = NaiveDateTime::parse_from_str(ts.as_str(), TIMESTAMP_FORMAT)
        .map_err(|e| LineParseWarning::new(line, e))?;

    if !line.contains("Reply from") {
        return Ok(Some(ProbeEvent::failure(timestamp)));
    }

    // "time<1ms" and similar forms carry no usable figure
    let latency_ms = match latency_re().captures(line).and_then(|caps| caps.name("ms")) {
        Some(ms) => Some(
            ms.as_str()
                .parse::<u32>()
                .map_err(|e| LineParseWarning::new(line, e))?,
        ),
        None => None,
    };

    Ok(Some(ProbeEvent::success(timestamp, latency_ms)))
}
