//! Parse module for textual ping logs.
//!
//! The first line carries the target host; every following line is either a
//! timestamped probe result or noise.

mod line;

pub use line::*;

use std::fmt::Display;

use thiserror::Error;

use crate::analysis::ProbeEvent;

/// Errors that make a whole log unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Could not determine the target host address from the file.")]
    MissingHost,
    #[error("No valid ping data found in the file.")]
    EmptyData,
}

/// A timestamped line that could not be interpreted. The line is dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("error parsing line: {line}, error: {reason}")]
pub struct LineParseWarning {
    pub line: String,
    pub reason: String,
}

impl LineParseWarning {
    pub fn new(line: &str, reason: impl Display) -> Self {
        Self {
            line: line.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A parsed probe log.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeLog {
    pub host: String,
    /// Probe events in input order.
    pub events: Vec<ProbeEvent>,
    pub warnings: Vec<LineParseWarning>,
}

/// Parse a whole log held in memory.
pub fn parse_log(text: &str) -> Result<ProbeLog, ParseError> {
    parse_lines(text.lines())
}

/// Parse a sequence of raw lines. The first line must name the target host.
pub fn parse_lines<'a, I>(lines: I) -> Result<ProbeLog, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lines = lines.into_iter();

    let header = lines.next().unwrap_or_default();
    let host = extract_host(header.trim()).ok_or(ParseError::MissingHost)?;

    let mut events = Vec::new();
    let mut warnings = Vec::new();

    for line in lines {
        match parse_line(line) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(warning) => {
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    if events.is_empty() {
        return Err(ParseError::EmptyData);
    }

    tracing::info!(
        "Parsed {} probe events for {} ({} lines skipped with errors)",
        events.len(),
        host,
        warnings.len()
    );

    Ok(ProbeLog {
        host,
        events,
        warnings,
    })
}
