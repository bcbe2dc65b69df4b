//! Disconnection detection over a chronological probe sequence.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use super::hourly::{hour_range, truncate_to_hour};
use super::models::{Disconnection, DisconnectionHourly, Outcome, ProbeEvent};

/// Default number of consecutive failures that counts as a disconnection.
pub const DEFAULT_THRESHOLD: usize = 3;

/// Detector state between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// Last probe succeeded (or nothing seen yet).
    Connected,
    /// Failing, but fewer than `threshold` failures so far.
    Failing { start: NaiveDateTime, failures: usize },
    /// Inside a disconnection.
    Disconnected { start: NaiveDateTime, failures: usize },
}

/// Finds maximal runs of consecutive failures of length >= `threshold`.
#[derive(Debug)]
pub struct DisconnectionDetector {
    threshold: usize,
    state: RunState,
    last_seen: Option<NaiveDateTime>,
    found: Vec<Disconnection>,
}

impl DisconnectionDetector {
    /// A zero threshold is treated as 1.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            state: RunState::Connected,
            last_seen: None,
            found: Vec::new(),
        }
    }

    /// Feed the next event in chronological order.
    pub fn observe(&mut self, event: &ProbeEvent) {
        self.last_seen = Some(event.timestamp);

        self.state = match (self.state, event.outcome) {
            (RunState::Connected, Outcome::Failure) => self.failing(event.timestamp, 1),
            (RunState::Failing { start, failures }, Outcome::Failure) => {
                self.failing(start, failures + 1)
            }
            (RunState::Disconnected { start, failures }, Outcome::Failure) => {
                RunState::Disconnected {
                    start,
                    failures: failures + 1,
                }
            }
            (RunState::Disconnected { start, failures }, Outcome::Success) => {
                tracing::debug!(
                    "Disconnection from {} to {} ({} failures)",
                    start,
                    event.timestamp,
                    failures
                );
                self.found
                    .push(Disconnection::new(start, event.timestamp, failures));
                RunState::Connected
            }
            (_, Outcome::Success) => RunState::Connected,
        };
    }

    fn failing(&self, start: NaiveDateTime, failures: usize) -> RunState {
        if failures >= self.threshold {
            RunState::Disconnected { start, failures }
        } else {
            RunState::Failing { start, failures }
        }
    }

    /// Close any run still open at end of input and return all disconnections.
    ///
    /// An open run ends at the last observed timestamp.
    pub fn finish(mut self) -> Vec<Disconnection> {
        if let (RunState::Disconnected { start, failures }, Some(end)) =
            (self.state, self.last_seen)
        {
            tracing::debug!("Disconnection still open at end of input since {}", start);
            self.found.push(Disconnection::new(start, end, failures));
        }
        self.found
    }
}

/// Run the detector over the whole event sequence.
pub fn detect_disconnections(events: &[ProbeEvent], threshold: usize) -> Vec<Disconnection> {
    let mut detector = DisconnectionDetector::new(threshold);
    for event in events {
        detector.observe(event);
    }
    detector.finish()
}

/// Disconnection starts per hour, over every hour the events span.
pub fn disconnections_per_hour(
    events: &[ProbeEvent],
    disconnections: &[Disconnection],
) -> Vec<DisconnectionHourly> {
    let mut counts: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for d in disconnections {
        *counts.entry(truncate_to_hour(d.start_time)).or_default() += 1;
    }

    hour_range(events)
        .into_iter()
        .map(|hour| DisconnectionHourly {
            hour,
            count: counts.get(&hour).copied().unwrap_or(0),
        })
        .collect()
}
