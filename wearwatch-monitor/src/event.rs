// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Monitoring event types and the event log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of monitoring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Failure probability at or above the risk threshold.
    HighRisk,
    /// Failure probability jumped above its recent average.
    SuddenSpike,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::HighRisk => "HIGH_RISK",
            EventKind::SuddenSpike => "SUDDEN_SPIKE",
        }
    }

    /// Label shown in the event list.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::HighRisk => "High risk",
            EventKind::SuddenSpike => "Sudden spike",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A flagged reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Time index of the originating reading.
    pub time: u64,
    /// Triggering probability.
    pub failure_prob: f64,
    pub kind: EventKind,
}

impl Event {
    pub fn new(time: u64, failure_prob: f64, kind: EventKind) -> Self {
        Self {
            time,
            failure_prob,
            kind,
        }
    }

    pub fn high_risk(time: u64, failure_prob: f64) -> Self {
        Self::new(time, failure_prob, EventKind::HighRisk)
    }

    pub fn sudden_spike(time: u64, failure_prob: f64) -> Self {
        Self::new(time, failure_prob, EventKind::SuddenSpike)
    }

    /// Probability as a percentage rounded to one decimal.
    pub fn risk_percent(&self) -> f64 {
        (self.failure_prob * 1000.0).round() / 10.0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={} {:.1}% {}",
            self.time,
            self.failure_prob * 100.0,
            self.kind
        )
    }
}

/// Append-only event history. Truncation happens only on read.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    /// Last `n` events, oldest first.
    pub fn recent(&self, n: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_keeps_storage() {
        let mut log = EventLog::new();
        for t in 1..=15 {
            log.push(Event::high_risk(t, 0.7));
        }
        let recent = log.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].time, 6);
        assert_eq!(recent[9].time, 15);
        assert_eq!(log.len(), 15);
    }

    #[test]
    fn test_count_by_kind() {
        let mut log = EventLog::new();
        log.extend([
            Event::high_risk(1, 0.7),
            Event::sudden_spike(1, 0.7),
            Event::high_risk(2, 0.9),
        ]);
        assert_eq!(log.count(EventKind::HighRisk), 2);
        assert_eq!(log.count(EventKind::SuddenSpike), 1);
    }

    #[test]
    fn test_display() {
        let event = Event::sudden_spike(12, 0.8534);
        assert_eq!(event.to_string(), "t=12 85.3% Sudden spike");
        assert_eq!(event.risk_percent(), 85.3);
    }
}
