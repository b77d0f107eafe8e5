// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Derived views, recomputed from the store and event log on demand.

use crate::controller::RunState;
use crate::event::{Event, EventKind, EventLog};
use crate::store::RollingStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wearwatch::{Reading, RiskStatus, RiskThresholds};
use wearwatch_sim::Scenario;

/// Aggregates over the full history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_steps: usize,
    pub average_risk: Option<f64>,
    pub max_risk: Option<f64>,
    /// High-risk events only; spikes are counted separately.
    pub high_risk_events: usize,
    pub spike_events: usize,
}

impl SessionSummary {
    pub fn compute(store: &RollingStore, events: &EventLog) -> Self {
        Self {
            total_steps: store.len(),
            average_risk: store.mean_prob(),
            max_risk: store.max_prob(),
            high_risk_events: events.count(EventKind::HighRisk),
            spike_events: events.count(EventKind::SuddenSpike),
        }
    }
}

/// Status badge for the latest reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    pub status: RiskStatus,
    pub message: String,
}

impl StatusLine {
    pub fn for_reading(reading: &Reading, thresholds: &RiskThresholds) -> Self {
        let status = thresholds.classify(reading.failure_prob);
        Self {
            status,
            message: status.describe(reading.failure_prob, reading.time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskPoint {
    pub time: u64,
    pub failure_prob: f64,
}

/// Risk-over-time line plus the horizontal threshold marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSeries {
    pub points: Vec<RiskPoint>,
    pub threshold: f64,
}

impl RiskSeries {
    pub fn from_store(store: &RollingStore, window: usize, threshold: f64) -> Self {
        Self {
            points: store
                .tail(window)
                .iter()
                .map(|r| RiskPoint {
                    time: r.time,
                    failure_prob: r.failure_prob,
                })
                .collect(),
            threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorPoint {
    pub time: u64,
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub torque: f64,
}

/// Multi-series sensor trend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorTrend {
    pub points: Vec<SensorPoint>,
}

impl SensorTrend {
    pub fn from_store(store: &RollingStore, window: usize) -> Self {
        Self {
            points: store
                .tail(window)
                .iter()
                .map(|r| SensorPoint {
                    time: r.time,
                    air_temperature: r.sensors().air_temperature,
                    process_temperature: r.sensors().process_temperature,
                    torque: r.sensors().torque,
                })
                .collect(),
        }
    }
}

/// Progress through the active or last run's step budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProgress {
    pub completed: u32,
    pub planned: u32,
}

impl RunProgress {
    pub fn fraction(&self) -> f64 {
        if self.planned == 0 {
            0.0
        } else {
            f64::from(self.completed) / f64::from(self.planned)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.planned > 0 && self.completed >= self.planned
    }
}

/// Everything the presentation surface renders after a step or transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorView {
    pub run_state: RunState,
    pub scenario: Option<Scenario>,
    pub progress: RunProgress,
    pub started_at: Option<DateTime<Utc>>,
    pub load: f64,
    pub wear: f64,
    pub latest: Option<Reading>,
    pub status: Option<StatusLine>,
    pub summary: SessionSummary,
    /// Most recent events, oldest first.
    pub recent_events: Vec<Event>,
    pub risk_series: RiskSeries,
    pub sensor_trend: SensorTrend,
    /// Why the last run ended early, if it failed.
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wearwatch::{SensorSample, SensorValues};

    fn store_with(probs: &[f64]) -> RollingStore {
        let mut store = RollingStore::new();
        for (i, p) in probs.iter().enumerate() {
            let sample = SensorSample::from_sensors(SensorValues {
                air_temperature: 295.0 + i as f64,
                process_temperature: 306.0,
                rotational_speed: 1500.0,
                torque: 40.0,
                tool_wear: 50.0,
            });
            store.append(sample, *p);
        }
        store
    }

    #[test]
    fn test_empty_summary() {
        let summary = SessionSummary::compute(&RollingStore::new(), &EventLog::new());
        assert_eq!(summary, SessionSummary::default());
    }

    #[test]
    fn test_summary_counts_high_risk_only() {
        let store = store_with(&[0.2, 0.9]);
        let mut events = EventLog::new();
        events.push(Event::high_risk(2, 0.9));
        events.push(Event::sudden_spike(2, 0.9));

        let summary = SessionSummary::compute(&store, &events);
        assert_eq!(summary.total_steps, 2);
        assert_eq!(summary.high_risk_events, 1);
        assert_eq!(summary.spike_events, 1);
        assert_eq!(summary.max_risk, Some(0.9));
    }

    #[test]
    fn test_series_window() {
        let store = store_with(&[0.1; 150]);
        let risk = RiskSeries::from_store(&store, 100, 0.6);
        assert_eq!(risk.points.len(), 100);
        assert_eq!(risk.points[0].time, 51);
        assert_eq!(risk.threshold, 0.6);

        let trend = SensorTrend::from_store(&store, 100);
        assert_eq!(trend.points.len(), 100);
        assert_eq!(trend.points[99].time, 150);
        assert_eq!(trend.points[99].air_temperature, 295.0 + 149.0);
    }

    #[test]
    fn test_status_line() {
        let store = store_with(&[0.1, 0.853]);
        let line = StatusLine::for_reading(store.latest().unwrap(), &RiskThresholds::default());
        assert_eq!(line.status, RiskStatus::Critical);
        assert_eq!(line.message, "CRITICAL RISK: 85.3% (step 2)");
    }

    #[test]
    fn test_progress_fraction() {
        let p = RunProgress {
            completed: 20,
            planned: 80,
        };
        assert_eq!(p.fraction(), 0.25);
        assert!(!p.is_exhausted());
        assert_eq!(RunProgress::default().fraction(), 0.0);
    }
}
