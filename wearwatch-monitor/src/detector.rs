// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Event detection on the newest stored reading.
//!
//! Two independent triggers, evaluated after every append:
//!
//! - **High risk**: `failure_prob >= risk_threshold`.
//! - **Sudden spike**: once the store holds more than `window` readings,
//!   `failure_prob - mean(baseline) > delta`. With
//!   [`SpikeBaseline::IncludeCurrent`] the baseline is the last `window`
//!   stored readings, the newest one included.
//!
//! Both may fire on the same step. There is no deduplication or expiry.

use crate::config::{SpikeBaseline, SpikeConfig};
use crate::event::Event;
use crate::store::RollingStore;
use wearwatch::RiskThresholds;

/// Stateless detector; all history lives in the store.
#[derive(Debug, Clone)]
pub struct EventDetector {
    risk_threshold: f64,
    spike: SpikeConfig,
}

impl EventDetector {
    pub fn new(thresholds: &RiskThresholds, spike: SpikeConfig) -> Self {
        Self {
            risk_threshold: thresholds.risk,
            spike,
        }
    }

    /// Events raised by the latest reading in `store`.
    pub fn detect(&self, store: &RollingStore) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(latest) = store.latest() else {
            return events;
        };
        let prob = latest.failure_prob;

        if prob >= self.risk_threshold {
            events.push(Event::high_risk(latest.time, prob));
        }

        if let Some(baseline) = self.spike_baseline(store) {
            if prob - baseline > self.spike.delta {
                events.push(Event::sudden_spike(latest.time, prob));
            }
        }

        events
    }

    /// Mean of the spike window, or `None` while history is too short.
    pub fn spike_baseline(&self, store: &RollingStore) -> Option<f64> {
        let window = self.spike.window;
        if store.len() <= window {
            return None;
        }
        let readings = match self.spike.baseline {
            SpikeBaseline::IncludeCurrent => store.tail(window),
            SpikeBaseline::PreviousOnly => {
                let all = store.all();
                &all[all.len() - 1 - window..all.len() - 1]
            }
        };
        let sum: f64 = readings.iter().map(|r| r.failure_prob).sum();
        Some(sum / readings.len() as f64)
    }
}
