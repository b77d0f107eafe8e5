// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Append-only history of scored readings.

use wearwatch::{Reading, SensorSample};

/// Time-ordered readings of the current session.
///
/// `time` is assigned on append as `len + 1`, so indices start at 1 and have
/// no gaps. Readings are never mutated; the store is only bulk-cleared.
#[derive(Debug, Clone, Default)]
pub struct RollingStore {
    readings: Vec<Reading>,
}

impl RollingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scored sample and return the stored reading.
    pub fn append(&mut self, sample: SensorSample, failure_prob: f64) -> &Reading {
        let time = self.readings.len() as u64 + 1;
        self.readings.push(Reading::new(time, sample, failure_prob));
        &self.readings[self.readings.len() - 1]
    }

    /// Full history, oldest first.
    pub fn all(&self) -> &[Reading] {
        &self.readings
    }

    /// Last `n` readings (fewer if the store is shorter), oldest first.
    pub fn tail(&self, n: usize) -> &[Reading] {
        let start = self.readings.len().saturating_sub(n);
        &self.readings[start..]
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Mean failure probability over the full history.
    pub fn mean_prob(&self) -> Option<f64> {
        if self.readings.is_empty() {
            return None;
        }
        let sum: f64 = self.readings.iter().map(|r| r.failure_prob).sum();
        Some(sum / self.readings.len() as f64)
    }

    /// Maximum failure probability over the full history.
    pub fn max_prob(&self) -> Option<f64> {
        self.readings
            .iter()
            .map(|r| r.failure_prob)
            .reduce(f64::max)
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wearwatch::SensorValues;

    fn sample() -> SensorSample {
        SensorSample::from_sensors(SensorValues {
            air_temperature: 295.0,
            process_temperature: 306.0,
            rotational_speed: 1500.0,
            torque: 40.0,
            tool_wear: 50.0,
        })
    }

    #[test]
    fn test_time_starts_at_one_without_gaps() {
        let mut store = RollingStore::new();
        for i in 0..25 {
            let reading = store.append(sample(), 0.1);
            assert_eq!(reading.time, i + 1);
        }
        let times: Vec<u64> = store.all().iter().map(|r| r.time).collect();
        assert_eq!(times, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_tail_window() {
        let mut store = RollingStore::new();
        assert!(store.tail(5).is_empty());
        for p in [0.1, 0.2, 0.3] {
            store.append(sample(), p);
        }
        assert_eq!(store.tail(5).len(), 3);
        let tail = store.tail(2);
        assert_eq!(tail[0].time, 2);
        assert_eq!(tail[1].time, 3);
    }

    #[test]
    fn test_aggregates() {
        let mut store = RollingStore::new();
        assert_eq!(store.mean_prob(), None);
        assert_eq!(store.max_prob(), None);

        for p in [0.1, 0.7, 0.4] {
            store.append(sample(), p);
        }
        assert_relative_eq!(store.mean_prob().unwrap(), 0.4, epsilon = 1e-12);
        assert_eq!(store.max_prob(), Some(0.7));
    }

    #[test]
    fn test_clear_restarts_time() {
        let mut store = RollingStore::new();
        store.append(sample(), 0.1);
        store.append(sample(), 0.1);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.append(sample(), 0.1).time, 1);
    }
}
