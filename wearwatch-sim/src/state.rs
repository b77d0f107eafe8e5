// Wearwatch Sim - Synthetic machine sensor generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Latent machine state carried between steps.

use serde::{Deserialize, Serialize};

/// Smoothed stress and accumulated tool wear.
///
/// Both fields are clamped on every write: `load` to [0, 1] and `wear` to
/// [0, 300].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    load: f64,
    wear: f64,
}

impl SimulationState {
    pub const DEFAULT_LOAD: f64 = 0.3;
    pub const DEFAULT_WEAR: f64 = 50.0;
    pub const LOAD_MIN: f64 = 0.0;
    pub const LOAD_MAX: f64 = 1.0;
    pub const WEAR_MIN: f64 = 0.0;
    pub const WEAR_MAX: f64 = 300.0;

    /// State with the given values, clamped into range.
    pub fn new(load: f64, wear: f64) -> Self {
        let mut state = Self::default();
        state.set_load(load);
        state.set_wear(wear);
        state
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn wear(&self) -> f64 {
        self.wear
    }

    pub fn set_load(&mut self, load: f64) {
        self.load = clamp_finite(load, Self::LOAD_MIN, Self::LOAD_MAX, self.load);
    }

    pub fn set_wear(&mut self, wear: f64) {
        self.wear = clamp_finite(wear, Self::WEAR_MIN, Self::WEAR_MAX, self.wear);
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            load: Self::DEFAULT_LOAD,
            wear: Self::DEFAULT_WEAR,
        }
    }
}

// NaN would escape `clamp`; keep the previous value instead.
fn clamp_finite(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SimulationState::default();
        assert_eq!(state.load(), 0.3);
        assert_eq!(state.wear(), 50.0);
    }

    #[test]
    fn test_clamping() {
        let mut state = SimulationState::new(1.7, -4.0);
        assert_eq!(state.load(), 1.0);
        assert_eq!(state.wear(), 0.0);

        state.set_wear(1e9);
        assert_eq!(state.wear(), 300.0);
        state.set_load(f64::NEG_INFINITY);
        assert_eq!(state.load(), 0.0);
    }

    #[test]
    fn test_nan_keeps_previous_value() {
        let mut state = SimulationState::new(0.5, 100.0);
        state.set_load(f64::NAN);
        assert_eq!(state.load(), 0.5);
    }
}
