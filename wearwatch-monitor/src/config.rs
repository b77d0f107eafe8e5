// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Monitoring configuration.

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;
use wearwatch::RiskThresholds;
use wearwatch_sim::{GeneratorConfig, Scenario, SimulationState};

/// Master configuration for a monitoring session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Status band cutoffs; `risk` also triggers high-risk events.
    pub thresholds: RiskThresholds,

    /// Sudden spike detection.
    pub spike: SpikeConfig,

    /// Readings shown in chart series.
    pub chart_window: usize,

    /// Events shown in the event list.
    pub event_display: usize,

    /// Load after a clear (default: 0.3).
    pub initial_load: f64,

    /// Tool wear after a clear (default: 50.0).
    pub initial_wear: f64,

    /// Signal generator settings.
    pub generator: GeneratorConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: RiskThresholds::default(),
            spike: SpikeConfig::default(),
            chart_window: 100,
            event_display: 10,
            initial_load: SimulationState::DEFAULT_LOAD,
            initial_wear: SimulationState::DEFAULT_WEAR,
            generator: GeneratorConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.risk) || !(0.0..=1.0).contains(&t.critical) {
            return Err(MonitorError::InvalidConfig(
                "thresholds must be within [0, 1]".to_string(),
            ));
        }
        if t.risk > t.critical {
            return Err(MonitorError::InvalidConfig(format!(
                "risk threshold {} above critical threshold {}",
                t.risk, t.critical
            )));
        }
        if self.spike.window == 0 {
            return Err(MonitorError::InvalidConfig(
                "spike window must hold at least one reading".to_string(),
            ));
        }
        if !(self.spike.delta.is_finite() && self.spike.delta >= 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "spike delta {} must be finite and non-negative",
                self.spike.delta
            )));
        }
        if self.chart_window == 0 {
            return Err(MonitorError::InvalidConfig(
                "chart window must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// State a cleared session starts from.
    pub fn initial_state(&self) -> SimulationState {
        SimulationState::new(self.initial_load, self.initial_wear)
    }
}

/// Which readings form the spike baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeBaseline {
    /// Most recent `window` stored readings, the current one included.
    #[default]
    IncludeCurrent,
    /// The `window` readings stored before the current one.
    PreviousOnly,
}

/// Sudden spike configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    /// Baseline window length; detection starts once the store holds more.
    pub window: usize,
    /// Fires when `current - mean(window)` exceeds this.
    pub delta: f64,
    pub baseline: SpikeBaseline,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            window: 5,
            delta: 0.2,
            baseline: SpikeBaseline::IncludeCurrent,
        }
    }
}

/// Parameters of one monitoring run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPlan {
    pub scenario: Scenario,
    /// Step budget; the run stops by itself once exhausted.
    pub steps: u32,
    /// Pause between steps, in seconds.
    pub delay: f64,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            scenario: Scenario::NormalOperation,
            steps: 80,
            delay: 0.4,
        }
    }
}

impl RunPlan {
    pub const STEPS: RangeInclusive<u32> = 20..=300;
    pub const DELAY_SECS: RangeInclusive<f64> = 0.1..=3.0;

    /// Build and validate a plan.
    pub fn new(scenario: Scenario, steps: u32, delay: f64) -> Result<Self> {
        let plan = Self {
            scenario,
            steps,
            delay,
        };
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<()> {
        if !Self::STEPS.contains(&self.steps) {
            return Err(MonitorError::InvalidPlan(format!(
                "steps {} outside [{}, {}]",
                self.steps,
                Self::STEPS.start(),
                Self::STEPS.end()
            )));
        }
        if !Self::DELAY_SECS.contains(&self.delay) {
            return Err(MonitorError::InvalidPlan(format!(
                "delay {}s outside [{}, {}]",
                self.delay,
                Self::DELAY_SECS.start(),
                Self::DELAY_SECS.end()
            )));
        }
        Ok(())
    }

    pub fn delay_duration(&self) -> Duration {
        Duration::from_secs_f64(self.delay)
    }
}
