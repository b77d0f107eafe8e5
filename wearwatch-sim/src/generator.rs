// Wearwatch Sim - Synthetic machine sensor generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Core signal generation logic.
//!
//! Each step first moves the latent state (load per scenario, wear by a
//! positive increment), then derives correlated sensor readings from fixed
//! baselines, load-scaled offsets and independent Gaussian noise. Only the
//! latent state is clamped; derived sensor values are left unbounded.

use crate::scenario::Scenario;
use crate::state::SimulationState;
use rand::distributions::Uniform;
use rand::prelude::*;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use wearwatch::{SensorSample, SensorValues};

/// Generator error types.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid distribution for {name}: {message}")]
    InvalidDistribution { name: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the latent state moves each step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadDynamics {
    /// Noise std for `NormalOperation`.
    pub normal_noise_std: f64,
    /// Deterministic per-step drift for `IncreasingLoad`.
    pub drift_per_step: f64,
    /// Noise std for `IncreasingLoad`.
    pub drift_noise_std: f64,
    /// Uniform range for `HighStress`.
    pub high_stress_range: (f64, f64),
    /// Uniform range for `RandomFluctuation`.
    pub random_range: (f64, f64),
    /// Uniform per-step wear increment.
    pub wear_increment: (f64, f64),
}

impl Default for LoadDynamics {
    fn default() -> Self {
        Self {
            normal_noise_std: 0.03,
            drift_per_step: 0.01,
            drift_noise_std: 0.02,
            high_stress_range: (0.7, 1.0),
            random_range: (0.0, 1.0),
            wear_increment: (0.2, 0.8),
        }
    }
}

/// One sensor channel: `base + load_gain * load + Normal(0, noise_std)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelModel {
    pub base: f64,
    pub load_gain: f64,
    pub noise_std: f64,
}

impl ChannelModel {
    pub const fn new(base: f64, load_gain: f64, noise_std: f64) -> Self {
        Self {
            base,
            load_gain,
            noise_std,
        }
    }
}

/// Sensor baselines and noise levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorModel {
    /// Air temperature (K); independent of load by default.
    pub air_temperature: ChannelModel,
    /// Process temperature offset above air temperature (K).
    pub process_offset: ChannelModel,
    pub rotational_speed: ChannelModel,
    pub torque: ChannelModel,
}

impl Default for SensorModel {
    fn default() -> Self {
        Self {
            air_temperature: ChannelModel::new(295.0, 0.0, 1.5),
            process_offset: ChannelModel::new(5.0, 20.0, 0.7),
            rotational_speed: ChannelModel::new(1200.0, 1000.0, 80.0),
            torque: ChannelModel::new(30.0, 45.0, 5.0),
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub dynamics: LoadDynamics,
    pub sensors: SensorModel,
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Pre-built distributions for one configuration.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    config: GeneratorConfig,
    normal_noise: Normal<f64>,
    drift_noise: Normal<f64>,
    high_stress: Uniform<f64>,
    random_load: Uniform<f64>,
    wear_step: Uniform<f64>,
    air_noise: Normal<f64>,
    process_noise: Normal<f64>,
    speed_noise: Normal<f64>,
    torque_noise: Normal<f64>,
}

impl SignalGenerator {
    /// Validate `config` and build its distributions.
    pub fn new(config: GeneratorConfig) -> Result<Self, SimError> {
        let d = &config.dynamics;
        let s = &config.sensors;
        if d.wear_increment.0 < 0.0 {
            return Err(SimError::InvalidDistribution {
                name: "wear_increment",
                message: "wear must not decrease".to_string(),
            });
        }
        Ok(Self {
            normal_noise: normal("normal_noise_std", 0.0, d.normal_noise_std)?,
            drift_noise: normal("drift_noise_std", 0.0, d.drift_noise_std)?,
            high_stress: uniform("high_stress_range", d.high_stress_range)?,
            random_load: uniform("random_range", d.random_range)?,
            wear_step: uniform("wear_increment", d.wear_increment)?,
            air_noise: normal("air_temperature", 0.0, s.air_temperature.noise_std)?,
            process_noise: normal("process_offset", 0.0, s.process_offset.noise_std)?,
            speed_noise: normal("rotational_speed", 0.0, s.rotational_speed.noise_std)?,
            torque_noise: normal("torque", 0.0, s.torque.noise_std)?,
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Advance `state` one step under `scenario` and return the new sample.
    pub fn next_sample<R: Rng + ?Sized>(
        &self,
        state: &mut SimulationState,
        scenario: Scenario,
        rng: &mut R,
    ) -> SensorSample {
        self.update_load(state, scenario, rng);
        self.update_wear(state, rng);
        self.sample(state, rng)
    }

    /// Move `load` according to `scenario`, clamped to [0, 1].
    pub fn update_load<R: Rng + ?Sized>(
        &self,
        state: &mut SimulationState,
        scenario: Scenario,
        rng: &mut R,
    ) {
        let load = match scenario {
            Scenario::NormalOperation => state.load() + self.normal_noise.sample(rng),
            Scenario::IncreasingLoad => {
                state.load() + self.config.dynamics.drift_per_step + self.drift_noise.sample(rng)
            }
            Scenario::HighStress => self.high_stress.sample(rng),
            Scenario::RandomFluctuation => self.random_load.sample(rng),
        };
        state.set_load(load);
    }

    /// Add a positive wear increment, clamped to [0, 300].
    pub fn update_wear<R: Rng + ?Sized>(&self, state: &mut SimulationState, rng: &mut R) {
        let wear = state.wear() + self.wear_step.sample(rng);
        state.set_wear(wear);
    }

    /// Derive sensor readings from the current state without moving it.
    pub fn sample<R: Rng + ?Sized>(&self, state: &SimulationState, rng: &mut R) -> SensorSample {
        let s = &self.config.sensors;
        let load = state.load();

        let air_temperature = s.air_temperature.base
            + s.air_temperature.load_gain * load
            + self.air_noise.sample(rng);
        let process_temperature = air_temperature
            + s.process_offset.base
            + s.process_offset.load_gain * load
            + self.process_noise.sample(rng);
        let rotational_speed = s.rotational_speed.base
            + s.rotational_speed.load_gain * load
            + self.speed_noise.sample(rng);
        let torque = s.torque.base + s.torque.load_gain * load + self.torque_noise.sample(rng);

        SensorSample::from_sensors(SensorValues {
            air_temperature,
            process_temperature,
            rotational_speed,
            torque,
            tool_wear: state.wear(),
        })
    }
}

fn normal(name: &'static str, mean: f64, std: f64) -> Result<Normal<f64>, SimError> {
    Normal::new(mean, std).map_err(|e| SimError::InvalidDistribution {
        name,
        message: e.to_string(),
    })
}

fn uniform(name: &'static str, (low, high): (f64, f64)) -> Result<Uniform<f64>, SimError> {
    // Uniform::new panics on an empty or non-finite range.
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(SimError::InvalidDistribution {
            name,
            message: format!("empty range [{}, {})", low, high),
        });
    }
    Ok(Uniform::new(low, high))
}
