// Wearwatch Sim - Synthetic machine sensor generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Wearwatch Sim
//!
//! Synthetic sensor stream for a milling machine.
//!
//! A small latent state (load, tool wear) evolves step by step under one of
//! four operating scenarios. Each step derives correlated readings for air
//! and process temperature, rotational speed, torque and tool wear.
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use wearwatch_sim::{GeneratorConfig, Scenario, SignalGenerator, SimulationState};
//!
//! let generator = SignalGenerator::new(GeneratorConfig::default()).unwrap();
//! let mut state = SimulationState::default();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let sample = generator.next_sample(&mut state, Scenario::IncreasingLoad, &mut rng);
//! assert_eq!(sample.sensors.tool_wear, state.wear());
//! ```
//!
//! ## Scenarios
//!
//! - [`Scenario::NormalOperation`]: load wanders around its last value
//! - [`Scenario::IncreasingLoad`]: load drifts upward every step
//! - [`Scenario::HighStress`]: load redrawn in [0.7, 1.0]
//! - [`Scenario::RandomFluctuation`]: load redrawn in [0, 1]

pub mod generator;
pub mod scenario;
pub mod state;

pub use generator::{
    ChannelModel, GeneratorConfig, LoadDynamics, SensorModel, SignalGenerator, SimError,
};
pub use scenario::{Scenario, UnknownScenario};
pub use state::SimulationState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
