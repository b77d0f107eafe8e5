// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Wearwatch Monitor
//!
//! Live monitoring simulator: synthetic readings are scored every step,
//! stored in a rolling history and checked for high-risk and sudden-spike
//! events, under a two-state run controller.
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use std::sync::Arc;
//! use wearwatch::{ConstantClassifier, FeatureSchema, Scorer};
//! use wearwatch_monitor::{MonitorConfig, MonitorSession, RunPlan, RunSignal};
//!
//! let scorer = Scorer::new(Arc::new(ConstantClassifier::new(0.1)), FeatureSchema::standard()).unwrap();
//! let mut session = MonitorSession::new(MonitorConfig::default(), scorer).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let report = session
//!     .run(RunPlan::default(), &mut rng, |_, _| RunSignal::Continue)
//!     .unwrap();
//!
//! assert_eq!(report.steps, 80);
//! assert_eq!(session.view().summary.total_steps, 80);
//! ```
//!
//! ## Modules
//!
//! - [`store`]: Append-only reading history
//! - [`detector`]: High-risk and sudden-spike triggers
//! - [`controller`]: `Idle`/`Running` state machine
//! - [`session`]: Step pipeline and blocking driver
//! - [`runner`]: Single-owner async task with a control handle
//! - [`export`]: CSV dump of the history

pub mod config;
pub mod controller;
pub mod detector;
pub mod error;
pub mod event;
pub mod export;
pub mod runner;
pub mod session;
pub mod store;
pub mod summary;

pub use config::{MonitorConfig, RunPlan, SpikeBaseline, SpikeConfig};
pub use controller::{RunController, RunState};
pub use detector::EventDetector;
pub use error::{MonitorError, Result};
pub use event::{Event, EventKind, EventLog};
pub use export::{to_csv_string, write_csv, write_csv_file, COLUMNS, EXPORT_FILE_NAME};
pub use runner::{spawn, MonitorHandle};
pub use session::{MonitorSession, RunReport, RunSignal, StepOutcome};
pub use store::RollingStore;
pub use summary::{
    MonitorView, RiskPoint, RiskSeries, RunProgress, SensorPoint, SensorTrend, SessionSummary,
    StatusLine,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
