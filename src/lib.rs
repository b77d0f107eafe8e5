//! # Wearwatch - Predictive maintenance risk scoring
//!
//! Turns machine sensor snapshots into a failure probability using a
//! pre-fitted gradient-boosted classifier, and classifies that probability
//! into status bands.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use wearwatch::{ConstantClassifier, FeatureSchema, ManualInput, Scorer, RiskThresholds, RiskStatus};
//!
//! let scorer = Scorer::new(Arc::new(ConstantClassifier::new(0.65)), FeatureSchema::standard()).unwrap();
//!
//! let input = ManualInput::default();
//! let probability = scorer.score(&input.feature_map()).unwrap();
//!
//! assert_eq!(RiskThresholds::default().classify(probability), RiskStatus::HighRisk);
//! ```
//!
//! ## Modules
//!
//! - [`reading`]: Sensor channels, derived features, scored readings
//! - [`schema`]: Ordered feature layout of the classifier input
//! - [`model`]: Classifier trait and the tree-ensemble artifact
//! - [`scorer`]: Feature map → probability
//! - [`status`]: Risk bands and single-shot assessment
//! - [`manual`]: Validated what-if scoring

pub mod error;
pub mod manual;
pub mod model;
pub mod reading;
pub mod schema;
pub mod scorer;
pub mod status;

// Re-exports for convenient access
pub use error::{ConfigError, InputError, Result, ScoreError, WearwatchError};
pub use manual::{assess, ManualAssessment, ManualInput};
pub use model::{Classifier, ConstantClassifier, FnClassifier, GradientBoostedModel, Tree, TreeNode};
pub use reading::{features, FeatureMap, ProductType, Reading, SensorSample, SensorValues};
pub use schema::{FeatureSchema, Vectorized};
pub use scorer::Scorer;
pub use status::{ProbabilityBand, RiskAssessment, RiskStatus, RiskThresholds};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
