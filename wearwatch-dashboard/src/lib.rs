// Wearwatch Dashboard - Predictive maintenance dashboard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Wearwatch Dashboard
//!
//! HTTP surface over the scoring core and the live monitor, with Prometheus
//! metrics and an optional AI advisor.

pub mod advisor;
pub mod error;
pub mod metrics;
pub mod prompts;
pub mod server;

pub use advisor::{AdvisorClient, AdvisorConfig, AdvisorError};
pub use error::{ApiError, DashboardError};
pub use server::{router, AppState};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use wearwatch::{FeatureSchema, GradientBoostedModel, Scorer};
use wearwatch_monitor::MonitorConfig;

/// Load the classifier artifact and its feature schema.
///
/// Either file missing or malformed is a fatal configuration error.
pub fn load_scorer(model: &Path, schema: &Path) -> Result<Scorer, DashboardError> {
    let classifier = GradientBoostedModel::from_json_file(model)?;
    let schema = FeatureSchema::from_json_file(schema)?;
    info!(
        "Loaded model {} ({} trees, {} features, base score {})",
        model.display(),
        classifier.trees().len(),
        classifier.num_features(),
        classifier.base_score()
    );
    Ok(Scorer::new(Arc::new(classifier), schema)?)
}

/// Monitor configuration from `path`, or the defaults.
pub fn load_monitor_config(path: Option<&Path>) -> Result<MonitorConfig, DashboardError> {
    match path {
        Some(path) => {
            info!("Loading monitor config from {}", path.display());
            Ok(MonitorConfig::from_json_file(path)?)
        }
        None => Ok(MonitorConfig::default()),
    }
}

/// Generator RNG, reproducible when seeded.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
