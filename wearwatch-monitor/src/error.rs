// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for the monitoring session.

use thiserror::Error;
use wearwatch::ScoreError;
use wearwatch_sim::SimError;

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Monitor error types.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Monitoring is not running")]
    NotRunning,

    #[error("A monitoring run is already active")]
    AlreadyRunning,

    #[error("Cannot clear history while monitoring is running; stop it first")]
    ClearWhileRunning,

    #[error("Invalid run plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid monitor configuration: {0}")]
    InvalidConfig(String),

    #[error("Scoring failed: {0}")]
    Score(#[from] ScoreError),

    #[error("Generator error: {0}")]
    Sim(#[from] SimError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Monitor runner has shut down")]
    RunnerClosed,
}
