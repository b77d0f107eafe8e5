// Wearwatch Dashboard - Predictive maintenance dashboard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Startup and request error types.

use crate::advisor::AdvisorError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use wearwatch::{ConfigError, WearwatchError};
use wearwatch_monitor::MonitorError;

/// Fatal errors while starting up.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("AI advisor disabled: set GROQ_API_KEY to enable it")]
    AdvisorDisabled,

    #[error("AI advisor request failed: {0}")]
    Upstream(String),

    #[error("Monitor unavailable")]
    MonitorUnavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::AdvisorDisabled | ApiError::MonitorUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("{}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<MonitorError> for ApiError {
    fn from(e: MonitorError) -> Self {
        match e {
            MonitorError::InvalidPlan(_) => ApiError::BadRequest(e.to_string()),
            MonitorError::ClearWhileRunning
            | MonitorError::AlreadyRunning
            | MonitorError::NotRunning => {
                ApiError::Conflict(e.to_string())
            }
            MonitorError::RunnerClosed => ApiError::MonitorUnavailable,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<WearwatchError> for ApiError {
    fn from(e: WearwatchError) -> Self {
        match e {
            WearwatchError::Input(_) => ApiError::BadRequest(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}
