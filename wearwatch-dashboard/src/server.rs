// Wearwatch Dashboard - Predictive maintenance dashboard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! HTTP routes.

use crate::advisor::AdvisorClient;
use crate::error::ApiError;
use crate::metrics::{encode_metrics, record_advisor_request, record_manual_score};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use wearwatch::{assess, FeatureMap, ManualInput, Reading, RiskAssessment, Scorer};
use wearwatch_monitor::{
    Event, MonitorHandle, MonitorView, RiskSeries, RunPlan, RunProgress, RunState,
    SensorTrend, SessionSummary, StatusLine, EXPORT_FILE_NAME,
};
use wearwatch_sim::Scenario;

pub const ADVISOR_NOTICE: &str = "Set GROQ_API_KEY to enable AI recommendations.";

/// Application state shared across handlers.
pub struct AppState {
    pub scorer: Scorer,
    pub monitor: MonitorHandle,
    pub advisor: Option<AdvisorClient>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(scorer: Scorer, monitor: MonitorHandle, advisor: Option<AdvisorClient>) -> Self {
        Self {
            scorer,
            monitor,
            advisor,
            start_time: Instant::now(),
        }
    }
}

/// Build the dashboard router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/score", post(score_handler))
        .route("/api/report", post(report_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/monitor/start", post(start_handler))
        .route("/api/monitor/stop", post(stop_handler))
        .route("/api/monitor/clear", post(clear_handler))
        .route("/api/monitor/status", get(status_handler))
        .route("/api/monitor/series", get(series_handler))
        .route("/api/monitor/export.csv", get(export_handler))
        .with_state(state)
}

/// Root handler - shows a simple HTML page.
async fn root_handler() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Wearwatch</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }
        h1 { color: #2c3e50; }
        a { color: #3498db; text-decoration: none; }
        .endpoints { background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0; }
        .endpoint { margin: 10px 0; }
        code { background: #e9ecef; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>Wearwatch</h1>
    <p>Predictive maintenance assistant: failure risk scoring, live monitoring and an AI advisor.</p>

    <div class="endpoints">
        <h2>Failure Risk Calculator</h2>
        <div class="endpoint"><code>POST /api/score</code> - What-if assessment of a machine snapshot</div>
        <div class="endpoint"><code>POST /api/report</code> - Assessment plus AI maintenance report</div>
        <div class="endpoint"><code>POST /api/chat</code> - Ask the maintenance expert</div>
    </div>

    <div class="endpoints">
        <h2>Live Monitoring</h2>
        <div class="endpoint"><code>POST /api/monitor/start</code> - Start a run (scenario, steps, delay)</div>
        <div class="endpoint"><code>POST /api/monitor/stop</code> - Stop the active run</div>
        <div class="endpoint"><code>POST /api/monitor/clear</code> - Clear history (idle only)</div>
        <div class="endpoint"><a href="/api/monitor/status">/api/monitor/status</a> - Status, summary and last events</div>
        <div class="endpoint"><a href="/api/monitor/series">/api/monitor/series</a> - Chart series</div>
        <div class="endpoint"><a href="/api/monitor/export.csv">/api/monitor/export.csv</a> - Download monitoring data</div>
    </div>

    <div class="endpoints">
        <div class="endpoint"><a href="/metrics">/metrics</a> - Prometheus metrics</div>
        <div class="endpoint"><a href="/health">/health</a> - Health check</div>
    </div>
</body>
</html>"#,
    )
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Metrics handler - returns Prometheus text format.
async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        encode_metrics(),
    )
}

// ============================================================
// Failure risk calculator
// ============================================================

/// Manual assessment response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub headline: String,
    pub assessment: RiskAssessment,
    pub temp_delta: f64,
    pub power_est: f64,
    pub features: FeatureMap,
}

fn score(state: &AppState, input: &ManualInput) -> Result<ScoreResponse, ApiError> {
    let result = assess(&state.scorer, input)?;
    record_manual_score(result.assessment.is_high_risk());
    Ok(ScoreResponse {
        headline: result.assessment.headline().to_string(),
        assessment: result.assessment,
        temp_delta: result.temp_delta,
        power_est: result.power_est,
        features: result.features,
    })
}

async fn score_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ManualInput>,
) -> Result<Json<ScoreResponse>, ApiError> {
    Ok(Json(score(&state, &input)?))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub score: ScoreResponse,
    /// AI maintenance report, when the advisor is available.
    pub report: Option<String>,
    /// Why no report was produced.
    pub notice: Option<String>,
}

/// Assessment plus advisor report; the assessment never depends on the advisor.
async fn report_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ManualInput>,
) -> Result<Json<ReportResponse>, ApiError> {
    let score = score(&state, &input)?;

    let (report, notice) = match &state.advisor {
        None => (None, Some(ADVISOR_NOTICE.to_string())),
        Some(advisor) => {
            let result = advisor
                .maintenance_report(
                    &score.features,
                    score.assessment.label,
                    score.assessment.probability,
                )
                .await;
            record_advisor_request("report", result.is_ok());
            match result {
                Ok(text) => (Some(text), None),
                Err(e) => {
                    warn!("Maintenance report failed: {}", e);
                    (None, Some(format!("AI report unavailable: {}", e)))
                }
            }
        }
    };

    Ok(Json(ReportResponse {
        score,
        report,
        notice,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let advisor = state.advisor.as_ref().ok_or(ApiError::AdvisorDisabled)?;
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Please enter a question first.".to_string(),
        ));
    }

    let result = advisor
        .answer(state.scorer.schema().names(), &request.question)
        .await;
    record_advisor_request("chat", result.is_ok());
    Ok(Json(ChatResponse { answer: result? }))
}

// ============================================================
// Live monitoring
// ============================================================

/// Event list row; `risk_percent` is rounded to one decimal.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(flatten)]
    pub event: Event,
    pub risk_percent: f64,
}

impl From<Event> for EventEntry {
    fn from(event: Event) -> Self {
        Self {
            risk_percent: event.risk_percent(),
            event,
        }
    }
}

/// Monitor status payload (the view without chart series).
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub run_state: RunState,
    pub scenario: Option<Scenario>,
    pub progress: RunProgress,
    pub progress_percent: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub load: f64,
    pub wear: f64,
    pub latest: Option<Reading>,
    pub status: Option<StatusLine>,
    pub summary: SessionSummary,
    pub events: Vec<EventEntry>,
    pub last_error: Option<String>,
    pub advisor_enabled: bool,
    pub uptime_secs: u64,
}

impl MonitorStatus {
    fn from_view(view: MonitorView, state: &AppState) -> Self {
        Self {
            run_state: view.run_state,
            scenario: view.scenario,
            progress_percent: view.progress.fraction() * 100.0,
            progress: view.progress,
            started_at: view.started_at,
            load: view.load,
            wear: view.wear,
            latest: view.latest,
            status: view.status,
            summary: view.summary,
            events: view
                .recent_events
                .into_iter()
                .map(EventEntry::from)
                .collect(),
            last_error: view.last_error,
            advisor_enabled: state.advisor.is_some(),
            uptime_secs: state.start_time.elapsed().as_secs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartResponse {
    /// `false` when a run was already active.
    pub started: bool,
    pub monitor: MonitorStatus,
}

async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(plan): Json<RunPlan>,
) -> Result<Json<StartResponse>, ApiError> {
    let started = state.monitor.start(plan).await?;
    if started {
        info!("Run requested: {} x{}", plan.scenario, plan.steps);
    }
    Ok(Json(StartResponse {
        started,
        monitor: MonitorStatus::from_view(state.monitor.view(), &state),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StopResponse {
    /// `false` when no run was active.
    pub stopped: bool,
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<StopResponse>, ApiError> {
    let stopped = state.monitor.stop().await?;
    Ok(Json(StopResponse { stopped }))
}

async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.monitor.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<MonitorStatus> {
    Json(MonitorStatus::from_view(state.monitor.view(), &state))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub risk: RiskSeries,
    pub sensors: SensorTrend,
}

async fn series_handler(State(state): State<Arc<AppState>>) -> Json<SeriesResponse> {
    let view = state.monitor.view();
    Json(SeriesResponse {
        risk: view.risk_series,
        sensors: view.sensor_trend,
    })
}

async fn export_handler(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let csv = state.monitor.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    ))
}
