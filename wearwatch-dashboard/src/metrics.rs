// Wearwatch Dashboard - Predictive maintenance dashboard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Prometheus metrics for the dashboard.
//!
//! Monitor gauges mirror the latest published [`MonitorView`]; counters
//! track manual scoring and advisor usage.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, CounterVec, Encoder, Gauge, GaugeVec,
    TextEncoder,
};
use tokio::sync::watch;
use tracing::warn;
use wearwatch::RiskStatus;
use wearwatch_monitor::{EventKind, MonitorView, RunState};

lazy_static! {
    // ============================================================
    // Live monitoring (from MonitorView)
    // ============================================================

    /// Failure probability of the latest reading.
    pub static ref FAILURE_PROBABILITY: Gauge = register_gauge!(
        "wearwatch_failure_probability",
        "Failure probability of the latest monitored reading (0-1)"
    ).expect("metric can be registered");

    /// Status badge of the latest reading.
    /// Values: 0 = OK, 1 = High risk, 2 = Critical
    pub static ref RISK_STATUS: Gauge = register_gauge!(
        "wearwatch_risk_status",
        "Status of the latest reading (0=OK, 1=High risk, 2=Critical)"
    ).expect("metric can be registered");

    pub static ref AVERAGE_RISK: Gauge = register_gauge!(
        "wearwatch_average_risk",
        "Mean failure probability over the session history"
    ).expect("metric can be registered");

    pub static ref MAX_RISK: Gauge = register_gauge!(
        "wearwatch_max_risk",
        "Maximum failure probability over the session history"
    ).expect("metric can be registered");

    pub static ref STEPS: Gauge = register_gauge!(
        "wearwatch_monitor_steps",
        "Readings stored in the session history"
    ).expect("metric can be registered");

    /// Session events by kind (reset by a clear).
    pub static ref EVENTS: GaugeVec = register_gauge_vec!(
        "wearwatch_monitor_events",
        "Events in the session history by kind",
        &["kind"]
    ).expect("metric can be registered");

    /// Whether a run is active (1 = running, 0 = idle).
    pub static ref RUNNING: Gauge = register_gauge!(
        "wearwatch_monitor_running",
        "Monitoring run state (1=running, 0=idle)"
    ).expect("metric can be registered");

    pub static ref RUN_PROGRESS: Gauge = register_gauge!(
        "wearwatch_monitor_progress",
        "Fraction of the current run's step budget completed (0-1)"
    ).expect("metric can be registered");

    pub static ref MACHINE_LOAD: Gauge = register_gauge!(
        "wearwatch_machine_load",
        "Simulated machine load (0-1)"
    ).expect("metric can be registered");

    pub static ref TOOL_WEAR: Gauge = register_gauge!(
        "wearwatch_tool_wear_minutes",
        "Simulated tool wear in minutes"
    ).expect("metric can be registered");

    // ============================================================
    // Requests
    // ============================================================

    /// Manual what-if assessments by outcome label.
    pub static ref MANUAL_SCORES_TOTAL: CounterVec = register_counter_vec!(
        "wearwatch_manual_scores_total",
        "Manual what-if assessments",
        &["label"]
    ).expect("metric can be registered");

    /// Advisor calls by kind and outcome.
    pub static ref ADVISOR_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "wearwatch_advisor_requests_total",
        "Advisor requests by kind and outcome",
        &["kind", "outcome"]
    ).expect("metric can be registered");
}

fn status_value(status: RiskStatus) -> f64 {
    match status {
        RiskStatus::Ok => 0.0,
        RiskStatus::HighRisk => 1.0,
        RiskStatus::Critical => 2.0,
    }
}

/// Update monitor gauges from a published view.
pub fn update_monitor_metrics(view: &MonitorView) {
    FAILURE_PROBABILITY.set(view.latest.map(|r| r.failure_prob).unwrap_or(0.0));
    RISK_STATUS.set(
        view.status
            .as_ref()
            .map(|s| status_value(s.status))
            .unwrap_or(0.0),
    );
    AVERAGE_RISK.set(view.summary.average_risk.unwrap_or(0.0));
    MAX_RISK.set(view.summary.max_risk.unwrap_or(0.0));
    STEPS.set(view.summary.total_steps as f64);
    EVENTS
        .with_label_values(&[EventKind::HighRisk.as_str()])
        .set(view.summary.high_risk_events as f64);
    EVENTS
        .with_label_values(&[EventKind::SuddenSpike.as_str()])
        .set(view.summary.spike_events as f64);
    RUNNING.set(if view.run_state == RunState::Running {
        1.0
    } else {
        0.0
    });
    RUN_PROGRESS.set(view.progress.fraction());
    MACHINE_LOAD.set(view.load);
    TOOL_WEAR.set(view.wear);
}

/// Increment the manual assessment counter.
pub fn record_manual_score(high_risk: bool) {
    let label = if high_risk { "high_risk" } else { "healthy" };
    MANUAL_SCORES_TOTAL.with_label_values(&[label]).inc();
}

/// Increment the advisor request counter.
pub fn record_advisor_request(kind: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    ADVISOR_REQUESTS_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
}

/// Keep monitor gauges in step with the runner until it shuts down.
pub async fn track_monitor(mut views: watch::Receiver<MonitorView>) {
    update_monitor_metrics(&views.borrow_and_update().clone());
    while views.changed().await.is_ok() {
        let view = views.borrow_and_update().clone();
        update_monitor_metrics(&view);
    }
}

/// Encode all metrics to Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
