// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Monitoring session: one owner for state, history and run control.
//!
//! Each step runs generate → score → append → detect to completion. The
//! latent state is committed only once scoring succeeds, so a failed step
//! leaves no trace besides stopping the run.

use crate::config::{MonitorConfig, RunPlan};
use crate::controller::{RunController, RunState};
use crate::detector::EventDetector;
use crate::error::{MonitorError, Result};
use crate::event::{Event, EventLog};
use crate::export;
use crate::store::RollingStore;
use crate::summary::{
    MonitorView, RiskSeries, RunProgress, SensorTrend, SessionSummary, StatusLine,
};
use rand::Rng;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use wearwatch::{ProductType, Reading, RiskStatus, Scorer};
use wearwatch_sim::{SignalGenerator, SimulationState};

/// Result of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub reading: Reading,
    pub status: RiskStatus,
    /// Events raised by this reading.
    pub events: Vec<Event>,
    /// The step budget is exhausted and the run has stopped.
    pub finished: bool,
}

/// Returned by the pause callback of [`MonitorSession::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSignal {
    Continue,
    Stop,
}

/// How a blocking run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Steps completed by this run.
    pub steps: u32,
    /// `true` when stopped before the budget was exhausted.
    pub stopped_early: bool,
}

/// A monitoring session.
#[derive(Debug)]
pub struct MonitorSession {
    config: MonitorConfig,
    generator: SignalGenerator,
    scorer: Scorer,
    detector: EventDetector,
    state: SimulationState,
    store: RollingStore,
    events: EventLog,
    controller: RunController,
    plan: Option<RunPlan>,
    progress: RunProgress,
    last_error: Option<String>,
}

impl MonitorSession {
    pub fn new(config: MonitorConfig, scorer: Scorer) -> Result<Self> {
        config.validate()?;
        let generator = SignalGenerator::new(config.generator.clone())?;
        let detector = EventDetector::new(&config.thresholds, config.spike.clone());
        Ok(Self {
            state: config.initial_state(),
            config,
            generator,
            scorer,
            detector,
            store: RollingStore::new(),
            events: EventLog::new(),
            controller: RunController::new(),
            plan: None,
            progress: RunProgress::default(),
            last_error: None,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn store(&self) -> &RollingStore {
        &self.store
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn run_state(&self) -> RunState {
        self.controller.state()
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Plan of the active or most recent run.
    pub fn plan(&self) -> Option<&RunPlan> {
        self.plan.as_ref()
    }

    pub fn progress(&self) -> RunProgress {
        self.progress
    }

    /// Pause between steps of the active plan.
    pub fn delay(&self) -> Duration {
        self.plan
            .map(|p| p.delay_duration())
            .unwrap_or_else(|| RunPlan::default().delay_duration())
    }

    /// Begin a run. Returns `false` (and keeps the active plan) if already running.
    pub fn start(&mut self, plan: RunPlan) -> Result<bool> {
        plan.validate()?;
        if !self.controller.start() {
            debug!("start ignored, run already active");
            return Ok(false);
        }
        self.plan = Some(plan);
        self.progress = RunProgress {
            completed: 0,
            planned: plan.steps,
        };
        self.last_error = None;
        info!(
            "Monitoring started: scenario={}, steps={}, delay={}s",
            plan.scenario, plan.steps, plan.delay
        );
        Ok(true)
    }

    /// End the run after the current step. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        let stopped = self.controller.stop();
        if stopped {
            info!(
                "Monitoring stopped after {}/{} steps",
                self.progress.completed, self.progress.planned
            );
        }
        stopped
    }

    /// Reset state and empty history. Rejected while running.
    pub fn clear(&mut self) -> Result<()> {
        if self.controller.is_running() {
            return Err(MonitorError::ClearWhileRunning);
        }
        self.state = self.config.initial_state();
        self.store.clear();
        self.events.clear();
        self.controller.reset();
        self.plan = None;
        self.progress = RunProgress::default();
        self.last_error = None;
        info!("Monitoring history cleared");
        Ok(())
    }

    /// Advance one step of the active run.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepOutcome> {
        let plan = match (self.controller.is_running(), self.plan) {
            (true, Some(plan)) => plan,
            _ => return Err(MonitorError::NotRunning),
        };

        let mut next = self.state;
        let sample = self.generator.next_sample(&mut next, plan.scenario, rng);
        let features = sample.feature_map(ProductType::High);
        let failure_prob = match self.scorer.score(&features) {
            Ok(p) => p,
            Err(e) => {
                warn!("Scoring failed at step {}: {}", self.store.len() + 1, e);
                self.last_error = Some(e.to_string());
                self.controller.stop();
                return Err(e.into());
            }
        };
        self.state = next;

        let reading = *self.store.append(sample, failure_prob);
        let events = self.detector.detect(&self.store);
        for event in &events {
            debug!("Event: {}", event);
        }
        self.events.extend(events.iter().copied());

        self.progress.completed += 1;
        let finished = self.progress.is_exhausted();
        if finished {
            self.controller.stop();
            info!("Monitoring finished: {} steps", self.progress.completed);
        }

        Ok(StepOutcome {
            status: self.config.thresholds.classify(failure_prob),
            reading,
            events,
            finished,
        })
    }

    /// Blocking driver: start `plan` and step until it ends.
    ///
    /// Fails with [`MonitorError::AlreadyRunning`] if another run is active.
    /// `pause` runs after every unfinished step with the plan's delay. It is
    /// the only yield point; returning [`RunSignal::Stop`] ends the run
    /// before the next step.
    pub fn run<R, F>(&mut self, plan: RunPlan, rng: &mut R, mut pause: F) -> Result<RunReport>
    where
        R: Rng + ?Sized,
        F: FnMut(&StepOutcome, Duration) -> RunSignal,
    {
        if !self.start(plan)? {
            return Err(MonitorError::AlreadyRunning);
        }
        let delay = self.delay();
        let mut steps = 0;

        while self.controller.is_running() {
            let outcome = self.step(rng)?;
            steps += 1;
            if outcome.finished {
                return Ok(RunReport {
                    steps,
                    stopped_early: false,
                });
            }
            if pause(&outcome, delay) == RunSignal::Stop {
                self.stop();
            }
        }

        Ok(RunReport {
            steps,
            stopped_early: true,
        })
    }

    /// Snapshot for the presentation surface.
    pub fn view(&self) -> MonitorView {
        let thresholds = &self.config.thresholds;
        MonitorView {
            run_state: self.controller.state(),
            scenario: self.plan.map(|p| p.scenario),
            progress: self.progress,
            started_at: self.controller.started_at(),
            load: self.state.load(),
            wear: self.state.wear(),
            latest: self.store.latest().copied(),
            status: self
                .store
                .latest()
                .map(|r| StatusLine::for_reading(r, thresholds)),
            summary: SessionSummary::compute(&self.store, &self.events),
            recent_events: self.events.recent(self.config.event_display).to_vec(),
            risk_series: RiskSeries::from_store(
                &self.store,
                self.config.chart_window,
                thresholds.risk,
            ),
            sensor_trend: SensorTrend::from_store(&self.store, self.config.chart_window),
            last_error: self.last_error.clone(),
        }
    }

    /// Full history as CSV text.
    pub fn export_csv(&self) -> Result<String> {
        export::to_csv_string(self.store.all())
    }

    /// Write the full history to `path`.
    pub fn export_csv_file(&self, path: impl AsRef<Path>) -> Result<()> {
        export::write_csv_file(path, self.store.all())
    }
}
