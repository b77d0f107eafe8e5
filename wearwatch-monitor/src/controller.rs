// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Two-state run controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the stepper loop may advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
        }
    }
}

/// Gates the stepper loop.
///
/// `start` and `stop` tolerate repeated calls; each returns whether it
/// changed the state.
#[derive(Debug, Clone, Default)]
pub struct RunController {
    state: RunState,
    started_at: Option<DateTime<Utc>>,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Start time of the current or most recent run.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Idle → Running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = RunState::Running;
        self.started_at = Some(Utc::now());
        true
    }

    /// Running → Idle.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = RunState::Idle;
        true
    }

    /// Forget the last run's start time.
    pub fn reset(&mut self) {
        if !self.is_running() {
            self.started_at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_stop_idempotent() {
        let mut c = RunController::new();
        assert_eq!(c.state(), RunState::Idle);
        assert!(!c.stop());

        assert!(c.start());
        assert!(!c.start());
        assert!(c.is_running());
        assert!(c.started_at().is_some());

        assert!(c.stop());
        assert!(!c.stop());
        assert_eq!(c.state(), RunState::Idle);
    }

    #[test]
    fn test_reset_only_when_idle() {
        let mut c = RunController::new();
        c.start();
        c.reset();
        assert!(c.started_at().is_some());
        c.stop();
        c.reset();
        assert!(c.started_at().is_none());
    }
}
