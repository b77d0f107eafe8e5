// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Background runner: a single tokio task owns the session.
//!
//! Control requests arrive over an mpsc channel and are applied one at a
//! time between steps, so `start`/`stop`/`clear` never interleave with a
//! step in progress. After every step and transition the task publishes a
//! fresh [`MonitorView`] on a watch channel.
//!
//! The inter-step delay is raced against incoming commands: a `stop`
//! received while sleeping takes effect before the next step.

use crate::config::RunPlan;
use crate::error::{MonitorError, Result};
use crate::session::MonitorSession;
use crate::summary::MonitorView;
use rand::Rng;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

const COMMAND_BUFFER: usize = 32;

/// Control request for the runner task.
#[derive(Debug)]
enum Command {
    Start {
        plan: RunPlan,
        reply: oneshot::Sender<Result<bool>>,
    },
    Stop {
        reply: oneshot::Sender<bool>,
    },
    Clear {
        reply: oneshot::Sender<Result<()>>,
    },
    Export {
        reply: oneshot::Sender<Result<String>>,
    },
}

/// Cloneable handle to a running monitor.
///
/// Dropping every handle shuts the runner down.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    commands: mpsc::Sender<Command>,
    views: watch::Receiver<MonitorView>,
}

impl MonitorHandle {
    /// Start a run. `Ok(false)` when one is already active.
    pub async fn start(&self, plan: RunPlan) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Start { plan, reply }).await?;
        rx.await.map_err(|_| MonitorError::RunnerClosed)?
    }

    /// Stop the active run. `Ok(false)` when already idle.
    pub async fn stop(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stop { reply }).await?;
        rx.await.map_err(|_| MonitorError::RunnerClosed)
    }

    /// Clear history; fails with [`MonitorError::ClearWhileRunning`] during a run.
    pub async fn clear(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Clear { reply }).await?;
        rx.await.map_err(|_| MonitorError::RunnerClosed)?
    }

    /// Full history as CSV text.
    pub async fn export_csv(&self) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Export { reply }).await?;
        rx.await.map_err(|_| MonitorError::RunnerClosed)?
    }

    /// Latest published view.
    pub fn view(&self) -> MonitorView {
        self.views.borrow().clone()
    }

    /// Receiver notified after every step and transition.
    pub fn subscribe(&self) -> watch::Receiver<MonitorView> {
        self.views.clone()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| MonitorError::RunnerClosed)
    }
}

/// Spawn the runner task on the current tokio runtime.
pub fn spawn<R>(session: MonitorSession, rng: R) -> (MonitorHandle, JoinHandle<()>)
where
    R: Rng + Send + 'static,
{
    let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
    let (views_tx, views_rx) = watch::channel(session.view());
    let task = tokio::spawn(run_loop(session, rng, commands_rx, views_tx));
    (
        MonitorHandle {
            commands: commands_tx,
            views: views_rx,
        },
        task,
    )
}

async fn run_loop<R: Rng>(
    mut session: MonitorSession,
    mut rng: R,
    mut commands: mpsc::Receiver<Command>,
    views: watch::Sender<MonitorView>,
) {
    info!("Monitor runner started");

    'outer: loop {
        if !session.is_running() {
            match commands.recv().await {
                Some(command) => apply(&mut session, command, &views),
                None => break,
            }
            continue;
        }

        match session.step(&mut rng) {
            Ok(outcome) => {
                debug!("{}", outcome.reading);
                for event in &outcome.events {
                    info!("Event at step {}: {}", event.time, event.kind);
                }
            }
            Err(e) => error!("Monitoring run aborted: {}", e),
        }
        views.send_replace(session.view());

        if !session.is_running() {
            continue;
        }

        // Yield point: sleep, but keep serving commands.
        let delay = sleep(session.delay());
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = &mut delay => break,
                command = commands.recv() => match command {
                    Some(command) => {
                        apply(&mut session, command, &views);
                        if !session.is_running() {
                            break;
                        }
                    }
                    None => break 'outer,
                },
            }
        }
    }

    info!("Monitor runner stopped");
}

// Publish before replying so callers observe the new state.
fn apply(session: &mut MonitorSession, command: Command, views: &watch::Sender<MonitorView>) {
    match command {
        Command::Start { plan, reply } => {
            let result = session.start(plan);
            views.send_replace(session.view());
            let _ = reply.send(result);
        }
        Command::Stop { reply } => {
            let stopped = session.stop();
            views.send_replace(session.view());
            let _ = reply.send(stopped);
        }
        Command::Clear { reply } => {
            let result = session.clear();
            views.send_replace(session.view());
            let _ = reply.send(result);
        }
        Command::Export { reply } => {
            let _ = reply.send(session.export_csv());
        }
    }
}
