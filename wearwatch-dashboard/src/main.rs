// Wearwatch Dashboard - Predictive maintenance dashboard
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Wearwatch Dashboard
//!
//! ## Usage
//!
//! ```bash
//! # Serve the dashboard (AI advisor enabled when GROQ_API_KEY is set)
//! wearwatch-dashboard serve --port 8501
//!
//! # Run one monitoring session in the terminal and save it
//! wearwatch-dashboard simulate --scenario high_stress --steps 120 --seed 42 -o run.csv
//! ```

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;
use wearwatch_dashboard::advisor::{self, AdvisorClient, AdvisorConfig};
use wearwatch_dashboard::{
    load_monitor_config, load_scorer, make_rng, metrics, router, AppState, DashboardError,
};
use wearwatch_monitor::{MonitorSession, RunPlan, RunSignal};
use wearwatch_sim::Scenario;

/// Wearwatch predictive maintenance dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP dashboard
    Serve(ServeArgs),
    /// Run one monitoring session without the HTTP surface
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct ArtifactArgs {
    /// Classifier artifact (JSON tree ensemble)
    #[arg(long, default_value = "models/xgb_model.json")]
    model: PathBuf,

    /// Ordered feature names (JSON array)
    #[arg(long, default_value = "models/feature_names.json")]
    schema: PathBuf,

    /// Monitor configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the sensor generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    /// Port to listen on
    #[arg(short, long, default_value = "8501")]
    port: u16,

    /// API key for the advisor; the advisor is disabled without one
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible advisor API
    #[arg(long, default_value = advisor::DEFAULT_BASE_URL)]
    advisor_base_url: String,

    /// Advisor model name
    #[arg(long, default_value = advisor::DEFAULT_MODEL)]
    advisor_model: String,

    /// Advisor request timeout in seconds
    #[arg(long, default_value = "60")]
    advisor_timeout: u64,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    /// Load scenario (normal_operation, increasing_load, high_stress, random_fluctuation)
    #[arg(long, default_value = "normal_operation")]
    scenario: Scenario,

    /// Steps to simulate (20-300)
    #[arg(long, default_value = "80")]
    steps: u32,

    /// Delay between steps in seconds (0.1-3.0)
    #[arg(long, default_value = "0.4")]
    delay: f64,

    /// Sleep for the delay between steps instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write the monitoring data to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match cli.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Wearwatch Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Simulate(args) => match tokio::task::spawn_blocking(move || simulate(args)).await
        {
            Ok(result) => result,
            Err(e) => {
                error!("Simulation task failed: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: ServeArgs) -> Result<(), DashboardError> {
    let artifacts = &args.artifacts;
    let scorer = load_scorer(&artifacts.model, &artifacts.schema)?;
    let config = load_monitor_config(artifacts.config.as_deref())?;

    let session = MonitorSession::new(config, scorer.clone())?;
    let (monitor, _runner) = wearwatch_monitor::spawn(session, make_rng(artifacts.seed));
    tokio::spawn(metrics::track_monitor(monitor.subscribe()));

    let advisor = AdvisorClient::from_config(&AdvisorConfig {
        api_key: args.groq_api_key.clone(),
        base_url: args.advisor_base_url.clone(),
        model: args.advisor_model.clone(),
        timeout: Duration::from_secs(args.advisor_timeout),
    })?;
    match &advisor {
        Some(client) => info!("AI advisor enabled (model {})", client.model()),
        None => warn!("GROQ_API_KEY not set; AI report and chatbot disabled"),
    }

    let state = Arc::new(AppState::new(scorer, monitor, advisor));
    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting server on http://{}", addr);
    info!("Metrics endpoint: http://{}/metrics", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<(), DashboardError> {
    let artifacts = &args.artifacts;
    let scorer = load_scorer(&artifacts.model, &artifacts.schema)?;
    let config = load_monitor_config(artifacts.config.as_deref())?;
    let mut session = MonitorSession::new(config, scorer)?;
    let plan = RunPlan::new(args.scenario, args.steps, args.delay)?;
    let mut rng = make_rng(artifacts.seed);
    let realtime = args.realtime;

    let report = session.run(plan, &mut rng, |outcome, delay| {
        println!("{}  [{}]", outcome.reading, outcome.status.as_str());
        for event in &outcome.events {
            println!("    event: {}", event);
        }
        if realtime {
            std::thread::sleep(delay);
        }
        RunSignal::Continue
    })?;

    let summary = session.view().summary;
    println!();
    println!("Total steps:      {}", summary.total_steps);
    println!(
        "Avg risk:         {:.1}%",
        summary.average_risk.unwrap_or(0.0) * 100.0
    );
    println!(
        "Max risk:         {:.1}%",
        summary.max_risk.unwrap_or(0.0) * 100.0
    );
    println!("High-risk events: {}", summary.high_risk_events);
    println!("Sudden spikes:    {}", summary.spike_events);
    info!("Run finished after {} steps", report.steps);

    if let Some(path) = &args.output {
        session.export_csv_file(path)?;
        info!("Monitoring data written to {}", path.display());
    }
    Ok(())
}
