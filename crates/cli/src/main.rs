//! `workflow-designer` CLI entry-point.
//!
//! Available sub-commands:
//! - `validate`    — check an exported workflow JSON file.
//! - `simulate`    — validate, then print the simulated execution log.
//! - `automations` — list the built-in automation catalog.
//! - `serve`       — start the mock backend API.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{AppState, BackendConfig, MockBackend};
use engine::{Graph, ValidationResult};
use nodes::AutomationCatalog;

#[derive(Parser)]
#[command(
    name = "workflow-designer",
    about = "Validate and simulate workflow graphs built in the designer",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workflow JSON file (`{ nodes, edges }`).
    Validate {
        path: PathBuf,
        /// Print the full validation result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Simulate a workflow JSON file and print its execution log.
    Simulate {
        path: PathBuf,
        /// Simulate even when validation fails.
        #[arg(long)]
        force: bool,
        /// Print the steps as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the automations available to Automated steps.
    Automations,
    /// Start the mock backend API server.
    Serve {
        #[arg(long, env = "WORKFLOW_BIND", default_value = "127.0.0.1:8080")]
        bind: String,
        /// Artificial latency for `GET /automations`, in milliseconds.
        #[arg(long, env = "WORKFLOW_AUTOMATIONS_DELAY_MS", default_value_t = 300)]
        automations_delay_ms: u64,
        /// Artificial latency for `POST /simulate`, in milliseconds.
        #[arg(long, env = "WORKFLOW_SIMULATE_DELAY_MS", default_value_t = 600)]
        simulate_delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path, json } => {
            let graph = load(&path)?;
            let result = engine::validate_graph(&graph);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                report(&result);
            }
            Ok(exit_code(result.ok))
        }
        Command::Simulate { path, force, json } => {
            let graph = load(&path)?;
            let validation = engine::validate_graph(&graph);

            if !validation.ok {
                report(&validation);
                if !force {
                    eprintln!("Validation failed; fix errors before simulating (or pass --force).");
                    return Ok(ExitCode::FAILURE);
                }
            }

            let simulation = engine::simulate(&graph);
            if json {
                println!("{}", serde_json::to_string_pretty(&simulation)?);
            } else {
                for (n, step) in simulation.steps.iter().enumerate() {
                    println!("{:>3}. [{}] {}: {}", n + 1, step.node_id, step.title, step.message);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Automations => {
            for automation in AutomationCatalog::builtin().iter() {
                println!(
                    "{:<14} {:<18} params: {}",
                    automation.id,
                    automation.label,
                    automation.params.join(", ")
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve { bind, automations_delay_ms, simulate_delay_ms } => {
            let config = BackendConfig {
                automations_delay: Duration::from_millis(automations_delay_ms),
                simulate_delay: Duration::from_millis(simulate_delay_ms),
                ..BackendConfig::default()
            };
            info!("Starting mock backend on {bind} ({config:?})");

            let state = AppState::new(MockBackend::new(AutomationCatalog::builtin(), config));
            api::serve(&bind, state).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(path: &Path) -> Result<Graph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    Graph::from_json(&content).with_context(|| format!("cannot load workflow {}", path.display()))
}

fn report(result: &ValidationResult) {
    if result.ok {
        println!("✅ Workflow is valid.");
        return;
    }
    eprintln!("❌ Validation failed with {} error(s):", result.errors.len());
    for error in &result.errors {
        match &error.node_id {
            Some(id) => eprintln!("  - [{id}] {error}"),
            None => eprintln!("  - {error}"),
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
