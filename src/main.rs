//! AgentZero command-line front end
//!
//! Builds an orchestrator with the simulated specialized agents registered,
//! runs one route or workflow call, and prints the envelope as JSON.

use agentzero::agent::specialized::register_simulated_agents;
use agentzero::config::{ConfigError, OrchestratorConfig, DEFAULT_CONFIG_PATHS};
use agentzero::observability::{init_default_logging, init_logging, LogFormat};
use agentzero::platform::EnvCredentialsCheck;
use agentzero::routing::Orchestrator;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

/// Request router and workflow orchestrator for product research agents
#[derive(Parser)]
#[command(name = "agentzero")]
#[command(about = "Route requests to specialized agents or run the research workflow")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route one request to a specialized agent
    Route {
        /// Request text
        text: String,
        /// Conversation id; generated when absent
        #[arg(long)]
        id: Option<String>,
    },
    /// Run the four-stage research workflow
    Workflow {
        /// Research query
        query: String,
    },
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.verbose {
        0 => init_default_logging(),
        verbosity => {
            let level = if verbosity == 1 {
                Level::DEBUG
            } else {
                Level::TRACE
            };
            let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
            init_logging(level, LogFormat::parse(&format), false);
        }
    }

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let succeeded = match cli.command {
        Commands::Config { show } => handle_config_command(&config, show),
        Commands::Route { text, id } => {
            let orchestrator = build_orchestrator(config);
            let result = orchestrator.route(&text, id.as_deref()).await;
            print_envelope(&result) && result.is_success()
        }
        Commands::Workflow { query } => {
            let orchestrator = build_orchestrator(config);
            let outcome = orchestrator.execute_workflow(&query).await;
            print_envelope(&outcome) && outcome.is_success()
        }
    };

    if !succeeded {
        process::exit(1);
    }
}

fn load_configuration(config_path: &Option<PathBuf>) -> Result<OrchestratorConfig, ConfigError> {
    OrchestratorConfig::resolve(config_path.as_deref(), &DEFAULT_CONFIG_PATHS)
}

fn build_orchestrator(config: OrchestratorConfig) -> Orchestrator {
    let orchestrator = Orchestrator::new(config, &EnvCredentialsCheck::new());
    register_simulated_agents(orchestrator.registry());

    if let Some(message) = orchestrator.status_message() {
        error!("{}", message);
    }
    orchestrator
}

fn handle_config_command(config: &OrchestratorConfig, show: bool) -> bool {
    if show {
        match toml::to_string_pretty(config) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                error!("Failed to render configuration: {}", e);
                return false;
            }
        }
    }

    info!("Configuration validation complete");
    true
}

fn print_envelope<T: Serialize>(envelope: &T) -> bool {
    match serde_json::to_string_pretty(envelope) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            false
        }
    }
}
