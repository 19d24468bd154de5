// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! terminal-agent command line

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Color;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use terminal_agent::config::AppConfig;
use terminal_agent::executor::{show_plan, DialoguerConfirm, Executor};
use terminal_agent::ollama::OllamaClient;
use terminal_agent::planner;
use terminal_agent::prompts::PromptSet;
use terminal_agent::render::panel;
use terminal_agent::tools::ToolRegistry;
use terminal_agent::AgentError;

/// Offline terminal agent backed by a local Ollama model
#[derive(Parser, Debug)]
#[command(name = "terminal-agent")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Natural-language file and shell actions via a local model", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "terminal-agent.json", global = true)]
    config: PathBuf,

    /// Model name (overrides config and environment)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question; nothing is executed
    Ask {
        /// The question
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Ask for an action plan, confirm it, and run it
    Do {
        /// What you want done
        #[arg(required = true)]
        query: Vec<String>,

        /// Show the plan without running anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn log_level(cli: &Cli) -> &'static str {
    if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(&cli)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {:?}", cli.config))?;
    config.apply_env();
    if let Some(model) = cli.model.clone() {
        config.engine.model = model;
    }

    let client = OllamaClient::new(&config.engine).context("creating Ollama client")?;
    info!("Using model {} at {}", client.model(), client.base_url());

    let prompts = PromptSet::load(&config.prompts.path);

    match cli.command {
        Commands::Ask { query } => run_ask(&client, &prompts, &query.join(" ")).await,
        Commands::Do { query, dry_run } => run_do(&config, &client, &prompts, &query.join(" "), dry_run).await,
    }
}

async fn run_ask(client: &OllamaClient, prompts: &PromptSet, query: &str) -> anyhow::Result<()> {
    let answer = planner::ask(client, prompts, query)
        .await
        .context("asking the model")?;
    println!("{}", panel("Answer", answer.trim(), Color::Green));
    Ok(())
}

async fn run_do(
    config: &AppConfig,
    client: &OllamaClient,
    prompts: &PromptSet,
    query: &str,
    dry_run: bool,
) -> anyhow::Result<()> {
    let registry = ToolRegistry::new(config);

    let plan = match planner::get_action_plan(client, prompts, query, &registry.catalogue()).await {
        Ok(plan) => plan,
        Err(AgentError::InvalidPlan(reason)) => {
            warn!("Invalid plan: {}", reason);
            println!(
                "{}",
                panel("Plan Error", "Could not generate a valid action plan. Try rephrasing.", Color::Red)
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("requesting an action plan"),
    };

    if dry_run {
        show_plan(&plan, true);
        return Ok(());
    }

    let executor = Executor::new(&registry, client, prompts, &DialoguerConfirm, config);
    let report = executor.execute_plan(&plan).await.context("running the plan")?;
    debug!("Execution report: {:?}", report);

    Ok(())
}
