//! Deadlock CLI - run deadlock analyses on scenario files
//!
//! Usage:
//!   deadlock-cli analyze scenario.json
//!   deadlock-cli analyze scenario.json --algorithm wait-for --format json
//!   deadlock-cli analyze scenario.json --trace
//!   deadlock-cli validate scenario.json
//!   deadlock-cli graph scenario.json
//!   deadlock-cli config

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use deadlock_core::{
    AllocationGraph, Algorithm, AnalysisOutcome, DeadlockAnalyzer, EngineConfig, Scenario,
    WaitForGraph,
};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "deadlock-cli")]
#[command(about = "Deadlock detection and avoidance analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum number of processes accepted
    #[arg(long, env = "DEADLOCK_MAX_PROCESSES", global = true)]
    max_processes: Option<usize>,

    /// Maximum number of resource types accepted
    #[arg(long, env = "DEADLOCK_MAX_RESOURCES", global = true)]
    max_resources: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an analysis on a scenario file
    Analyze {
        /// Scenario JSON file
        file: PathBuf,

        /// Algorithm: banker, detection, wait-for (defaults to the scenario's)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Print the step-by-step execution trace
        #[arg(long)]
        trace: bool,
    },

    /// Check a scenario file without analyzing it
    Validate {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Print the resource-allocation and wait-for graph edges
    Graph {
        /// Scenario JSON file
        file: PathBuf,
    },

    /// Print the effective engine configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(max) = cli.max_processes {
        config.limits.max_processes = max;
    }
    if let Some(max) = cli.max_resources {
        config.limits.max_resources = max;
    }
    config.validate()?;

    init_tracing(&config);
    let analyzer = DeadlockAnalyzer::new(config);

    match cli.command {
        Commands::Analyze { file, algorithm, format, trace } => {
            cmd_analyze(&analyzer, file, algorithm, &format, trace)?
        }
        Commands::Validate { file } => cmd_validate(&analyzer, file)?,
        Commands::Graph { file } => cmd_graph(&analyzer, file)?,
        Commands::Config => println!("{}", serde_json::to_string_pretty(analyzer.config())?),
    }

    Ok(())
}

fn init_tracing(config: &EngineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deadlock_core={}", config.logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load(file: &PathBuf) -> anyhow::Result<Scenario> {
    Scenario::load(file).with_context(|| format!("failed to load scenario {}", file.display()))
}

fn cmd_analyze(
    analyzer: &DeadlockAnalyzer,
    file: PathBuf,
    algorithm: Option<Algorithm>,
    format: &str,
    trace: bool,
) -> anyhow::Result<()> {
    let scenario = load(&file)?;
    let algorithm = algorithm.unwrap_or(scenario.algorithm);
    let state = scenario.to_state();
    let run = analyzer.run(algorithm, &state)?;

    if format == "json" {
        let output = json!({
            "outcome": run.outcome,
            "metrics": run.metrics,
            "need": state.need(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Algorithm:".bold(), algorithm);
    let verdict = run.outcome.to_string();
    if run.outcome.is_healthy() {
        println!("{}", verdict.green().bold());
    } else {
        println!("{}", verdict.red().bold());
    }

    if trace {
        if let AnalysisOutcome::Banker(report) = &run.outcome {
            println!("\n{}", "Step-by-step execution:".bold());
            print!("{}", report.trace());
        }
    }

    println!("\n{}", "Performance Metrics:".bold());
    println!("  Execution Time:     {:.3}ms", run.metrics.execution_time_ms());
    println!("  Processes Checked:  {}", run.metrics.processes_checked);
    println!("  Resources Analyzed: {}", run.metrics.resources_analyzed);
    println!("  Deadlocked:         {}", run.metrics.deadlocked_count);

    Ok(())
}

fn cmd_validate(analyzer: &DeadlockAnalyzer, file: PathBuf) -> anyhow::Result<()> {
    let scenario = load(&file)?;
    let state = scenario.to_state();

    match analyzer.validate(&state) {
        Ok(valid) => {
            println!(
                "{} {} processes, {} resource types",
                "✓ Valid:".green().bold(),
                valid.process_count(),
                valid.resource_count()
            );
            Ok(())
        }
        Err(err) => {
            println!("{} {}", "✗ Invalid:".red().bold(), err);
            std::process::exit(1);
        }
    }
}

fn cmd_graph(analyzer: &DeadlockAnalyzer, file: PathBuf) -> anyhow::Result<()> {
    let scenario = load(&file)?;
    let state = scenario.to_state();
    let valid = analyzer.validate(&state)?;

    let allocation_graph = AllocationGraph::build(valid);
    let wait_for = WaitForGraph::build(valid);

    println!("{}", "Assignments (resource → process):".bold());
    for edge in &allocation_graph.assignments {
        println!("  R{} → {} ({} units)", edge.resource, edge.process, edge.units);
    }

    println!("{}", "Requests (process → resource):".bold());
    for edge in &allocation_graph.requests {
        println!("  {} → R{} ({} units)", edge.process, edge.resource, edge.units);
    }

    println!("{}", "Wait-for edges:".bold());
    for (from, to) in wait_for.edges() {
        println!("  {} → {}", from, to);
    }

    Ok(())
}
