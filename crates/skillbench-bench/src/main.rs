use std::path::PathBuf;

use clap::Parser;

use skillbench_bench::analytics::render_table;
use skillbench_bench::config::{BenchmarkConfig, ResolvedOutputs};
use skillbench_bench::logging::init_logging;
use skillbench_bench::runner::ActiveLearningRunner;

/// Active-learning benchmark for match-outcome skill emulators.
#[derive(Debug, Parser)]
#[command(
    name = "skillbench",
    author,
    version,
    about = "Deterministic active-learning skill benchmark"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of acquisition rounds per combination.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the league RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (nothing is run).
    #[arg(long)]
    validate_only: bool,

    /// Log every acquisition step regardless of config.
    #[arg(long)]
    log_steps: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.league.seed = Some(seed);
    }

    if cli.log_steps {
        config.logging.step_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let team_count = config.league.teams.len();
    let combinations = config.emulators.len() * config.acquirers.len();
    let rounds = config.rounds;

    println!(
        "Loaded configuration '{run_id}' with {team_count} teams ({combinations} combination{}, {rounds} rounds each)",
        if combinations == 1 { "" } else { "s" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = ActiveLearningRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: benchmark execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Benchmark complete for '{run_id}': {} runs, {} skipped",
        summary.reports.len(),
        summary.skipped.len()
    );
    print!("{}", render_table(&summary.reports));
    for skipped in &summary.skipped {
        println!(
            "Skipped {} with {}: incompatible emulator kind {:?}",
            skipped.emulator, skipped.acquirer, skipped.kind
        );
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
