//! AuctionLab command-line driver
//!
//! Lists the canned experiments, describes what each one would send to
//! the market engine, and runs them end to end:
//! build sweep -> run sessions -> aggregate tapes -> publish report.

use anyhow::{bail, Context};
use auctionlab_engine::{EngineRequest, MarketEngine, SyntheticEngine};
use auctionlab_report::{FileReporter, Reporter};
use auctionlab_sim::{
    EngineConfig, ExperimentPreset, Harness, HarnessConfig, ScenarioCatalog, ScenarioStatus,
    SessionRunner, SimResult,
};
use auctionlab_types::{ArtifactKind, DumpFlags, TraderType};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match dispatch(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(args: Args) -> anyhow::Result<ExitCode> {
    let catalog = ScenarioCatalog::standard();
    let preset = ExperimentPreset::default();

    match args.command {
        Command::List => {
            list(&catalog);
            Ok(ExitCode::SUCCESS)
        }

        Command::Describe { scenario, config } => {
            let config = load_config(config.as_ref())?;
            match scenario {
                None => describe_engine(),
                Some(key) => describe_scenario(&catalog, &preset, &config, &key)?,
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Run(run) => run_scenarios(&catalog, &preset, run),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<HarnessConfig> {
    match path {
        Some(path) => HarnessConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(HarnessConfig::default()),
    }
}

fn list(catalog: &ScenarioCatalog) {
    println!("📋 Experiments:");
    for entry in catalog.entries() {
        let marker = match entry.status() {
            ScenarioStatus::Ready => "  ",
            ScenarioStatus::UnderConstruction => "🚧",
        };
        println!("  {} {:<28} {}", marker, entry.key, entry.title);
        println!("     {}", entry.description);
    }
}

fn describe_engine() {
    println!("🔌 Engine contract");
    println!("  Input: one session config per call, trial_id used as the artifact path prefix");
    println!("  Output: files named <trial_id><suffix>");
    let defaults = DumpFlags::default();
    for kind in ArtifactKind::all() {
        println!(
            "    {:<24} default {}",
            kind.suffix(),
            if defaults.is_enabled(*kind) { "on" } else { "off" }
        );
    }
    println!("  Tape rows: <marker>, <time>, <price>");
    let tags: Vec<&str> = TraderType::all().iter().map(|t| t.tag()).collect();
    println!("  Trader types: {}", tags.join(", "));
}

fn describe_scenario(
    catalog: &ScenarioCatalog,
    preset: &ExperimentPreset,
    config: &HarnessConfig,
    key: &str,
) -> anyhow::Result<()> {
    let sweep = catalog.build(key, preset)?;
    let layout = config.layout();
    let configs = SessionRunner::<SyntheticEngine>::plan_sweep(&config.trial_prefix, &sweep.sessions)?;

    println!("📐 {} ({})", sweep.title, sweep.key);
    println!("  {}", sweep.description);
    println!(
        "  Sessions: {}  schedule changes: {}  timing changes: {}  population changes: {}",
        sweep.session_count(),
        sweep.shape.schedule_changes,
        sweep.shape.timing_changes,
        sweep.shape.population_changes
    );

    // Identical sessions are printed once
    let Some(first) = configs.first() else {
        return Ok(());
    };
    let request = EngineRequest::from_config(first, &layout);
    println!("{}", serde_json::to_string_pretty(&request)?);
    if configs.len() > 1 {
        let ids: Vec<&str> = configs.iter().map(|c| c.trial_id.as_str()).collect();
        println!("  Trial ids: {}", ids.join(", "));
    }
    Ok(())
}

fn run_scenarios(
    catalog: &ScenarioCatalog,
    preset: &ExperimentPreset,
    run: RunArgs,
) -> anyhow::Result<ExitCode> {
    let config = run.apply(load_config(run.config.as_ref())?)?;
    let mut harness = Harness::from_config(&config)?;
    let reporter = FileReporter::new(&config.output_dir);

    let mut failed = Vec::new();
    for key in &run.scenarios {
        match run_one(&mut harness, &reporter, catalog, preset, key) {
            Ok(result) => {
                if run.json {
                    println!("{}", serde_json::to_string_pretty(&result.summary)?);
                } else {
                    print_result(&result);
                }
            }
            Err(e) => {
                error!(scenario = %key, "scenario failed: {:#}", e);
                eprintln!("❌ {}: {:#}", key, e);
                failed.push(key.clone());
            }
        }
    }

    if failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        info!(failed = failed.len(), "finished with failures");
        Ok(ExitCode::FAILURE)
    }
}

fn run_one<R: Reporter>(
    harness: &mut Harness<Box<dyn MarketEngine>>,
    reporter: &R,
    catalog: &ScenarioCatalog,
    preset: &ExperimentPreset,
    key: &str,
) -> anyhow::Result<SimResult> {
    let result = harness.run_scenario(catalog, key, preset)?;
    let report = reporter.publish(&result.scenario_key, &result.title, &result.series)?;
    info!(scenario = %key, hash = %report.series_hash, "published");
    Ok(result)
}

fn print_result(result: &SimResult) {
    let summary = &result.summary;
    println!("\n━━━ {} ━━━", result.title);
    println!("  Sessions: {}", result.trial_ids.len());
    if let Some(baseline) = &result.baseline_trial_id {
        println!("  Baseline: {}", baseline);
    }
    println!("  Records: {}", summary.total_records);
    match (summary.min_price, summary.max_price, summary.mean_price) {
        (Some(lo), Some(hi), Some(mean)) => {
            println!("  Price: {:.1} - {:.1} (mean {:.2})", lo, hi, mean)
        }
        _ => println!("  Price: no trades"),
    }
    println!("  Runtime: {:.2}ms", result.runtime_ms);
}

#[derive(Parser)]
#[command(name = "auctionlab", about = "Experiment harness for a continuous double-auction engine")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List the experiment catalog
    List,

    /// Show the engine contract, or the sessions a scenario would run
    Describe {
        scenario: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run one or more scenarios and publish their reports
    Run(RunArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineKind {
    Synthetic,
    Process,
}

#[derive(clap::Args)]
struct RunArgs {
    #[arg(required = true)]
    scenarios: Vec<String>,

    /// JSON harness config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    engine: Option<EngineKind>,

    /// Engine program followed by its arguments
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    engine_cmd: Vec<String>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Report output directory
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    prefix: Option<String>,

    #[arg(long)]
    with_baseline: bool,

    /// Print summaries as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn apply(&self, mut config: HarnessConfig) -> anyhow::Result<HarnessConfig> {
        if let Some(dir) = &self.artifact_dir {
            config.artifact_dir = dir.clone();
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.trial_prefix = prefix.clone();
        }
        if self.with_baseline {
            config.run_baseline = true;
        }

        match self.engine {
            Some(EngineKind::Synthetic) => {
                config.engine = EngineConfig::Synthetic {
                    seed: self.seed.unwrap_or(42),
                };
            }
            Some(EngineKind::Process) => {
                let Some((program, args)) = self.engine_cmd.split_first() else {
                    bail!("--engine process needs --engine-cmd");
                };
                config.engine = EngineConfig::Process {
                    program: PathBuf::from(program),
                    args: args.to_vec(),
                    working_dir: None,
                };
            }
            None => {
                if let (Some(seed), EngineConfig::Synthetic { seed: current }) =
                    (self.seed, &mut config.engine)
                {
                    *current = seed;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}
