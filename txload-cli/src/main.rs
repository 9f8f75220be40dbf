use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use txload_core::{summarize, GenerationConfig, WorkloadGenerator};

/// txload: workload generator for sharded transaction benchmarks
///
/// Produces CSV transaction sequences for an external transaction-processing
/// harness, with configurable read-only / cross-shard mix and Zipfian key
/// skew.
///
/// Example usage:
///   txload generate --ro 30 --cross 40 --skew 0.99 --count 1000 --seed 42
///   txload generate -o /tmp/bench.csv --set-number 2
///   txload run --harness python --harness -u --harness harness.py --env PROMPT_BALANCE=1
#[derive(Parser)]
#[command(name = "txload")]
#[command(version, about = "Sharded transaction workload generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a workload CSV file
    Generate {
        #[command(flatten)]
        workload: WorkloadArgs,
    },

    /// Generate a workload, then launch the external harness on it
    Run {
        #[command(flatten)]
        workload: WorkloadArgs,

        /// Harness command; repeat the flag for each argument. The workload
        /// file path is appended as the final argument.
        #[arg(long = "harness", required = true, value_name = "ARG")]
        harness: Vec<String>,

        /// Extra environment variables for the harness
        #[arg(long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
    },
}

/// Workload generation options, mirroring the external configuration surface.
#[derive(Args, Debug, Clone)]
struct WorkloadArgs {
    /// Percentage of read-only transactions (0-100)
    #[arg(long = "ro", default_value_t = 0.0)]
    ro_percent: f64,

    /// Percentage of cross-shard transactions among read-write (0-100)
    #[arg(long = "cross", default_value_t = 0.0)]
    cross_percent: f64,

    /// Zipfian skew (0 = uniform, larger = stronger hotspots)
    #[arg(long, default_value_t = 0.0)]
    skew: f64,

    /// Number of transactions to generate
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// Number of clusters (shards)
    #[arg(long, default_value_t = 3)]
    clusters: usize,

    /// Nodes per cluster
    #[arg(long = "nodes-per-cluster", default_value_t = 3)]
    nodes_per_cluster: usize,

    /// Total key space, partitioned [1, keys] across shards
    #[arg(long = "keys", default_value_t = 9000)]
    total_keys: u64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Output CSV path
    #[arg(short = 'o', long, default_value = "benchmark.csv")]
    output: PathBuf,

    /// Set number in the output CSV
    #[arg(long = "set-number", default_value_t = 1)]
    set_number: u32,

    /// Write the workload statistics to this path as JSON
    #[arg(long = "stats-json", value_name = "PATH")]
    stats_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Generate { workload } => generate_workload(&workload).map(|_| ()),
        Commands::Run { workload, harness, env } => run_harness(&workload, &harness, &env),
    }
}

/// Map CLI options to a validated config, generate, serialize, and report.
fn generate_workload(args: &WorkloadArgs) -> anyhow::Result<PathBuf> {
    let config = GenerationConfig::from_percentages(
        args.ro_percent,
        args.cross_percent,
        args.skew,
        args.count,
        args.clusters,
        args.nodes_per_cluster,
        args.total_keys,
        args.seed,
    )
    .context("invalid workload parameters")?;

    if let Some(seed) = config.seed {
        tracing::info!("Seed: {} (reproducible mode)", seed);
    }
    tracing::info!(
        "Generating {} transactions: ro={}%, cross={}%, skew={}, clusters={}, keys={}",
        config.count,
        args.ro_percent,
        args.cross_percent,
        config.skew,
        config.clusters,
        config.total_keys
    );

    let mut generator = WorkloadGenerator::new(config)?;
    let batch = generator.generate()?;

    txload_core::writer::write_csv(&batch, generator.nodes(), args.set_number, &args.output)
        .with_context(|| format!("failed to write workload to {}", args.output.display()))?;
    println!("Generated {} transactions to {}", batch.len(), args.output.display());

    let stats = summarize(&batch, generator.shards())?;
    println!();
    print!("{stats}");
    println!("Skew parameter: {}", generator.config().skew);

    if let Some(path) = &args.stats_json {
        let json = serde_json::to_string_pretty(&stats)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write stats to {}", path.display()))?;
        tracing::info!("Statistics written to: {}", path.display());
    }

    Ok(args.output.clone())
}

/// Generate a workload and hand it to the external harness as a subprocess,
/// passing stdio through. Pure plumbing; no retries.
fn run_harness(args: &WorkloadArgs, harness: &[String], env: &[String]) -> anyhow::Result<()> {
    let workload_path = generate_workload(args)?;

    let (program, harness_args) = harness
        .split_first()
        .context("harness command must not be empty")?;

    let mut command = Command::new(program);
    command.args(harness_args).arg(&workload_path);
    for pair in env {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("invalid --env value (expected KEY=VALUE): {pair}"))?;
        command.env(key, value);
    }

    tracing::info!(
        "Launching harness: {} {} {}",
        program,
        harness_args.join(" "),
        workload_path.display()
    );
    let status = command
        .status()
        .with_context(|| format!("failed to launch harness: {program}"))?;

    if !status.success() {
        bail!("harness exited with {status}");
    }
    tracing::info!("Harness completed successfully");
    Ok(())
}
