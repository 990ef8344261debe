mod config;
mod logging;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use rand::Rng;
use thiserror::Error;
use tracing::info;

use omniseed_core::Catalog;
use omniseed_load::{MemorySink, PostgresSink, Sink};
use omniseed_pipeline::{Pipeline, PipelineOptions, RunError};

use config::{FileConfig, load_file};

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("sink error: {0}")]
    Sink(#[from] omniseed_load::LoadError),
    #[error("run finished with failures; see run_report.json in the output directory")]
    RunFailed,
}

#[derive(Parser, Debug)]
#[command(
    name = "omniseed",
    version,
    about = "Synthesize the omniship dataset and bulk-load it into PostgreSQL"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate partition artifacts and load them into the destination.
    Run(RunArgs),
    /// Generate partition artifacts only, leaving them in the output
    /// directory.
    Generate(RunArgs),
    /// List catalog tables with default sizes and dependencies.
    Tables,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// TOML configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Destination connection string (postgres://...).
    #[arg(long)]
    database_url: Option<String>,
    /// Directory for partition artifacts and the run report.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Seed for reproducible sampled generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Concurrent generation workers (CPU-bound pool).
    #[arg(long)]
    gen_workers: Option<usize>,
    /// Concurrent load sessions (sink-bound pool).
    #[arg(long)]
    load_workers: Option<usize>,
    /// Truncate destination tables, dependents first, before loading.
    #[arg(long, default_value_t = false)]
    truncate: bool,
    /// Stop scheduling tables after the first failure.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,
    /// Load into an in-memory sink instead of the database.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args, true).await,
        Command::Generate(args) => run(args, false).await,
        Command::Tables => {
            print_tables();
            Ok(())
        }
    }
}

async fn run(args: RunArgs, load: bool) -> Result<(), CliError> {
    let file = match &args.config {
        Some(path) => load_file(path)?,
        None => FileConfig::default(),
    };

    let catalog = Catalog::builtin();
    let mut sizing = catalog.sizing();
    let mut strategies = BTreeMap::new();
    for (name, table) in &file.tables {
        let Some(entry) = sizing.get_mut(name) else {
            return Err(CliError::InvalidConfig(format!(
                "unknown table '{name}' in [tables]"
            )));
        };
        if let Some(rows) = table.rows {
            entry.rows = rows;
        }
        if let Some(partition_size) = table.partition_size {
            entry.partition_size = partition_size;
        }
        if let Some(strategy) = table.strategy {
            strategies.insert(name.clone(), strategy);
        }
    }

    let run_seed = args
        .seed
        .or(file.seed)
        .unwrap_or_else(|| rand::rng().random());
    let out_dir = args
        .out_dir
        .or(file.out_dir)
        .unwrap_or_else(|| PathBuf::from("data_chunks"));
    let gen_workers = args
        .gen_workers
        .or(file.gen_workers)
        .unwrap_or_else(omniseed_synth::default_workers);
    let load_workers = args
        .load_workers
        .or(file.load_workers)
        .unwrap_or_else(omniseed_synth::default_workers);

    let options = PipelineOptions {
        out_dir,
        gen_workers,
        load_workers,
        run_seed,
        strategies,
        truncate_first: args.truncate || file.truncate_first.unwrap_or(false),
        fail_fast: args.fail_fast || file.fail_fast.unwrap_or(false),
    };

    let sink: Arc<dyn Sink> = if load && !args.dry_run {
        let url = args
            .database_url
            .or(file.database_url)
            .ok_or_else(|| {
                CliError::InvalidConfig(
                    "database_url is required unless --dry-run is set".to_string(),
                )
            })?;
        Arc::new(PostgresSink::connect(&url, load_workers as u32).await?)
    } else {
        if load {
            info!("dry run: loading into an in-memory sink");
        }
        Arc::new(MemorySink::new())
    };

    let pipeline = Pipeline::new(catalog, sizing, sink, options);
    let report = if load {
        pipeline.run().await?
    } else {
        pipeline.generate_only().await?
    };

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::RunFailed)
    }
}

fn print_tables() {
    let catalog = Catalog::builtin();
    for name in catalog.load_order() {
        let Some(table) = catalog.get(name) else {
            continue;
        };
        println!(
            "{:<20} rows={:<10} partition={:<8} depends on [{}]",
            table.name,
            table.default_rows,
            table.default_partition_size,
            table.predecessors.join(", ")
        );
    }
}
