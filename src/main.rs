use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use telescope_sim::config::{DEFAULT_DETAILED_REPLICATIONS, DEFAULT_HORIZON, DEFAULT_PRIVILEGE_FEE};
use telescope_sim::{AggregateStatistics, FileLogger, Simulation, SimulationConfig};

/// Telescope access simulator
///
/// Estimates mean waiting times per client class and the revenue from
/// privileged access by averaging independent replications of one
/// operating window.
#[derive(Parser, Debug)]
#[command(name = "telescope_sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of replications
    #[arg(short = 'n', long, default_value = "1000")]
    replications: usize,

    /// Mean service time
    #[arg(short = 's', long, default_value = "1.1")]
    mean_service_time: f64,

    /// Mean time between arrivals
    #[arg(short = 'a', long, default_value = "1.0")]
    mean_interarrival_time: f64,

    /// Length of the operating window
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    horizon: f64,

    /// Fee charged per privileged client served
    #[arg(long, default_value_t = DEFAULT_PRIVILEGE_FEE)]
    fee: f64,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Write per-event logs (logs_<i>.txt) into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Number of leading replications that get an event log
    #[arg(long, default_value_t = DEFAULT_DETAILED_REPLICATIONS)]
    detailed_replications: usize,

    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
}

fn print_report(stats: &AggregateStatistics) {
    println!("=============================  main stats  =============================");
    println!("avgWaitingTime = {} (sd {})", stats.avg_waiting_time, stats.spread.avg_waiting_time);
    println!("priv_avgWaitingTime = {} (sd {})", stats.priv_avg_waiting_time, stats.spread.priv_avg_waiting_time);
    println!("noPriv_avgWaitingTime = {} (sd {})", stats.non_priv_avg_waiting_time, stats.spread.non_priv_avg_waiting_time);
    println!("profitGain = {} (sd {})", stats.profit_gain, stats.spread.profit_gain);
    if stats.degenerate_replications > 0 {
        println!("replications with an empty class = {}", stats.degenerate_replications);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,telescope_sim=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = SimulationConfig::new(args.replications, args.mean_service_time, args.mean_interarrival_time)
        .with_horizon(args.horizon)
        .with_privilege_fee(args.fee)
        .with_detailed_replications(args.detailed_replications);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let sim = Simulation::new(config)?;

    let stats = match args.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let mut logger = FileLogger::new(1024, &dir);
            sim.run_with_sink(&mut logger)?
        }
        None => sim.run(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_report(&stats);
    }
    Ok(())
}
