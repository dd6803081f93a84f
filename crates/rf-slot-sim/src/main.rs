//! Batch spin simulator
//!
//! Usage:
//!   rf-slot-sim                          - 100k spins on the demo machine
//!   rf-slot-sim --config machine.yaml    - spin an authored machine
//!   rf-slot-sim --spins 1000000 --seed 7 - reproducible long run
//!   rf-slot-sim --json                   - machine-readable report

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use rf_slot_core::{ConfigParser, MachineConfig, SessionStats, SlotMachine};

#[derive(Parser)]
#[command(name = "rf-slot-sim", about = "Slot machine batch simulator")]
struct Cli {
    /// Machine config (.json, .yaml or .yml); the demo machine if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of spins
    #[arg(short, long, default_value_t = 100_000)]
    spins: u64,

    /// RNG seed (overrides the config seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Credit cost per spin (overrides the config)
    #[arg(short, long)]
    bet: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Simulation report
#[derive(Serialize)]
struct Report {
    machine: String,
    spins: u64,
    seed: Option<u64>,
    rtp: f64,
    hit_rate: f64,
    elapsed_ms: u128,
    stats: SessionStats,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.spins == 0 {
        bail!("--spins must be at least 1");
    }

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(bet) = cli.bet {
        config.credit_cost = bet;
    }

    let mut machine = SlotMachine::from_config(&config).context("invalid machine config")?;
    log::info!("running {} spins on '{}'", cli.spins, machine.name());

    let start = Instant::now();
    for n in 0..cli.spins {
        machine
            .spin()
            .with_context(|| format!("spin {} failed", n + 1))?;
    }
    let elapsed = start.elapsed();

    let stats = machine.stats().clone();
    let report = Report {
        machine: machine.name().to_string(),
        spins: cli.spins,
        seed: config.seed,
        rtp: stats.rtp(),
        hit_rate: stats.hit_rate(),
        elapsed_ms: elapsed.as_millis(),
        stats,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<MachineConfig> {
    match path {
        Some(path) => ConfigParser::new()
            .load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(MachineConfig::demo()),
    }
}

fn print_report(report: &Report) {
    let stats = &report.stats;
    println!("Machine:    {}", report.machine);
    if let Some(seed) = report.seed {
        println!("Seed:       {}", seed);
    }
    println!("Spins:      {} ({} ms)", report.spins, report.elapsed_ms);
    println!("Total bet:  {}", stats.total_bet);
    println!("Total win:  {}", stats.total_win);
    println!("RTP:        {:.2}%", report.rtp);
    println!("Hit rate:   {:.2}%", report.hit_rate);
    println!("Line wins:  {}", stats.line_wins);
    println!("Group wins: {}", stats.group_wins);
    println!("Max win:    {}", stats.max_win);
}
