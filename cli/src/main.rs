/// apu-cli
///
/// Replays captured APU register traffic through the emulated sound chip and
/// reports what it produced.
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use core_lib::{Apu, ApuConfig, Region, RegisterLog, ReplaySummary};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug output globally (logs every decoded register write)
    #[arg(long, global = true)]
    debug: bool,
    /// Enable verbose output globally (progress and configuration logs)
    #[arg(long, global = true)]
    verbose: bool,
    /// Console region, selecting CPU clock and frame-sequencer timing
    #[arg(long, global = true, value_enum, default_value_t = RegionArg::Ntsc)]
    region: RegionArg,
    /// Output sample rate in Hz
    #[arg(long, global = true, default_value_t = ApuConfig::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RegionArg {
    Ntsc,
    Pal,
}

impl From<RegionArg> for Region {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Ntsc => Self::Ntsc,
            RegionArg::Pal => Self::Pal,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a register-write log and summarise the audio produced
    Play {
        /// Path to the register-write log
        #[arg(value_name = "LOG_PATH")]
        log_path: PathBuf,
        /// Extra CPU cycles to run after the last write
        #[arg(long, default_value_t = 0)]
        tail_cycles: u64,
        /// Print the summary and final chip state as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay a register-write log and print the final $4015 status byte
    Status {
        /// Path to the register-write log
        #[arg(value_name = "LOG_PATH")]
        log_path: PathBuf,
        /// Extra CPU cycles to run after the last write
        #[arg(long, default_value_t = 0)]
        tail_cycles: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.verbose);

    let config = ApuConfig::new(cli.region.into(), cli.sample_rate);
    match &cli.command {
        Commands::Play {
            log_path,
            tail_cycles,
            json,
        } => {
            let (apu, summary) = replay(log_path, config, *tail_cycles)?;
            if *json {
                let report = serde_json::json!({
                    "summary": summary,
                    "state": apu.snapshot(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&summary);
            }
        }
        Commands::Status {
            log_path,
            tail_cycles,
        } => {
            let (_, summary) = replay(log_path, config, *tail_cycles)?;
            println!("{:08b}", summary.status);
        }
    }
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over the command-line flags
fn init_tracing(debug: bool, verbose: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load a log from disk and run it through a freshly powered-on APU
fn replay(
    log_path: &Path,
    config: ApuConfig,
    tail_cycles: u64,
) -> anyhow::Result<(Apu, ReplaySummary)> {
    if !log_path.exists() {
        anyhow::bail!("Register log not found: {}", log_path.display());
    }
    let text = std::fs::read_to_string(log_path)
        .with_context(|| format!("Failed to read register log from {}", log_path.display()))?;
    let log = RegisterLog::parse(&text)
        .with_context(|| format!("Failed to parse register log {}", log_path.display()))?;
    debug!(writes = log.len(), "loaded register log");

    let mut apu = Apu::with_config(config).context("Invalid APU configuration")?;
    let summary = log.replay(&mut apu, tail_cycles);
    info!(
        cycles = summary.cycles,
        samples = summary.samples,
        "replay finished"
    );
    Ok((apu, summary))
}

fn print_summary(summary: &ReplaySummary) {
    println!("cycles:  {}", summary.cycles);
    println!("samples: {}", summary.samples);
    println!("peak:    {:.4}", summary.peak);
    println!("status:  {:08b}", summary.status);
}
