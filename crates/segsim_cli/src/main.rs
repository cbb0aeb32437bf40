//! segsim CLI
//!
//! Console driver for the log-structured segment simulation.
//!
//! # Commands
//!
//! - `run` - Drive a synthetic workload through the engine and report

mod commands;

use clap::{Parser, Subcommand};
use segsim_workload::Distribution;
use tracing_subscriber::EnvFilter;

/// Log-structured storage simulation tools.
#[derive(Parser)]
#[command(name = "segsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a synthetic workload through the engine and report
    Run {
        /// Number of write requests to generate
        #[arg(short = 'n', long, default_value = "2000")]
        requests: usize,

        /// Request distribution (uniform, hotspot, sequential)
        #[arg(short, long, default_value = "uniform")]
        distribution: Distribution,

        /// Number of requests in a second follow-up batch (0 = none)
        #[arg(long, default_value = "0")]
        more: usize,

        /// Number of segments in the store
        #[arg(long, default_value = "1024")]
        segments: usize,

        /// Byte capacity of each segment
        #[arg(long, default_value = "1024")]
        capacity: usize,

        /// Used-segment ratio that triggers garbage collection
        #[arg(long, default_value = "0.9")]
        gc_threshold: f64,

        /// RNG seed for reproducible workloads
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Print per-segment details for used segments
        #[arg(long)]
        segment_details: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run {
            requests,
            distribution,
            more,
            segments,
            capacity,
            gc_threshold,
            seed,
            segment_details,
            format,
        } => {
            let options = commands::run::Options {
                requests,
                distribution,
                more,
                segments,
                capacity,
                gc_threshold,
                seed,
                segment_details,
                format,
            };
            commands::run::run(&options)?;
        }
        Commands::Version => {
            println!("segsim CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
