//! encode-report CLI - encoder CSV statistics tool

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use encode_report::{RateControl, ReportConfig};

mod commands;

/// Write, inspect and summarize encoder CSV statistics logs.
#[derive(Parser)]
#[command(name = "encode-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options that shape the CSV columns.
#[derive(Args, Clone, Copy)]
pub struct ColumnArgs {
    /// Log level (0 = summary only, 1 = per frame, 2 = per frame with energy)
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// PSNR was measured
    #[arg(long)]
    psnr: bool,

    /// SSIM was measured
    #[arg(long)]
    ssim: bool,

    /// Constant-rate-factor mode (adds the RateFactor column)
    #[arg(long)]
    crf: bool,
}

impl ColumnArgs {
    pub fn to_config(self) -> ReportConfig {
        ReportConfig::builder()
            .level(self.level)
            .psnr(self.psnr)
            .ssim(self.ssim)
            .rate_control(if self.crf {
                RateControl::ConstantRateFactor
            } else {
                RateControl::ConstantQp
            })
            .build()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a CSV log from per-frame statistics in JSON
    Replay {
        /// Input JSON file (array of frame statistics)
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file (appended to if it exists)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        columns: ColumnArgs,

        /// Encode time in seconds (defaults to the replay time)
        #[arg(long)]
        elapsed: Option<f64>,

        /// Source frame rate, used for the bitrate
        #[arg(long, default_value_t = 25.0)]
        input_fps: f64,

        /// Skip the summary row
        #[arg(long)]
        no_summary: bool,

        /// Also write the run summary as JSON
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },

    /// Print the CSV header for a column configuration
    Header {
        #[command(flatten)]
        columns: ColumnArgs,
    },

    /// Show statistics for a per-frame CSV log
    Stats {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Break down by frame type
        #[arg(long)]
        by_type: bool,

        /// Source frame rate, used for the bitrate
        #[arg(long, default_value_t = 25.0)]
        input_fps: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Commands::Replay {
            input,
            output,
            columns,
            elapsed,
            input_fps,
            no_summary,
            summary_json,
        } => commands::replay::run(commands::replay::ReplayArgs {
            input,
            output,
            config: columns.to_config(),
            elapsed,
            input_fps,
            summary: !no_summary,
            summary_json,
        }),
        Commands::Header { columns } => commands::header::run(columns.to_config()),
        Commands::Stats { input, by_type, input_fps } => {
            commands::stats::run(input, by_type, input_fps)
        }
    }
}
