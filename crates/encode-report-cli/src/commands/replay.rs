//! Replay command: per-frame JSON into a CSV log.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use encode_report::{FrameStats, ReportConfig, ReportWriter, RunSummary, SummaryAccumulator};
use log::{info, warn};

pub struct ReplayArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: ReportConfig,
    pub elapsed: Option<f64>,
    pub input_fps: f64,
    pub summary: bool,
    pub summary_json: Option<PathBuf>,
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let frames = load_frames(&args.input)?;
    info!("Loaded {} frames from {}", frames.len(), args.input.display());

    let invocation: Vec<String> = std::env::args().collect();
    let summary = replay(&frames, &args, &invocation)?;

    println!(
        "Wrote {} frames to {} ({:.2} kb/s)",
        frames.len(),
        args.output.display(),
        summary.bitrate_kbps
    );

    if let Some(path) = &args.summary_json {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        println!("Saved summary to: {}", path.display());
    }

    Ok(())
}

fn replay(frames: &[FrameStats], args: &ReplayArgs, invocation: &[String]) -> Result<RunSummary> {
    let start = Instant::now();
    let mut report = ReportWriter::try_open(&args.output, args.config)
        .with_context(|| format!("Failed to open {}", args.output.display()))?;
    let mut totals = SummaryAccumulator::new();

    for frame in frames {
        if let Err(e) = report.write_frame(frame) {
            warn!("Frame {}: {e}", frame.encode_order);
        }
        totals.push(frame);
    }

    let elapsed = match args.elapsed {
        Some(secs) => match Duration::try_from_secs_f64(secs) {
            Ok(elapsed) => elapsed,
            Err(e) => bail!("invalid elapsed time {secs}: {e}"),
        },
        None => start.elapsed(),
    };
    let summary = totals.finish(elapsed, args.input_fps);

    if args.summary {
        report.write_summary(&summary, invocation)
            .with_context(|| format!("Failed to write summary to {}", args.output.display()))?;
    }

    Ok(summary)
}

fn load_frames(path: &Path) -> Result<Vec<FrameStats>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as frame statistics", path.display()))
}
