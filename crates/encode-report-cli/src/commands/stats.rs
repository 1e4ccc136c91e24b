//! Statistics command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use encode_report::{FrameRecord, FrameStats, FrameType, PsnrSample, RunSummary, SummaryAccumulator};
use encode_report::import::FrameLogReader;
use log::debug;

pub fn run(input: PathBuf, by_type: bool, input_fps: f64) -> Result<()> {
    debug!("Loading frame log from: {}", input.display());

    let records = FrameLogReader::new()
        .read_path(&input)
        .with_context(|| format!("Failed to read frame log {}", input.display()))?;

    let summary = summarize(&records, input_fps);

    println!("Frames: {}", records.len());
    println!("Bitrate: {:.2} kb/s at {} fps", summary.bitrate_kbps, input_fps);
    if let Some(p) = summary.global_psnr {
        println!("PSNR Mean Y:{:.3} U:{:.3} V:{:.3} Avg:{:.3}", p.y, p.u, p.v, p.avg);
    }
    if let Some(ssim) = summary.global_ssim {
        println!("SSIM Mean: {:.6}", ssim);
    }

    if by_type {
        println!();
        print_by_type(&summary);
    }

    Ok(())
}

fn print_by_type(summary: &RunSummary) {
    println!("Statistics by Frame Type:");
    println!("{:-<48}", "");
    println!("{:<6} {:>8} {:>10} {:>12} {:>8}", "Type", "Frames", "Avg QP", "Avg Size", "Y PSNR");
    println!("{:-<48}", "");

    for frame_type in FrameType::ALL {
        let group = summary.for_type(frame_type);
        if group.count == 0 {
            continue;
        }
        let psnr = group
            .psnr
            .map_or_else(|| "-".to_string(), |p| format!("{:.2}", p.y));
        println!(
            "{:<6} {:>8} {:>10.2} {:>12.0} {:>8}",
            frame_type.letter(), group.count, group.qp_avg, group.size_avg, psnr
        );
    }
}

/// Rebuild frame snapshots from the logged columns and aggregate them.
fn summarize(records: &[FrameRecord], input_fps: f64) -> RunSummary {
    let mut totals = SummaryAccumulator::new();
    for record in records {
        totals.push(&to_frame(record));
    }
    totals.finish(Duration::ZERO, input_fps)
}

fn to_frame(record: &FrameRecord) -> FrameStats {
    let mut frame = FrameStats::new(
        record.encode_order,
        record.poc,
        record.frame_type,
        record.qp_avg,
        record.size_bytes,
    );
    frame.psnr = match (
        record.number("Y PSNR"),
        record.number("U PSNR"),
        record.number("V PSNR"),
        record.number("YUV PSNR"),
    ) {
        (Some(y), Some(u), Some(v), Some(avg)) => Some(PsnrSample { y, u, v, avg }),
        _ => None,
    };
    frame.ssim = record.number("SSIM");
    frame.rate_factor = record.number("RateFactor");
    frame
}
