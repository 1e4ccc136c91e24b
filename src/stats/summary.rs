//! Run-level aggregate statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{FrameStats, FrameType, PsnrSample};

/// Aggregates for one frame type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTypeSummary {
    /// Number of frames of this type.
    pub count: u64,
    /// Mean average-QP.
    pub qp_avg: f64,
    /// Mean compressed size in bytes.
    pub size_avg: f64,
    /// Mean PSNR (Y, U and V are reported).
    pub psnr: Option<PsnrSample>,
    /// Mean SSIM.
    pub ssim: Option<f64>,
}

/// Aggregate statistics for a complete encode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Wall-clock encode time in seconds.
    pub elapsed_secs: f64,
    /// Encoding speed in frames per second.
    pub fps: f64,
    /// Output bitrate in kbit/s.
    pub bitrate_kbps: f64,
    /// Mean PSNR over all frames.
    pub global_psnr: Option<PsnrSample>,
    /// Mean SSIM over all frames.
    pub global_ssim: Option<f64>,
    /// Breakdown by frame type, indexed by [`FrameType::index`].
    pub per_type: [FrameTypeSummary; 3],
}

impl RunSummary {
    /// Breakdown for one frame type.
    #[must_use]
    pub fn for_type(&self, frame_type: FrameType) -> &FrameTypeSummary {
        &self.per_type[frame_type.index()]
    }

    /// Total number of frames across all types.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.per_type.iter().map(|t| t.count).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MetricSums {
    psnr: PsnrSample,
    psnr_frames: u64,
    ssim: f64,
    ssim_frames: u64,
}

impl MetricSums {
    fn add(&mut self, frame: &FrameStats) {
        if let Some(p) = frame.psnr {
            self.psnr.y += p.y;
            self.psnr.u += p.u;
            self.psnr.v += p.v;
            self.psnr.avg += p.avg;
            self.psnr_frames += 1;
        }
        if let Some(s) = frame.ssim {
            self.ssim += s;
            self.ssim_frames += 1;
        }
    }

    fn psnr_mean(&self) -> Option<PsnrSample> {
        if self.psnr_frames == 0 {
            return None;
        }
        let n = self.psnr_frames as f64;
        Some(PsnrSample {
            y: self.psnr.y / n,
            u: self.psnr.u / n,
            v: self.psnr.v / n,
            avg: self.psnr.avg / n,
        })
    }

    fn ssim_mean(&self) -> Option<f64> {
        (self.ssim_frames > 0).then(|| self.ssim / self.ssim_frames as f64)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TypeSums {
    count: u64,
    qp: f64,
    bytes: u64,
    metrics: MetricSums,
}

/// Folds per-frame statistics into a [`RunSummary`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use encode_report::{FrameStats, FrameType, SummaryAccumulator};
///
/// let mut acc = SummaryAccumulator::new();
/// acc.push(&FrameStats::new(0, 0, FrameType::Intra, 20.0, 5000));
/// acc.push(&FrameStats::new(1, 1, FrameType::Predicted, 24.0, 1000));
///
/// let summary = acc.finish(Duration::from_secs(1), 25.0);
/// assert_eq!(summary.fps, 2.0);
/// assert_eq!(summary.frame_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SummaryAccumulator {
    frames: u64,
    bytes: u64,
    metrics: MetricSums,
    per_type: [TypeSums; 3],
}

impl SummaryAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one frame.
    pub fn push(&mut self, frame: &FrameStats) {
        self.frames += 1;
        self.bytes += frame.size_bytes;
        self.metrics.add(frame);

        let sums = &mut self.per_type[frame.frame_type.index()];
        sums.count += 1;
        sums.qp += frame.qp_avg;
        sums.bytes += frame.size_bytes;
        sums.metrics.add(frame);
    }

    /// Number of frames pushed so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Produce the run summary.
    ///
    /// `elapsed` is the wall-clock encode time and `input_fps` the frame rate
    /// of the source, used to turn total bytes into a bitrate. Rates that
    /// would divide by zero are reported as `0.0`.
    #[must_use]
    pub fn finish(&self, elapsed: Duration, input_fps: f64) -> RunSummary {
        let elapsed_secs = elapsed.as_secs_f64();
        let fps = if elapsed_secs > 0.0 {
            self.frames as f64 / elapsed_secs
        } else {
            0.0
        };

        let bitrate_kbps = if self.frames > 0 && input_fps > 0.0 {
            let duration = self.frames as f64 / input_fps;
            self.bytes as f64 * 8.0 / 1000.0 / duration
        } else {
            0.0
        };

        let per_type = self.per_type.map(|sums| {
            if sums.count == 0 {
                return FrameTypeSummary::default();
            }
            let n = sums.count as f64;
            FrameTypeSummary {
                count: sums.count,
                qp_avg: sums.qp / n,
                size_avg: sums.bytes as f64 / n,
                psnr: sums.metrics.psnr_mean(),
                ssim: sums.metrics.ssim_mean(),
            }
        });

        RunSummary {
            elapsed_secs,
            fps,
            bitrate_kbps,
            global_psnr: self.metrics.psnr_mean(),
            global_ssim: self.metrics.ssim_mean(),
            per_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(order: u32, frame_type: FrameType, qp: f64, size: u64) -> FrameStats {
        FrameStats::new(order, order as i32, frame_type, qp, size)
    }

    #[test]
    fn test_empty_accumulator() {
        let summary = SummaryAccumulator::new().finish(Duration::ZERO, 25.0);
        assert_eq!(summary.fps, 0.0);
        assert_eq!(summary.bitrate_kbps, 0.0);
        assert!(summary.global_psnr.is_none());
        assert!(summary.global_ssim.is_none());
        assert_eq!(summary.frame_count(), 0);
    }

    #[test]
    fn test_per_type_means() {
        let mut acc = SummaryAccumulator::new();
        acc.push(&frame(0, FrameType::Intra, 20.0, 4000));
        acc.push(&frame(1, FrameType::Predicted, 24.0, 1000));
        acc.push(&frame(2, FrameType::Predicted, 26.0, 2000));

        let summary = acc.finish(Duration::from_millis(1500), 30.0);
        assert!((summary.fps - 2.0).abs() < 1e-9);

        let p = summary.for_type(FrameType::Predicted);
        assert_eq!(p.count, 2);
        assert!((p.qp_avg - 25.0).abs() < 1e-9);
        assert!((p.size_avg - 1500.0).abs() < 1e-9);

        assert_eq!(summary.for_type(FrameType::Bidirectional).count, 0);
    }

    #[test]
    fn test_bitrate() {
        // 25 frames at 25 fps is one second; 25 * 500 bytes = 100 kbit.
        let mut acc = SummaryAccumulator::new();
        for i in 0..25 {
            acc.push(&frame(i, FrameType::Predicted, 25.0, 500));
        }
        let summary = acc.finish(Duration::from_secs(5), 25.0);
        assert!((summary.bitrate_kbps - 100.0).abs() < 1e-9);
        assert!((summary.fps - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_metric_means_skip_unmeasured_frames() {
        let mut a = frame(0, FrameType::Intra, 20.0, 100);
        a.psnr = Some(PsnrSample { y: 40.0, u: 44.0, v: 46.0, avg: 41.0 });
        a.ssim = Some(0.98);
        let mut b = frame(1, FrameType::Intra, 20.0, 100);
        b.psnr = Some(PsnrSample { y: 38.0, u: 42.0, v: 44.0, avg: 39.0 });
        let c = frame(2, FrameType::Predicted, 20.0, 100);

        let mut acc = SummaryAccumulator::new();
        for f in [&a, &b, &c] {
            acc.push(f);
        }
        let summary = acc.finish(Duration::from_secs(1), 25.0);

        let psnr = summary.global_psnr.unwrap();
        assert!((psnr.y - 39.0).abs() < 1e-9);
        assert!((psnr.avg - 40.0).abs() < 1e-9);
        assert!((summary.global_ssim.unwrap() - 0.98).abs() < 1e-9);
        assert!(summary.for_type(FrameType::Predicted).psnr.is_none());
        assert!(summary.for_type(FrameType::Intra).psnr.is_some());
    }
}
