//! The CSV report writer.

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use log::{debug, trace, warn};

use super::columns::{self, DASH, SEPARATOR, TYPE_GROUP_WIDTH};
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::metrics::ssim_db;
use crate::stats::{FrameStats, FrameType, RunSummary};

/// Writes per-frame rows and a run summary to one CSV stream.
///
/// A writer is either enabled (it owns a sink) or disabled. Every write on a
/// disabled writer succeeds without doing anything, so a log that failed to
/// open never interrupts the encode.
///
/// The writer never closes the stream itself; dropping it flushes and closes
/// the file.
#[derive(Debug)]
pub struct ReportWriter<W: Write = BufWriter<File>> {
    sink: Option<W>,
    config: ReportConfig,
}

impl ReportWriter<BufWriter<File>> {
    /// Open `path` for logging, disabling the writer if that fails.
    ///
    /// A file that did not exist is created and receives the header for
    /// `config`. An existing file is appended to and receives nothing, on
    /// the assumption that an earlier run already wrote a matching header.
    pub fn open(path: impl AsRef<Path>, config: ReportConfig) -> Self {
        let path = path.as_ref();
        match Self::try_open(path, config) {
            Ok(writer) => writer,
            Err(e) => {
                warn!("{e}; CSV logging disabled");
                Self::disabled(config)
            }
        }
    }

    /// Like [`ReportWriter::open`], but reports the failure.
    pub fn try_open(path: impl AsRef<Path>, config: ReportConfig) -> Result<Self> {
        let path = path.as_ref();
        let (file, created) = open_log_file(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "{} CSV log {} (level {})",
            if created { "Created" } else { "Appending to" },
            path.display(),
            config.level
        );

        Self::from_writer(BufWriter::new(file), config, created)
    }
}

impl<W: Write> ReportWriter<W> {
    /// A writer that discards everything.
    #[must_use]
    pub fn disabled(config: ReportConfig) -> Self {
        Self { sink: None, config }
    }

    /// Bind an arbitrary sink.
    ///
    /// `fresh` marks a sink with no prior content; only then is the header
    /// written.
    pub fn from_writer(sink: W, config: ReportConfig, fresh: bool) -> Result<Self> {
        let mut writer = Self {
            sink: Some(sink),
            config,
        };
        if fresh {
            let header = columns::header_line(&writer.config);
            writer.write_line(&header)?;
        }
        Ok(writer)
    }

    /// Whether rows are actually written.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Configuration the header was negotiated with.
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Borrow the sink, if enabled.
    #[must_use]
    pub fn get_ref(&self) -> Option<&W> {
        self.sink.as_ref()
    }

    /// Unwrap the sink, if enabled.
    #[must_use]
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }

    /// Append the row for one completed frame.
    ///
    /// Does nothing when the writer is disabled or the log is summary-only.
    pub fn write_frame(&mut self, frame: &FrameStats) -> Result<()> {
        if self.sink.is_none() || !self.config.level.is_per_frame() {
            return Ok(());
        }
        trace!("CSV row for frame {} (POC {})", frame.encode_order, frame.poc);
        let row = frame_row(&self.config, frame);
        self.write_line(&row.join(SEPARATOR))
    }

    /// Append the summary row, stamped with the current local time.
    ///
    /// `args` is the invocation's argument list and is written verbatim as
    /// the command column.
    pub fn write_summary<S: AsRef<str>>(&mut self, summary: &RunSummary, args: &[S]) -> Result<()> {
        self.write_summary_at(summary, args, &Local::now())
    }

    /// Append the summary row with an explicit timestamp.
    ///
    /// A per-frame log first gets a blank line, a `Summary` marker and the
    /// summary header, so frame rows and the summary can share one file.
    pub fn write_summary_at<S, Tz>(
        &mut self,
        summary: &RunSummary,
        args: &[S],
        timestamp: &DateTime<Tz>,
    ) -> Result<()>
    where
        S: AsRef<str>,
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if self.sink.is_none() {
            return Ok(());
        }

        if self.config.level.is_per_frame() {
            let header = columns::summary_columns().join(SEPARATOR);
            self.write_line(&format!("\nSummary\n{header}"))?;
        }

        let command = args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
        let mut row = vec![command, timestamp.format("%c").to_string()];
        row.extend(summary_row(&self.config, summary));

        debug!(
            "CSV summary: {} frames, {:.2} fps, {:.2} kb/s",
            summary.frame_count(),
            summary.fps,
            summary.bitrate_kbps
        );
        self.write_line(&row.join(SEPARATOR))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            writeln!(sink, "{line}")?;
            sink.flush()?;
        }
        Ok(())
    }
}

/// Create `path` exclusively, or open it for append if it already exists.
///
/// The boolean is `true` when this call created the file.
fn open_log_file(path: &Path) -> io::Result<(File, bool)> {
    match OpenOptions::new().append(true).create_new(true).open(path) {
        Ok(file) => Ok((file, true)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            OpenOptions::new().append(true).open(path).map(|file| (file, false))
        }
        Err(e) => Err(e),
    }
}

fn dashes(n: usize) -> impl Iterator<Item = String> {
    std::iter::repeat_n(DASH.to_string(), n)
}

fn or_dash<T>(value: Option<T>, fmt: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| DASH.to_string(), fmt)
}

/// Cells of one per-frame row, matching [`columns::frame_columns`].
fn frame_row(config: &ReportConfig, frame: &FrameStats) -> Vec<String> {
    let mut row = vec![
        format!("{:4}", frame.encode_order),
        frame.frame_type.letter().to_string(),
        format!("{:3}", frame.poc),
        format!("{:.2}", frame.qp_avg),
        frame.size_bytes.to_string(),
    ];

    if config.has_rate_factor() {
        row.push(or_dash(frame.rate_factor, |rf| format!("{rf:.8}")));
    }

    if config.psnr {
        match frame.psnr {
            Some(p) => row.extend([p.y, p.u, p.v, p.avg].map(|v| format!("{v:.2}"))),
            None => row.extend(dashes(4)),
        }
    }

    if config.ssim {
        match frame.ssim {
            Some(ssim) => {
                row.push(format!("{ssim:.5}"));
                row.push(format!("{:.3}", ssim_db(ssim)));
            }
            None => row.extend(dashes(2)),
        }
    }

    let mut total = 0u64;
    for (_, count) in frame.mb_counts.iter() {
        row.push(count.to_string());
        total += u64::from(count);
    }
    let (luma, chroma) = frame.distortion_per_mb();
    row.push(total.to_string());
    row.push(luma.to_string());
    row.push(chroma.to_string());
    row.push(format!("{:.2}", frame.luma_level_avg));
    row.push(frame.luma_level_min.to_string());
    row.push(frame.luma_level_max.to_string());

    if config.level.has_energy() {
        row.push(or_dash(frame.psy_energy_avg, |e| format!("{e:.2}")));
        row.push(or_dash(frame.residual_energy_avg, |e| format!("{e:.2}")));
    }

    row
}

/// Summary cells after the command and timestamp columns.
fn summary_row(config: &ReportConfig, summary: &RunSummary) -> Vec<String> {
    let mut row = vec![
        format!("{:.2}", summary.elapsed_secs),
        format!("{:.2}", summary.fps),
        format!("{:.2}", summary.bitrate_kbps),
    ];

    match summary.global_psnr.filter(|_| config.psnr) {
        Some(p) => row.extend([p.y, p.u, p.v, p.avg].map(|v| format!("{v:.3}"))),
        None => row.extend(dashes(4)),
    }

    match summary.global_ssim.filter(|_| config.ssim) {
        Some(ssim) => {
            row.push(format!("{ssim:.6}"));
            row.push(format!("{:.3}", ssim_db(ssim)));
        }
        None => row.extend(dashes(2)),
    }

    for frame_type in FrameType::ALL {
        let group = summary.for_type(frame_type);
        if group.count == 0 {
            row.extend(dashes(TYPE_GROUP_WIDTH));
            continue;
        }
        row.push(group.count.to_string());
        row.push(format!("{:.2}", group.qp_avg));
        row.push(format!("{:.2}", group.size_avg));
        match group.psnr.filter(|_| config.psnr) {
            Some(p) => row.extend([p.y, p.u, p.v].map(|v| format!("{v:.3}"))),
            None => row.extend(dashes(3)),
        }
        row.push(or_dash(group.ssim.filter(|_| config.ssim), |s| format!("{s:.6}")));
    }

    row
}
