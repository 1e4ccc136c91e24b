//! Reading per-frame logs back.
//!
//! [`FrameLogReader`] parses a log written at level 1 or above into typed
//! [`FrameRecord`]s. Leading whitespace in cells (from the `", "`
//! separator and the padded order/POC columns) is trimmed. Every `Summary`
//! block (marker, summary header, data row) is skipped, so a log appended to
//! by several runs yields the frames of all of them.
//!
//! ## Example
//!
//! ```rust,ignore
//! use encode_report::import::FrameLogReader;
//!
//! let records = FrameLogReader::new().read_path("frames.csv")?;
//! for r in &records {
//!     println!("{} {} {}", r.encode_order, r.frame_type, r.size_bytes);
//! }
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::report::columns::FRAME_BASE;
use crate::stats::FrameType;

/// One parsed per-frame row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Position in coding order.
    pub encode_order: u32,
    /// Picture order count.
    pub poc: i32,
    /// Coded picture type.
    pub frame_type: FrameType,
    /// Average quantizer.
    pub qp_avg: f64,
    /// Compressed size in bytes.
    pub size_bytes: u64,
    /// Every column by header name, as written.
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl FrameRecord {
    /// Raw value of a column.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Numeric value of a column; `None` for missing columns and dashes.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(|s| s.parse().ok())
    }
}

/// Parser for per-frame logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLogReader;

impl FrameLogReader {
    /// Create a reader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read a log file.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<FrameRecord>> {
        let file = std::fs::File::open(path.as_ref())?;
        self.read(file)
    }

    /// Read a log from any source.
    pub fn read<R: Read>(&self, source: R) -> Result<Vec<FrameRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if headers.len() < FRAME_BASE.len() || headers[..FRAME_BASE.len()] != FRAME_BASE {
            return Err(Error::CsvImport {
                line: 1,
                reason: "not a per-frame log header".to_string(),
            });
        }

        let mut records = Vec::new();
        // Summary header and data row still to skip after a `Summary` marker.
        let mut summary_rows = 0;

        for (line_num, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::CsvImport {
                line: line_num + 2, // +2 for 1-based and header
                reason: e.to_string(),
            })?;
            // Blank lines are skipped by the csv reader, so count from the
            // record position.
            let line = record.position().map_or(line_num + 2, |p| p.line() as usize);

            if record.get(0) == Some("Summary") {
                summary_rows = 2;
                continue;
            }
            if summary_rows > 0 {
                summary_rows -= 1;
                continue;
            }
            if record.len() != headers.len() {
                return Err(Error::CsvImport {
                    line,
                    reason: format!("expected {} columns, found {}", headers.len(), record.len()),
                });
            }

            let cell = |i: usize| record.get(i).unwrap_or("");
            let invalid = |i: usize| Error::CsvImport {
                line,
                reason: format!("invalid {}: {:?}", FRAME_BASE[i], cell(i)),
            };

            let frame_type = FrameType::from_letter(cell(1)).ok_or_else(|| invalid(1))?;

            records.push(FrameRecord {
                encode_order: cell(0).parse().map_err(|_| invalid(0))?,
                frame_type,
                poc: cell(2).parse().map_err(|_| invalid(2))?,
                qp_avg: cell(3).parse().map_err(|_| invalid(3))?,
                size_bytes: cell(4).parse().map_err(|_| invalid(4))?,
                fields: headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(String::from))
                    .collect(),
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RateControl, ReportConfig};
    use crate::report::ReportWriter;
    use crate::stats::{FrameStats, MbType, PsnrSample, RunSummary};

    fn write_log(config: ReportConfig, frames: &[FrameStats], summary: bool) -> Vec<u8> {
        let mut writer = ReportWriter::from_writer(Vec::new(), config, true).unwrap();
        for frame in frames {
            writer.write_frame(frame).unwrap();
        }
        if summary {
            writer.write_summary(&RunSummary::default(), &["enc", "-o", "out.264"]).unwrap();
        }
        writer.into_inner().unwrap()
    }

    #[test]
    fn test_read_written_log() {
        let config = ReportConfig::builder()
            .level(1)
            .psnr(true)
            .ssim(true)
            .rate_control(RateControl::ConstantRateFactor)
            .build();

        let mut intra = FrameStats::new(0, 0, FrameType::Intra, 21.5, 9000);
        intra.psnr = Some(PsnrSample { y: 42.0, u: 45.0, v: 46.0, avg: 43.0 });
        intra.mb_counts.set(MbType::Intra16x16, 396);
        let bidir = FrameStats::new(1, 2, FrameType::Bidirectional, 30.25, 300);

        let bytes = write_log(config, &[intra, bidir], true);
        let records = FrameLogReader::new().read(bytes.as_slice()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frame_type, FrameType::Intra);
        assert_eq!(records[0].size_bytes, 9000);
        assert_eq!(records[0].number("Y PSNR"), Some(42.0));
        assert_eq!(records[0].number("Total MB Count"), Some(396.0));
        assert_eq!(records[1].poc, 2);
        assert_eq!(records[1].qp_avg, 30.25);
        assert_eq!(records[1].field("SSIM"), Some("-"));
        assert_eq!(records[1].number("SSIM"), None);
    }

    #[test]
    fn test_read_log_appended_by_two_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.csv");
        let config = ReportConfig::builder().level(1).psnr(true).build();

        for run in 0..2 {
            let mut writer = ReportWriter::open(&path, config);
            writer.write_frame(&FrameStats::new(0, 0, FrameType::Intra, 20.0, 4000 + run)).unwrap();
            writer.write_frame(&FrameStats::new(1, 1, FrameType::Predicted, 24.0, 1000 + run)).unwrap();
            writer.write_summary(&RunSummary::default(), &["enc", "in.y4m"]).unwrap();
        }

        let records = FrameLogReader::new().read_path(&path).unwrap();
        let sizes: Vec<u64> = records.iter().map(|r| r.size_bytes).collect();
        assert_eq!(sizes, [4000, 1000, 4001, 1001]);
    }

    #[test]
    fn test_bad_line_after_summary_block() {
        let data = "EncodeOrder, FrameType, POC, AverageQP, FrameSize\n\
                    0, I, 0, 20.0, 100\n\
                    \n\
                    Summary\n\
                    Date, Frames\n\
                    today, 1\n\
                    1, X, 1, 20.0, 100\n";
        let err = FrameLogReader::new().read(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::CsvImport { line: 7, .. }));
    }

    #[test]
    fn test_rejects_summary_only_log() {
        let config = ReportConfig::builder().level(0).build();
        let bytes = write_log(config, &[], true);
        let err = FrameLogReader::new().read(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, Error::CsvImport { line: 1, .. }));
    }

    #[test]
    fn test_reports_bad_line() {
        let data = "EncodeOrder, FrameType, POC, AverageQP, FrameSize\n0, I, 0, 20.0, 100\n1, X, 1, 20.0, 100\n";
        let err = FrameLogReader::new().read(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::CsvImport { line: 3, .. }));
    }

    #[test]
    fn test_read_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.csv");
        let config = ReportConfig::builder().level(2).build();
        {
            let mut writer = ReportWriter::open(&path, config);
            writer.write_frame(&FrameStats::new(0, 0, FrameType::Intra, 20.0, 100)).unwrap();
        }

        let records = FrameLogReader::new().read_path(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("AvgPsyEnergy"), Some("-"));
    }
}
