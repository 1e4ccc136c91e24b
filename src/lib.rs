//! # encode-report
//!
//! CSV statistics logs for video encoders.
//!
//! The encoder measures; this library only serializes. It negotiates a
//! header from the enabled metrics, appends one fixed-column row per encoded
//! frame and a summary row per encode run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use encode_report::{FrameStats, ReportConfig, ReportWriter, SummaryAccumulator};
//!
//! let config = ReportConfig::builder().level(1).psnr(true).build();
//! let mut log = ReportWriter::open("encode.csv", config);
//! let mut totals = SummaryAccumulator::new();
//!
//! for frame in encoded_frames {
//!     // A failed log write never stops the encode.
//!     let _ = log.write_frame(&frame);
//!     totals.push(&frame);
//! }
//!
//! let args: Vec<String> = std::env::args().collect();
//! log.write_summary(&totals.finish(elapsed, 25.0), &args)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`config`]: Which columns a log carries
//! - [`stats`]: Per-frame snapshots and run aggregation
//! - [`metrics`]: SSIM to decibel conversion
//! - [`report`]: The CSV writer and column layouts
//! - [`import`]: Reading per-frame logs back

pub mod config;
pub mod error;
pub mod import;
pub mod metrics;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use config::{LogLevel, RateControl, ReportConfig};
pub use error::{Error, Result};
pub use import::{FrameLogReader, FrameRecord};
pub use report::ReportWriter;
pub use stats::{
    FrameStats, FrameType, FrameTypeSummary, MbCounts, MbType, PsnrSample, RunSummary,
    SummaryAccumulator,
};
