//! CSV statistics log.
//!
//! The encoder driver calls [`ReportWriter::open`] once before encoding,
//! [`ReportWriter::write_frame`] for every completed frame and
//! [`ReportWriter::write_summary`] once at the end.
//!
//! ## Layout
//!
//! Columns are separated by `", "` and never quoted. All values are numeric
//! or fixed vocabulary, except the command column of the summary, which is
//! written verbatim.
//!
//! | Level | File content |
//! |-------|--------------|
//! | 0 | Summary header, then one summary row per run |
//! | 1 | Frame header, frame rows, then a `Summary` block per run |
//! | 2+ | As level 1 with psy/residual energy columns |
//!
//! The header is only written when the file is created. Reopening an
//! existing file appends without repeating it.

pub mod columns;
mod writer;

pub use columns::{frame_columns, header_line, summary_columns};
pub use writer::ReportWriter;
