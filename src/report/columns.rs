//! Column layouts for the per-frame and summary headers.

use crate::config::ReportConfig;
use crate::stats::MbType;

/// Separator between columns. Values are never quoted.
pub const SEPARATOR: &str = ", ";

/// Placeholder for a value that was not measured.
pub const DASH: &str = "-";

/// Columns present in every per-frame log.
pub const FRAME_BASE: [&str; 5] = ["EncodeOrder", "FrameType", "POC", "AverageQP", "FrameSize"];

/// Constant-rate-factor mode only.
pub const RATE_FACTOR: [&str; 1] = ["RateFactor"];

/// Present when PSNR is enabled.
pub const FRAME_PSNR: [&str; 4] = ["Y PSNR", "U PSNR", "V PSNR", "YUV PSNR"];

/// Present when SSIM is enabled.
pub const FRAME_SSIM: [&str; 2] = ["SSIM", "SSIM(dB)"];

/// Trailing aggregates of the macroblock block.
pub const MB_AGGREGATES: [&str; 6] = [
    "Total MB Count",
    "AverageLumaDistortion",
    "AverageChromaDistortion",
    "AverageLumaLevel",
    "MinLumaLevel",
    "MaxLumaLevel",
];

/// Debug-level energy columns.
pub const ENERGY: [&str; 2] = ["AvgPsyEnergy", "AvgResEnergy"];

/// Summary columns before the per-type groups.
pub const SUMMARY_GLOBAL: [&str; 11] = [
    "Command",
    "Date/Time",
    "Elapsed Time",
    "FPS",
    "Bitrate",
    "Y PSNR",
    "U PSNR",
    "V PSNR",
    "Global PSNR",
    "SSIM",
    "SSIM (dB)",
];

/// Width of one per-type group in the summary.
pub const TYPE_GROUP_WIDTH: usize = 7;

/// Per-frame header columns for `config`, in row order.
#[must_use]
pub fn frame_columns(config: &ReportConfig) -> Vec<&'static str> {
    let mut columns = FRAME_BASE.to_vec();
    if config.has_rate_factor() {
        columns.extend(RATE_FACTOR);
    }
    if config.psnr {
        columns.extend(FRAME_PSNR);
    }
    if config.ssim {
        columns.extend(FRAME_SSIM);
    }
    columns.extend(MbType::ALL.iter().map(|t| t.column_name()));
    columns.extend(MB_AGGREGATES);
    if config.level.has_energy() {
        columns.extend(ENERGY);
    }
    columns
}

/// Summary header columns.
#[must_use]
pub fn summary_columns() -> Vec<String> {
    let mut columns: Vec<String> = SUMMARY_GLOBAL.iter().map(|c| (*c).to_string()).collect();
    for letter in ['I', 'P', 'B'] {
        columns.push(format!("{letter} count"));
        columns.push(format!("{letter} ave-QP"));
        columns.push(format!("{letter} ave-Size"));
        columns.push(format!("{letter}-PSNR Y"));
        columns.push(format!("{letter}-PSNR U"));
        columns.push(format!("{letter}-PSNR V"));
        columns.push(format!("{letter}-SSIM"));
    }
    columns
}

/// Header line for `config` without the trailing newline.
///
/// Per-frame logs get the frame header, summary-only logs the summary
/// header.
#[must_use]
pub fn header_line(config: &ReportConfig) -> String {
    if config.level.is_per_frame() {
        frame_columns(config).join(SEPARATOR)
    } else {
        summary_columns().join(SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateControl;

    fn position(columns: &[&str], name: &str) -> Option<usize> {
        columns.iter().position(|c| *c == name)
    }

    #[test]
    fn test_minimal_frame_columns() {
        let config = ReportConfig::builder()
            .level(1)
            .rate_control(RateControl::ConstantQp)
            .build();
        let columns = frame_columns(&config);

        assert_eq!(&columns[..5], &FRAME_BASE);
        assert_eq!(columns.len(), 5 + MbType::COUNT + MB_AGGREGATES.len());
        assert_eq!(position(&columns, "RateFactor"), None);
        assert_eq!(position(&columns, "Y PSNR"), None);
        assert_eq!(position(&columns, "SSIM"), None);
        assert_eq!(columns[5], "Intra 4x4 mbCount");
    }

    #[test]
    fn test_optional_groups_in_order() {
        let config = ReportConfig::builder()
            .level(1)
            .psnr(true)
            .ssim(true)
            .rate_control(RateControl::ConstantRateFactor)
            .build();
        let columns = frame_columns(&config);

        let rf = position(&columns, "RateFactor").unwrap();
        let psnr = position(&columns, "Y PSNR").unwrap();
        let ssim = position(&columns, "SSIM").unwrap();
        let mb = position(&columns, "Intra 4x4 mbCount").unwrap();
        assert_eq!(rf, 5);
        assert!(rf < psnr && psnr < ssim && ssim < mb);
        assert_eq!(columns.last(), Some(&"MaxLumaLevel"));
    }

    #[test]
    fn test_energy_columns_at_debug_level() {
        let config = ReportConfig::builder().level(2).build();
        let columns = frame_columns(&config);
        assert_eq!(&columns[columns.len() - 2..], &ENERGY);
    }

    #[test]
    fn test_summary_columns() {
        let columns = summary_columns();
        assert_eq!(columns.len(), SUMMARY_GLOBAL.len() + 3 * TYPE_GROUP_WIDTH);
        assert_eq!(columns[0], "Command");
        assert_eq!(columns[11], "I count");
        assert_eq!(columns.last().map(String::as_str), Some("B-SSIM"));
    }

    #[test]
    fn test_header_line_by_level() {
        let summary_only = ReportConfig::builder().level(0).psnr(true).build();
        assert!(header_line(&summary_only).starts_with("Command, Date/Time"));

        let per_frame = ReportConfig::builder().level(1).build();
        assert!(header_line(&per_frame).starts_with("EncodeOrder, FrameType, POC"));
    }
}
