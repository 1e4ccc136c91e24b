//! Report configuration.
//!
//! A [`ReportConfig`] is a read-only snapshot of the encoder settings that
//! shape the log: the verbosity level and which optional metrics are active.
//! The same config must be used for opening a log and for every row written
//! to it, otherwise rows and header drift apart.

use serde::{Deserialize, Serialize};

/// Verbosity of the CSV log.
///
/// Level `0` produces a summary-only file. Any nonzero level produces a
/// per-frame file; level 2 and above also carries the energy columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub u8);

impl LogLevel {
    /// Summary row only.
    pub const SUMMARY: Self = Self(0);
    /// One row per frame.
    pub const FRAME: Self = Self(1);
    /// Per-frame rows with psy/residual energy columns.
    pub const DEBUG: Self = Self(2);

    /// Whether the file carries one row per frame.
    #[must_use]
    pub fn is_per_frame(self) -> bool {
        self.0 != 0
    }

    /// Whether the energy columns are present.
    #[must_use]
    pub fn has_energy(self) -> bool {
        self.0 >= 2
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rate control mode of the encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateControl {
    /// Constant quantizer.
    ConstantQp,
    /// Constant rate factor (quality driven).
    #[default]
    ConstantRateFactor,
    /// Average bitrate.
    AverageBitrate,
}

impl RateControl {
    /// Whether this is constant-rate-factor mode.
    #[must_use]
    pub fn is_crf(self) -> bool {
        matches!(self, Self::ConstantRateFactor)
    }
}

/// Which columns a log carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Log verbosity.
    pub level: LogLevel,
    /// PSNR is measured by the encoder.
    pub psnr: bool,
    /// SSIM is measured by the encoder.
    pub ssim: bool,
    /// Rate control mode.
    pub rate_control: RateControl,
}

impl ReportConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Whether the per-frame rows carry a rate factor column.
    #[must_use]
    pub fn has_rate_factor(&self) -> bool {
        self.rate_control.is_crf()
    }
}

/// Builder for [`ReportConfig`].
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    /// Set the verbosity level.
    #[must_use]
    pub fn level(mut self, level: u8) -> Self {
        self.config.level = LogLevel(level);
        self
    }

    /// Enable or disable PSNR columns.
    #[must_use]
    pub fn psnr(mut self, enabled: bool) -> Self {
        self.config.psnr = enabled;
        self
    }

    /// Enable or disable SSIM columns.
    #[must_use]
    pub fn ssim(mut self, enabled: bool) -> Self {
        self.config.ssim = enabled;
        self
    }

    /// Set the rate control mode.
    #[must_use]
    pub fn rate_control(mut self, mode: RateControl) -> Self {
        self.config.rate_control = mode;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ReportConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ReportConfig::builder()
            .level(2)
            .psnr(true)
            .rate_control(RateControl::AverageBitrate)
            .build();

        assert_eq!(config.level, LogLevel::DEBUG);
        assert!(config.psnr);
        assert!(!config.ssim);
        assert!(!config.has_rate_factor());
    }

    #[test]
    fn test_level_flags() {
        assert!(!LogLevel::SUMMARY.is_per_frame());
        assert!(LogLevel::FRAME.is_per_frame());
        assert!(!LogLevel::FRAME.has_energy());
        assert!(LogLevel(3).has_energy());
    }

    #[test]
    fn test_config_json() {
        let json = r#"{"level":1,"psnr":true,"ssim":false,"rate_control":"constant_qp"}"#;
        let config: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.level, LogLevel::FRAME);
        assert_eq!(config.rate_control, RateControl::ConstantQp);
    }
}
