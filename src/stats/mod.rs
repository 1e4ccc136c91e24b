//! Per-frame statistics snapshots.
//!
//! The encoder fills a [`FrameStats`] for every completed frame and hands it
//! to the report writer by reference. Distortion sums travel on the snapshot
//! itself; the caller owns them and resets them between frames.
//!
//! Run-level aggregation lives in [`summary`].

pub mod summary;

pub use summary::{FrameTypeSummary, RunSummary, SummaryAccumulator};

use serde::{Deserialize, Serialize};

/// Coded picture type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameType {
    /// Intra picture.
    #[serde(rename = "I")]
    Intra,
    /// Forward predicted picture.
    #[serde(rename = "P")]
    Predicted,
    /// Bidirectionally predicted picture.
    #[serde(rename = "B")]
    Bidirectional,
}

impl FrameType {
    /// All frame types in report order.
    pub const ALL: [Self; 3] = [Self::Intra, Self::Predicted, Self::Bidirectional];

    /// Single-letter code used in the log.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Intra => 'I',
            Self::Predicted => 'P',
            Self::Bidirectional => 'B',
        }
    }

    /// Parse the single-letter code (case-insensitive).
    #[must_use]
    pub fn from_letter(code: &str) -> Option<Self> {
        match code.trim() {
            "I" | "i" => Some(Self::Intra),
            "P" | "p" => Some(Self::Predicted),
            "B" | "b" => Some(Self::Bidirectional),
            _ => None,
        }
    }

    /// Position of this type in [`FrameType::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Intra => 0,
            Self::Predicted => 1,
            Self::Bidirectional => 2,
        }
    }
}

impl std::fmt::Display for FrameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Macroblock classification by prediction mode.
///
/// Declaration order is the column order of the macroblock block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MbType {
    /// Intra, 4x4 prediction.
    Intra4x4,
    /// Intra, 8x8 prediction.
    Intra8x8,
    /// Intra, 16x16 prediction.
    Intra16x16,
    /// Intra, raw PCM samples.
    IntraPcm,
    /// P, 16x16, 16x8 or 8x16 partitions from list 0.
    PL0,
    /// P, 8x8 partitions.
    P8x8,
    /// P skip.
    PSkip,
    /// B direct.
    BDirect,
    /// B 16x8/8x16, both partitions from list 0.
    BL0L0,
    /// B 16x8/8x16, list 0 then list 1.
    BL0L1,
    /// B 16x8/8x16, list 0 then bi-predicted.
    BL0Bi,
    /// B 16x8/8x16, list 1 then list 0.
    BL1L0,
    /// B 16x8/8x16, both partitions from list 1.
    BL1L1,
    /// B 16x8/8x16, list 1 then bi-predicted.
    BL1Bi,
    /// B 16x8/8x16, bi-predicted then list 0.
    BBiL0,
    /// B 16x8/8x16, bi-predicted then list 1.
    BBiL1,
    /// B 16x8/8x16, both partitions bi-predicted.
    BBiBi,
    /// B, 8x8 partitions.
    B8x8,
    /// B skip.
    BSkip,
}

impl MbType {
    /// Number of macroblock categories.
    pub const COUNT: usize = 19;

    /// All categories in column order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Intra4x4,
        Self::Intra8x8,
        Self::Intra16x16,
        Self::IntraPcm,
        Self::PL0,
        Self::P8x8,
        Self::PSkip,
        Self::BDirect,
        Self::BL0L0,
        Self::BL0L1,
        Self::BL0Bi,
        Self::BL1L0,
        Self::BL1L1,
        Self::BL1Bi,
        Self::BBiL0,
        Self::BBiL1,
        Self::BBiBi,
        Self::B8x8,
        Self::BSkip,
    ];

    /// Column name in the per-frame header.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Intra4x4 => "Intra 4x4 mbCount",
            Self::Intra8x8 => "Intra 8x8 mbCount",
            Self::Intra16x16 => "Intra 16x16 mbCount",
            Self::IntraPcm => "Intra PCM mbCount",
            Self::PL0 => "InterP 16x16 16x8 and 8x16 mbCount",
            Self::P8x8 => "InterP 8x8 mbCount",
            Self::PSkip => "InterP SKIP mbCount",
            Self::BDirect => "Inter BDIRECT mbCount",
            Self::BL0L0 => "B_L0_L0",
            Self::BL0L1 => "B_L0_L1",
            Self::BL0Bi => "B_L0_BI",
            Self::BL1L0 => "B_L1_L0",
            Self::BL1L1 => "B_L1_L1",
            Self::BL1Bi => "B_L1_BI",
            Self::BBiL0 => "B_BI_L0",
            Self::BBiL1 => "B_BI_L1",
            Self::BBiBi => "B_BI_BI",
            Self::B8x8 => "InterB 8x8 mbCount",
            Self::BSkip => "InterB SKIP mbCount",
        }
    }
}

/// Macroblock counts indexed by [`MbType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MbCounts(pub [u32; MbType::COUNT]);

impl MbCounts {
    /// Count for one category.
    #[must_use]
    pub fn get(&self, mb_type: MbType) -> u32 {
        self.0[mb_type as usize]
    }

    /// Set the count for one category.
    pub fn set(&mut self, mb_type: MbType, count: u32) {
        self.0[mb_type as usize] = count;
    }

    /// Sum over all categories.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// Counts paired with their category, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (MbType, u32)> + '_ {
        MbType::ALL.iter().map(|&t| (t, self.get(t)))
    }
}

/// PSNR of one picture (or a mean over pictures), in dB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PsnrSample {
    /// Luma.
    pub y: f64,
    /// Blue-difference chroma.
    pub u: f64,
    /// Red-difference chroma.
    pub v: f64,
    /// Weighted average over all planes.
    pub avg: f64,
}

/// Measurements for one encoded frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameStats {
    /// Position in coding order.
    pub encode_order: u32,

    /// Picture order count (display order).
    pub poc: i32,

    /// Coded picture type.
    pub frame_type: FrameType,

    /// Average quantizer after adaptive quantization.
    pub qp_avg: f64,

    /// Compressed size in bytes.
    pub size_bytes: u64,

    /// PSNR, when the encoder measured it.
    #[serde(default)]
    pub psnr: Option<PsnrSample>,

    /// SSIM, when the encoder measured it.
    #[serde(default)]
    pub ssim: Option<f64>,

    /// Average rate factor (constant-rate-factor mode only).
    #[serde(default)]
    pub rate_factor: Option<f64>,

    /// Macroblock counts per category.
    #[serde(default)]
    pub mb_counts: MbCounts,

    /// Average luma sample level.
    #[serde(default)]
    pub luma_level_avg: f64,

    /// Minimum luma sample level.
    #[serde(default)]
    pub luma_level_min: u16,

    /// Maximum luma sample level.
    #[serde(default)]
    pub luma_level_max: u16,

    /// Sum of luma transform-domain distortion over the frame.
    #[serde(default)]
    pub luma_distortion: u64,

    /// Sum of chroma transform-domain distortion over the frame.
    #[serde(default)]
    pub chroma_distortion: u64,

    /// Average psychovisual energy per macroblock.
    #[serde(default)]
    pub psy_energy_avg: Option<f64>,

    /// Average residual energy per macroblock.
    #[serde(default)]
    pub residual_energy_avg: Option<f64>,
}

impl FrameStats {
    /// A frame with only the mandatory fields filled in.
    #[must_use]
    pub fn new(encode_order: u32, poc: i32, frame_type: FrameType, qp_avg: f64, size_bytes: u64) -> Self {
        Self {
            encode_order,
            poc,
            frame_type,
            qp_avg,
            size_bytes,
            psnr: None,
            ssim: None,
            rate_factor: None,
            mb_counts: MbCounts::default(),
            luma_level_avg: 0.0,
            luma_level_min: 0,
            luma_level_max: 0,
            luma_distortion: 0,
            chroma_distortion: 0,
            psy_energy_avg: None,
            residual_energy_avg: None,
        }
    }

    /// Average luma and chroma distortion per macroblock.
    ///
    /// Integer division by the macroblock total; `(0, 0)` for a frame with
    /// no macroblocks.
    #[must_use]
    pub fn distortion_per_mb(&self) -> (u64, u64) {
        match self.mb_counts.total() {
            0 => (0, 0),
            total => (self.luma_distortion / total, self.chroma_distortion / total),
        }
    }
}
