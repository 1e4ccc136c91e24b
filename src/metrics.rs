//! Metric transforms applied when writing rows.
//!
//! PSNR and SSIM are measured by the encoder; this module only converts them
//! into the forms the log reports.

/// Decibel value reported for a near-perfect SSIM.
pub const SSIM_DB_CEILING: f64 = 100.0;

/// Smallest `1 - ssim` that is still converted with `log10`.
const SSIM_DB_EPSILON: f64 = 1e-10;

/// Convert SSIM to decibels: `-10 * log10(1 - ssim)`.
///
/// When `1 - ssim` is at or below `1e-10` the result is clamped to
/// [`SSIM_DB_CEILING`], so identical pictures (and SSIM values marginally
/// above 1 from rounding) never yield an infinite or NaN column.
///
/// # Example
///
/// ```
/// use encode_report::metrics::ssim_db;
///
/// assert!((ssim_db(0.5) - 3.0103).abs() < 1e-4);
/// assert_eq!(ssim_db(1.0), 100.0);
/// ```
#[must_use]
pub fn ssim_db(ssim: f64) -> f64 {
    let inv_ssim = 1.0 - ssim;
    if inv_ssim <= SSIM_DB_EPSILON {
        SSIM_DB_CEILING
    } else {
        -10.0 * inv_ssim.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssim_db_half() {
        let db = ssim_db(0.5);
        assert!((db - 3.0103).abs() < 1e-4);
        assert_eq!(format!("{:.3}", db), "3.010");
    }

    #[test]
    fn test_ssim_db_clamped_near_one() {
        // 1 - 0.999999999 is about 1e-9, above the clamp threshold.
        let db = ssim_db(0.999999999);
        assert!((db - 90.0).abs() < 0.01);

        assert_eq!(ssim_db(1.0 - 1e-11), SSIM_DB_CEILING);
        assert_eq!(ssim_db(1.0), SSIM_DB_CEILING);
        assert_eq!(ssim_db(1.000001), SSIM_DB_CEILING);
    }

    #[test]
    fn test_ssim_db_monotonic() {
        assert!(ssim_db(0.99) > ssim_db(0.9));
        assert!((ssim_db(0.9) - 10.0).abs() < 1e-9);
        assert_eq!(ssim_db(0.0), 0.0);
    }
}
