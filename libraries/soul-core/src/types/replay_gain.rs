//! ReplayGain record stored on a track
//!
//! Gains are kept as linear ratios rather than decibels so that `0.0` can
//! stand for "not analyzed yet". Conversions to and from dB happen at the
//! edges (analysis results, display).

use serde::{Deserialize, Serialize};

/// Ratio value meaning "no gain has been evaluated"
pub const RATIO_UNDEFINED: f64 = 0.0;

/// Peak value meaning "no peak has been evaluated"
pub const PEAK_UNDEFINED: f32 = -1.0;

/// Convert a gain in decibels to a linear amplitude ratio
pub fn db_to_ratio(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert a linear amplitude ratio to a gain in decibels
pub fn ratio_to_db(ratio: f64) -> f64 {
    20.0 * ratio.log10()
}

/// ReplayGain information attached to a track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayGain {
    /// Linear gain ratio, `RATIO_UNDEFINED` if unanalyzed
    ratio: f64,
    /// Sample peak (linear, full scale = 1.0), `PEAK_UNDEFINED` if unknown
    peak: f32,
}

impl ReplayGain {
    /// Create a record from an explicit ratio and peak
    pub fn new(ratio: f64, peak: f32) -> Self {
        Self { ratio, peak }
    }

    pub fn is_valid_ratio(ratio: f64) -> bool {
        ratio.is_finite() && ratio > RATIO_UNDEFINED
    }

    pub fn has_ratio(&self) -> bool {
        Self::is_valid_ratio(self.ratio)
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    /// Gain in dB, if a ratio is present
    pub fn ratio_db(&self) -> Option<f64> {
        self.has_ratio().then(|| ratio_to_db(self.ratio))
    }

    pub fn is_valid_peak(peak: f32) -> bool {
        peak.is_finite() && peak >= 0.0
    }

    pub fn has_peak(&self) -> bool {
        Self::is_valid_peak(self.peak)
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Format a ratio as a dB string, empty if undefined
    pub fn ratio_to_string(ratio: f64) -> String {
        if Self::is_valid_ratio(ratio) {
            format!("{:.2} dB", ratio_to_db(ratio))
        } else {
            String::new()
        }
    }
}

impl Default for ReplayGain {
    fn default() -> Self {
        Self {
            ratio: RATIO_UNDEFINED,
            peak: PEAK_UNDEFINED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_undefined() {
        let gain = ReplayGain::default();
        assert!(!gain.has_ratio());
        assert!(!gain.has_peak());
        assert_eq!(gain.ratio_db(), None);
    }

    #[test]
    fn db_ratio_conversion() {
        assert!((db_to_ratio(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_ratio(6.0) - 1.995).abs() < 0.001);
        assert!((db_to_ratio(-6.0) - 0.501).abs() < 0.001);
        assert!((ratio_to_db(db_to_ratio(-3.25)) - (-3.25)).abs() < 1e-9);
    }

    #[test]
    fn setting_ratio_keeps_peak() {
        let mut gain = ReplayGain::new(0.5, 0.8);
        gain.set_ratio(2.0);
        assert_eq!(gain.ratio(), 2.0);
        assert_eq!(gain.peak(), 0.8);
    }

    #[test]
    fn invalid_ratios_are_not_gains() {
        assert!(!ReplayGain::new(-1.0, 0.5).has_ratio());
        assert!(!ReplayGain::new(f64::NAN, 0.5).has_ratio());
        assert!(!ReplayGain::new(f64::INFINITY, 0.5).has_ratio());
        assert_eq!(ReplayGain::new(f64::NAN, 0.5).ratio_db(), None);
    }

    #[test]
    fn format_gain_strings() {
        assert_eq!(ReplayGain::ratio_to_string(db_to_ratio(-6.0)), "-6.00 dB");
        assert_eq!(ReplayGain::ratio_to_string(RATIO_UNDEFINED), "");
    }
}
