/// Audio-related types
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);
    pub const HIGH_RES_96: Self = Self(96_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }

    /// A zero rate means the decoder could not tell us
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl From<u32> for SampleRate {
    fn from(hz: u32) -> Self {
        Self(hz)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_accessors() {
        let rate = SampleRate::new(48_000);
        assert_eq!(rate.as_hz(), 48_000);
        assert_eq!(rate, SampleRate::DVD_QUALITY);
        assert!(rate.is_valid());
        assert!(!SampleRate::new(0).is_valid());
        assert_eq!(rate.to_string(), "48000 Hz");
    }
}
