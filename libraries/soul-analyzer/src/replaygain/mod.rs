//! ReplayGain 1.0 loudness analysis
//!
//! The classic ReplayGain algorithm:
//!
//! 1. Equal-loudness filter per channel (Yule-Walker + Butterworth high-pass)
//! 2. Mean square over 50 ms windows, averaged across both channels
//! 3. Window levels collected into a histogram with 0.01 dB resolution
//! 4. The 95th percentile level is compared against the pink-noise reference
//!
//! Input samples are expected in 16-bit scale (full scale = 32767.0), not
//! normalized floats.
//!
//! Reference: https://wiki.hydrogenaud.io/index.php?title=ReplayGain_specification

mod filter;

pub use filter::supported_sample_rates;

use filter::EqualLoudnessFilter;

/// Returned by [`GainAlgorithm::end`] when no complete window was analyzed.
///
/// Distinct from every gain the analysis can produce.
pub const GAIN_NOT_ENOUGH_SAMPLES: f32 = -24601.0;

/// Level the algorithm measures for the -14 dBFS pink noise reference signal
pub const PINK_REF: f64 = 64.82;

/// Histogram resolution
const STEPS_PER_DB: f64 = 100.0;

/// Histogram covers 0..120 dB
const HISTOGRAM_SLOTS: usize = 12_000;

const RMS_PERCENTILE: f64 = 0.95;

/// RMS window length in milliseconds
const RMS_WINDOW_MS: usize = 50;

/// Gain analysis as seen by an analyzer
///
/// Lifecycle per track: `initialise` once, `process` any number of chunks,
/// then `end` to collect the gain in dB.
pub trait GainAlgorithm {
    /// Prepare for a new track. Returns `false` if the format is unsupported.
    fn initialise(&mut self, sample_rate: u32, channels: usize) -> bool;

    /// Accumulate one chunk of planar samples.
    fn process(&mut self, left: &[f32], right: &[f32]) -> bool;

    /// Finish the track and return the gain in dB, or
    /// [`GAIN_NOT_ENOUGH_SAMPLES`].
    fn end(&mut self) -> f32;
}

/// ReplayGain 1.0 analysis state for one track at a time
#[derive(Default)]
pub struct ReplayGainAnalysis {
    state: Option<AnalysisState>,
}

struct AnalysisState {
    channels: usize,
    /// Samples per RMS window
    window_len: usize,
    left_filter: EqualLoudnessFilter,
    right_filter: EqualLoudnessFilter,
    /// Sum of squares in the current window
    left_sum: f64,
    right_sum: f64,
    /// Samples accumulated in the current window
    window_fill: usize,
    histogram: Vec<u32>,
}

impl AnalysisState {
    fn new(sample_rate: u32, channels: usize) -> Option<Self> {
        let left_filter = EqualLoudnessFilter::new(sample_rate)?;
        Some(Self {
            channels,
            window_len: (sample_rate as usize * RMS_WINDOW_MS).div_ceil(1000),
            right_filter: left_filter.clone(),
            left_filter,
            left_sum: 0.0,
            right_sum: 0.0,
            window_fill: 0,
            histogram: vec![0; HISTOGRAM_SLOTS],
        })
    }

    fn push(&mut self, left: f32, right: f32) {
        let l = self.left_filter.process(f64::from(left));
        let r = self.right_filter.process(f64::from(right));
        self.left_sum += l * l;
        self.right_sum += r * r;
        self.window_fill += 1;

        if self.window_fill == self.window_len {
            self.close_window();
        }
    }

    fn close_window(&mut self) {
        let mean_square = (self.left_sum + self.right_sum) / self.window_fill as f64 * 0.5;
        let level = STEPS_PER_DB * 10.0 * (mean_square + 1e-37).log10();
        let slot = (level as i64).clamp(0, HISTOGRAM_SLOTS as i64 - 1) as usize;
        self.histogram[slot] += 1;

        self.left_sum = 0.0;
        self.right_sum = 0.0;
        self.window_fill = 0;
    }

    /// 95th percentile level relative to the pink-noise reference
    fn title_gain(&self) -> f32 {
        let windows: u64 = self.histogram.iter().map(|&n| u64::from(n)).sum();
        if windows == 0 {
            return GAIN_NOT_ENOUGH_SAMPLES;
        }

        let upper = (windows as f64 * (1.0 - RMS_PERCENTILE)).ceil() as u64;
        let mut seen = 0u64;
        let mut slot = 0;
        for (i, &count) in self.histogram.iter().enumerate().rev() {
            seen += u64::from(count);
            if seen >= upper {
                slot = i;
                break;
            }
        }

        (PINK_REF - slot as f64 / STEPS_PER_DB) as f32
    }

    fn reset(&mut self) {
        self.left_filter.reset();
        self.right_filter.reset();
        self.left_sum = 0.0;
        self.right_sum = 0.0;
        self.window_fill = 0;
        self.histogram.fill(0);
    }
}

impl ReplayGainAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `initialise` has succeeded
    pub fn is_initialised(&self) -> bool {
        self.state.is_some()
    }

    /// Number of complete RMS windows recorded for the current track
    pub fn windows_analyzed(&self) -> u64 {
        self.state
            .as_ref()
            .map_or(0, |s| s.histogram.iter().map(|&n| u64::from(n)).sum())
    }
}

impl GainAlgorithm for ReplayGainAnalysis {
    fn initialise(&mut self, sample_rate: u32, channels: usize) -> bool {
        if !(1..=2).contains(&channels) {
            tracing::debug!("ReplayGain: unsupported channel count {}", channels);
            self.state = None;
            return false;
        }
        self.state = AnalysisState::new(sample_rate, channels);
        if self.state.is_none() {
            tracing::debug!("ReplayGain: unsupported sample rate {} Hz", sample_rate);
        }
        self.state.is_some()
    }

    fn process(&mut self, left: &[f32], right: &[f32]) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };

        if state.channels == 1 {
            for &sample in left {
                state.push(sample, sample);
            }
            return true;
        }

        if right.len() != left.len() {
            return false;
        }
        for (&l, &r) in left.iter().zip(right) {
            state.push(l, r);
        }
        true
    }

    fn end(&mut self) -> f32 {
        let Some(state) = self.state.as_mut() else {
            return GAIN_NOT_ENOUGH_SAMPLES;
        };
        let gain = state.title_gain();
        state.reset();
        gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(sample_rate: u32, frequency: f32, amplitude: f32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    #[test]
    fn initialise_rejects_unsupported_formats() {
        let mut rg = ReplayGainAnalysis::new();
        assert!(!rg.initialise(192_000, 2));
        assert!(!rg.initialise(44100, 0));
        assert!(!rg.initialise(44100, 6));
        assert!(!rg.is_initialised());

        assert!(rg.initialise(44100, 2));
        assert!(rg.initialise(8000, 1));
        assert!(rg.is_initialised());
    }

    #[test]
    fn process_before_initialise_fails() {
        let mut rg = ReplayGainAnalysis::new();
        assert!(!rg.process(&[0.0; 16], &[0.0; 16]));
        assert_eq!(rg.end(), GAIN_NOT_ENOUGH_SAMPLES);
    }

    #[test]
    fn mismatched_stereo_chunk_fails() {
        let mut rg = ReplayGainAnalysis::new();
        rg.initialise(44100, 2);
        assert!(!rg.process(&[0.0; 16], &[0.0; 8]));
        assert!(rg.process(&[], &[]));
    }

    #[test]
    fn shorter_than_one_window_is_not_enough() {
        let mut rg = ReplayGainAnalysis::new();
        rg.initialise(44100, 2);
        // 50 ms at 44.1 kHz is 2205 samples
        let chunk = vec![1000.0_f32; 2204];
        assert!(rg.process(&chunk, &chunk));
        assert_eq!(rg.windows_analyzed(), 0);
        assert_eq!(rg.end(), GAIN_NOT_ENOUGH_SAMPLES);
    }

    #[test]
    fn window_length_rounds_up() {
        let mut rg = ReplayGainAnalysis::new();
        rg.initialise(11025, 1);
        // 11025 * 0.05 = 551.25 -> 552 samples per window
        let chunk = vec![1000.0_f32; 551];
        rg.process(&chunk, &[]);
        assert_eq!(rg.windows_analyzed(), 0);
        rg.process(&[1000.0], &[]);
        assert_eq!(rg.windows_analyzed(), 1);
    }

    #[test]
    fn louder_signal_needs_less_gain() {
        let mut rg = ReplayGainAnalysis::new();
        let quiet = sine(44100, 1000.0, 1000.0, 44100 * 2);
        let loud = sine(44100, 1000.0, 10_000.0, 44100 * 2);

        rg.initialise(44100, 2);
        rg.process(&quiet, &quiet);
        let quiet_gain = rg.end();

        rg.initialise(44100, 2);
        rg.process(&loud, &loud);
        let loud_gain = rg.end();

        assert_ne!(quiet_gain, GAIN_NOT_ENOUGH_SAMPLES);
        assert_ne!(loud_gain, GAIN_NOT_ENOUGH_SAMPLES);
        // 20 dB louder input -> ~20 dB less gain
        assert!(
            ((quiet_gain - loud_gain) - 20.0).abs() < 0.5,
            "quiet {} loud {}",
            quiet_gain,
            loud_gain
        );
    }

    #[test]
    fn chunking_does_not_change_result() {
        let signal = sine(48000, 440.0, 8000.0, 48000 * 2);

        let mut whole = ReplayGainAnalysis::new();
        whole.initialise(48000, 2);
        whole.process(&signal, &signal);

        let mut chunked = ReplayGainAnalysis::new();
        chunked.initialise(48000, 2);
        for chunk in signal.chunks(1000) {
            chunked.process(chunk, chunk);
        }

        assert_eq!(whole.end(), chunked.end());
    }

    #[test]
    fn mono_matches_identical_stereo() {
        let signal = sine(44100, 1000.0, 5000.0, 44100);

        let mut mono = ReplayGainAnalysis::new();
        mono.initialise(44100, 1);
        mono.process(&signal, &[]);

        let mut stereo = ReplayGainAnalysis::new();
        stereo.initialise(44100, 2);
        stereo.process(&signal, &signal);

        assert_eq!(mono.end(), stereo.end());
    }

    #[test]
    fn end_resets_for_next_track() {
        let mut rg = ReplayGainAnalysis::new();
        rg.initialise(44100, 2);
        let signal = sine(44100, 1000.0, 5000.0, 44100);
        rg.process(&signal, &signal);
        assert_ne!(rg.end(), GAIN_NOT_ENOUGH_SAMPLES);

        assert_eq!(rg.windows_analyzed(), 0);
        assert_eq!(rg.end(), GAIN_NOT_ENOUGH_SAMPLES);
    }
}
