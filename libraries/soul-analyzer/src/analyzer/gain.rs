//! ReplayGain 1.0 analyzer

use super::Analyzer;
use crate::replaygain::{GainAlgorithm, ReplayGainAnalysis, GAIN_NOT_ENOUGH_SAMPLES};
use crate::sample::{apply_gain, deinterleave_buffer, FULL_SCALE_S16};
use crate::settings::{ReplayGainSettings, REPLAYGAIN_V1};
use soul_core::{db_to_ratio, SampleRate, Track};

const CHANNELS: usize = 2;

/// Feeds deinterleaved stereo to a ReplayGain 1.0 analysis and stores the
/// resulting gain on the track as a ratio.
///
/// The scratch channel buffers grow to the largest chunk seen and are reused
/// for later chunks and tracks; they never shrink.
pub struct AnalyzerGain<A = ReplayGainAnalysis> {
    settings: ReplayGainSettings,
    algorithm: A,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl AnalyzerGain {
    pub fn new(settings: ReplayGainSettings) -> Self {
        Self::with_algorithm(settings, ReplayGainAnalysis::new())
    }
}

impl<A: GainAlgorithm> AnalyzerGain<A> {
    /// Use a specific gain algorithm implementation
    pub fn with_algorithm(settings: ReplayGainSettings, algorithm: A) -> Self {
        Self {
            settings,
            algorithm,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Current length of each scratch channel buffer
    pub fn scratch_len(&self) -> usize {
        self.left.len()
    }

    fn ensure_scratch(&mut self, frames: usize) {
        if frames > self.left.len() {
            self.left.resize(frames, 0.0);
            self.right.resize(frames, 0.0);
        }
    }
}

impl<A: GainAlgorithm> Analyzer for AnalyzerGain<A> {
    fn name(&self) -> &'static str {
        "AnalyzerGain"
    }

    fn initialize(&mut self, track: &Track, sample_rate: SampleRate, total_samples: usize) -> bool {
        if self.settings.is_analyzer_disabled(REPLAYGAIN_V1, track) || total_samples == 0 {
            tracing::debug!("Skipping AnalyzerGain");
            return false;
        }

        self.algorithm.initialise(sample_rate.as_hz(), CHANNELS)
    }

    fn process_samples(&mut self, samples: &[f32]) -> bool {
        let _span = tracing::trace_span!("AnalyzerGain::process").entered();

        let frames = samples.len() / CHANNELS;
        self.ensure_scratch(frames);

        let left = &mut self.left[..frames];
        let right = &mut self.right[..frames];
        deinterleave_buffer(left, right, samples, frames);
        apply_gain(left, FULL_SCALE_S16);
        apply_gain(right, FULL_SCALE_S16);

        self.algorithm.process(left, right)
    }

    fn store_results(&mut self, track: &mut Track) {
        let gain_db = self.algorithm.end();
        if gain_db == GAIN_NOT_ENOUGH_SAMPLES || !gain_db.is_finite() {
            tracing::warn!("ReplayGain 1.0 analysis failed");
            return;
        }

        let mut replay_gain = track.replay_gain();
        replay_gain.set_ratio(db_to_ratio(f64::from(gain_db)));
        track.set_replay_gain(replay_gain);
        tracing::debug!(
            "ReplayGain 1.0 result is {} dB for {}",
            gain_db,
            track.location().display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_core::ReplayGain;

    fn enabled_settings() -> ReplayGainSettings {
        ReplayGainSettings {
            analyzer_version: REPLAYGAIN_V1,
            ..Default::default()
        }
    }

    #[test]
    fn scratch_grows_to_largest_chunk() {
        let mut analyzer = AnalyzerGain::new(enabled_settings());
        let track = Track::from_path("/music/a.flac");
        assert!(analyzer.initialize(&track, SampleRate::CD_QUALITY, 44100 * 2));
        assert_eq!(analyzer.scratch_len(), 0);

        analyzer.process_samples(&[0.1; 512]);
        assert_eq!(analyzer.scratch_len(), 256);
        analyzer.process_samples(&[0.1; 128]);
        assert_eq!(analyzer.scratch_len(), 256);
        analyzer.process_samples(&[0.1; 1024]);
        assert_eq!(analyzer.scratch_len(), 512);
    }

    #[test]
    fn unsupported_rate_fails_initialize() {
        let mut analyzer = AnalyzerGain::new(enabled_settings());
        let track = Track::from_path("/music/a.flac");
        assert!(!analyzer.initialize(&track, SampleRate::new(192_000), 1000));
    }

    #[test]
    fn sine_gets_a_ratio_and_keeps_peak() {
        let mut analyzer = AnalyzerGain::new(enabled_settings());
        let mut track = Track::from_path("/music/sine.wav");
        track.set_replay_gain(ReplayGain::new(0.0, 0.75));

        let frames = 44100 * 2;
        let mut samples = Vec::with_capacity(frames * 2);
        for i in 0..frames {
            let t = i as f32 / 44100.0;
            let s = 0.25 * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
            samples.push(s);
            samples.push(s);
        }

        assert!(analyzer.initialize(&track, SampleRate::CD_QUALITY, samples.len()));
        for chunk in samples.chunks(8192) {
            assert!(analyzer.process_samples(chunk));
        }
        analyzer.store_results(&mut track);

        let gain = track.replay_gain();
        assert!(gain.has_ratio());
        assert_eq!(gain.peak(), 0.75);
        // A -12 dBFS 1 kHz tone is well above the reference loudness
        assert!(gain.ratio() < 1.0, "ratio {}", gain.ratio());
    }
}
