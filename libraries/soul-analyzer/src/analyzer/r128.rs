//! ReplayGain 2.0 analyzer backed by EBU R128 loudness

use super::Analyzer;
use crate::error::{AnalyzerError, Result};
use crate::settings::{ReplayGainSettings, REPLAYGAIN_V2};
use ebur128::{EbuR128, Mode};
use soul_core::{db_to_ratio, SampleRate, Track};

/// ReplayGain 2.0 reference loudness
pub const REPLAYGAIN2_REFERENCE_LUFS: f64 = -18.0;

/// Anything quieter than this is treated as silence
const SILENCE_THRESHOLD_LUFS: f64 = -70.0;

const CHANNELS: u32 = 2;

/// Measures integrated loudness and stores `-18 LUFS - loudness` as the
/// track's ReplayGain ratio.
pub struct AnalyzerEbur128 {
    settings: ReplayGainSettings,
    ebur128: Option<EbuR128>,
}

impl AnalyzerEbur128 {
    pub fn new(settings: ReplayGainSettings) -> Self {
        Self {
            settings,
            ebur128: None,
        }
    }

    fn add_frames(&mut self, samples: &[f32]) -> Result<()> {
        let Some(ebur128) = self.ebur128.as_mut() else {
            return Err(AnalyzerError::Ebur128("analyzer is not initialized".into()));
        };
        let whole_frames = samples.len() - samples.len() % CHANNELS as usize;
        ebur128.add_frames_f32(&samples[..whole_frames])?;
        Ok(())
    }

    /// Integrated loudness of everything fed since `initialize`
    fn loudness(&self) -> Result<f64> {
        let Some(ebur128) = self.ebur128.as_ref() else {
            return Err(AnalyzerError::Ebur128("analyzer is not initialized".into()));
        };
        Ok(ebur128.loudness_global()?)
    }
}

impl Analyzer for AnalyzerEbur128 {
    fn name(&self) -> &'static str {
        "AnalyzerEbur128"
    }

    fn initialize(&mut self, track: &Track, sample_rate: SampleRate, total_samples: usize) -> bool {
        if self.settings.is_analyzer_disabled(REPLAYGAIN_V2, track) || total_samples == 0 {
            tracing::debug!("Skipping AnalyzerEbur128");
            return false;
        }

        match EbuR128::new(CHANNELS, sample_rate.as_hz(), Mode::I) {
            Ok(state) => {
                self.ebur128 = Some(state);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Skipping AnalyzerEbur128 at {}: {}",
                    sample_rate,
                    AnalyzerError::from(e)
                );
                false
            }
        }
    }

    fn process_samples(&mut self, samples: &[f32]) -> bool {
        let _span = tracing::trace_span!("AnalyzerEbur128::process").entered();

        match self.add_frames(samples) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }

    fn store_results(&mut self, track: &mut Track) {
        let loudness = match self.loudness() {
            Ok(loudness) => loudness,
            Err(e) => {
                tracing::warn!("ReplayGain 2.0 (libebur128) analysis failed: {}", e);
                return;
            }
        };
        if !loudness.is_finite() || loudness < SILENCE_THRESHOLD_LUFS {
            tracing::warn!(
                "ReplayGain 2.0 (libebur128) analysis failed: average loudness {} LUFS is too quiet",
                loudness
            );
            return;
        }

        let gain_db = REPLAYGAIN2_REFERENCE_LUFS - loudness;
        let mut replay_gain = track.replay_gain();
        replay_gain.set_ratio(db_to_ratio(gain_db));
        track.set_replay_gain(replay_gain);
        tracing::debug!(
            "ReplayGain 2.0 (libebur128) result is {} dB for {}",
            gain_db,
            track.location().display()
        );
    }

    fn cleanup(&mut self) {
        self.ebur128 = None;
    }
}
