//! Drives a set of analyzers over one track's audio
//!
//! Analyzers that decline a track at `initialize` never see its samples.
//! One that fails on a chunk is cleaned up and dropped for the rest of the
//! track; the others carry on.

use crate::analyzer::{Analyzer, AnalyzerEbur128, AnalyzerGain};
use crate::settings::AnalyzerConfig;
use serde::Serialize;
use soul_core::{SampleRate, Track};

/// Frames handed to the analyzers per `process_samples` call
pub const ANALYSIS_CHUNK_FRAMES: usize = 4096;

const CHANNELS: usize = 2;

/// What happened to each analyzer for one track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisOutcome {
    /// Analyzers that ran to `store_results`
    pub completed: usize,
    /// Analyzers that declined the track at `initialize`
    pub skipped: usize,
    /// Analyzers dropped after a failed chunk
    pub failed: usize,
}

pub struct AnalysisPipeline {
    analyzers: Vec<Box<dyn Analyzer>>,
    chunk_frames: usize,
}

impl AnalysisPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            analyzers: Vec::new(),
            chunk_frames: ANALYSIS_CHUNK_FRAMES,
        }
    }

    /// Pipeline with both ReplayGain analyzers; the settings pick which one runs
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new()
            .with_analyzer(AnalyzerGain::new(config.replaygain.clone()))
            .with_analyzer(AnalyzerEbur128::new(config.replaygain.clone()))
    }

    pub fn with_analyzer(mut self, analyzer: impl Analyzer + 'static) -> Self {
        self.add_analyzer(Box::new(analyzer));
        self
    }

    pub fn add_analyzer(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Override the chunk size (in frames, at least 1)
    pub fn with_chunk_frames(mut self, frames: usize) -> Self {
        self.chunk_frames = frames.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Run every analyzer over interleaved stereo `samples` for `track`
    pub fn analyze(
        &mut self,
        track: &mut Track,
        sample_rate: SampleRate,
        samples: &[f32],
    ) -> AnalysisOutcome {
        let mut outcome = AnalysisOutcome::default();
        let mut active = Vec::with_capacity(self.analyzers.len());

        for (index, analyzer) in self.analyzers.iter_mut().enumerate() {
            if analyzer.initialize(track, sample_rate, samples.len()) {
                active.push(index);
            } else {
                outcome.skipped += 1;
            }
        }

        if active.is_empty() {
            tracing::debug!("No analyzer applies to {}", track.location().display());
            return outcome;
        }

        for chunk in samples.chunks(self.chunk_frames * CHANNELS) {
            active.retain(|&index| {
                let analyzer = &mut self.analyzers[index];
                if analyzer.process_samples(chunk) {
                    return true;
                }
                tracing::warn!(
                    "{} failed while processing {}",
                    analyzer.name(),
                    track.location().display()
                );
                analyzer.cleanup();
                outcome.failed += 1;
                false
            });
            if active.is_empty() {
                break;
            }
        }

        for &index in &active {
            let analyzer = &mut self.analyzers[index];
            analyzer.store_results(track);
            analyzer.cleanup();
            outcome.completed += 1;
        }

        outcome
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}
