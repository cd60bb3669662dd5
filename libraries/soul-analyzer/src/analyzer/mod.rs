//! Per-track analyzers
//!
//! An analyzer is driven through the same lifecycle for every track:
//!
//! ```text
//! initialize ──► process_samples (repeated per chunk) ──► store_results ──► cleanup
//!     │
//!     └── false: not applicable, the analyzer sits out this track
//! ```

mod gain;
mod r128;

pub use gain::AnalyzerGain;
pub use r128::AnalyzerEbur128;

use soul_core::{SampleRate, Track};

/// A stage of the track analysis pipeline
pub trait Analyzer {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Prepare for `track`. `total_samples` counts interleaved samples.
    ///
    /// Returns `false` if this analyzer does not apply to the track.
    fn initialize(&mut self, track: &Track, sample_rate: SampleRate, total_samples: usize) -> bool;

    /// Analyze one chunk of interleaved stereo samples
    fn process_samples(&mut self, samples: &[f32]) -> bool;

    /// Write the analysis result onto `track`, if there is one
    fn store_results(&mut self, track: &mut Track);

    /// Release per-track resources
    fn cleanup(&mut self) {}
}
