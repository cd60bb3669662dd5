//! Track analysis for Soul
//!
//! This crate provides:
//! - ReplayGain 1.0 loudness analysis (equal-loudness filter, RMS histogram)
//! - An `Analyzer` lifecycle shared by all per-track analyzers
//! - `AnalyzerGain` (ReplayGain 1.0) and `AnalyzerEbur128` (ReplayGain 2.0)
//! - A pipeline that feeds decoded audio through the analyzers in chunks
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │ Stereo f32   │ ──► │ AnalysisPipeline │ ──► │ Analyzer(s)     │
//! └──────────────┘     └──────────────────┘     └─────────────────┘
//!                                                        │
//!                                                        ▼
//!                                               ┌─────────────────┐
//!                                               │ Track gain ratio│
//!                                               └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use soul_analyzer::{AnalysisPipeline, AnalyzerConfig};
//! use soul_core::{SampleRate, Track};
//!
//! let config = AnalyzerConfig::load(None)?;
//! let mut pipeline = AnalysisPipeline::from_config(&config);
//!
//! let mut track = Track::from_path("/music/song.flac");
//! pipeline.analyze(&mut track, SampleRate::CD_QUALITY, &interleaved_stereo);
//!
//! if let Some(db) = track.replay_gain().ratio_db() {
//!     println!("Track gain: {:.2} dB", db);
//! }
//! ```

pub mod analyzer;
mod error;
mod pipeline;
pub mod replaygain;
pub mod sample;
pub mod settings;

pub use analyzer::{Analyzer, AnalyzerEbur128, AnalyzerGain};
pub use error::{AnalyzerError, Result};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, ANALYSIS_CHUNK_FRAMES};
pub use replaygain::{GainAlgorithm, ReplayGainAnalysis, GAIN_NOT_ENOUGH_SAMPLES};
pub use settings::{AnalyzerConfig, ReplayGainSettings, REPLAYGAIN_V1, REPLAYGAIN_V2};
