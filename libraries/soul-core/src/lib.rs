//! Soul Core
//!
//! Platform-agnostic domain types and error handling shared by the analysis
//! crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `ReplayGain`, `TrackId`, `SampleRate`
//! - **Gain Math**: decibel/ratio conversions used wherever a gain is stored
//! - **Error Handling**: Unified `SoulError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use soul_core::types::{ReplayGain, Track};
//! use std::path::PathBuf;
//!
//! let mut track = Track::new("My Favorite Song", PathBuf::from("/music/song.flac"));
//! assert!(!track.replay_gain().has_ratio());
//!
//! let mut gain = track.replay_gain();
//! gain.set_ratio(soul_core::types::db_to_ratio(-6.0));
//! track.set_replay_gain(gain);
//! assert!(track.replay_gain().has_ratio());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{Result, SoulError};

pub use types::{db_to_ratio, ratio_to_db, ReplayGain, SampleRate, Track, TrackId};
