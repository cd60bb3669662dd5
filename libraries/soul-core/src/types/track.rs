/// Track domain type
use crate::types::{ReplayGain, TrackId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Audio track as seen by the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Track duration in milliseconds
    pub duration_ms: Option<u64>,

    /// File path on disk
    location: PathBuf,

    /// ReplayGain record, undefined until analyzed
    #[serde(default)]
    replay_gain: ReplayGain,

    /// Set whenever a setter changes a stored value
    #[serde(skip)]
    dirty: bool,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(title: impl Into<String>, location: PathBuf) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.into(),
            duration_ms: None,
            location,
            replay_gain: ReplayGain::default(),
            dirty: false,
        }
    }

    /// Create a track titled after its file stem
    pub fn from_path(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let title = location
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(title, location)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn replay_gain(&self) -> ReplayGain {
        self.replay_gain
    }

    /// Replace the ReplayGain record
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_replay_gain(&mut self, replay_gain: ReplayGain) -> bool {
        if self.replay_gain == replay_gain {
            return false;
        }
        self.replay_gain = replay_gain;
        self.dirty = true;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    /// Set the track duration from a Duration
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = Some(duration.as_millis() as u64);
    }
}
