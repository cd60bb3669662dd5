//! Analyzer settings
//!
//! Decides which ReplayGain analyzer runs and whether tracks that already
//! carry a gain are analyzed again. Settings load from an optional TOML file
//! with `SOUL_ANALYZER__*` environment overrides, e.g.
//! `SOUL_ANALYZER__REPLAYGAIN__REANALYZE=true`. Nesting uses `__` everywhere,
//! including after the prefix.

use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use soul_core::Track;
use std::path::Path;

const ENV_PREFIX: &str = "SOUL_ANALYZER";

/// ReplayGain 1.0 (classic RMS/equal-loudness analysis)
pub const REPLAYGAIN_V1: u8 = 1;

/// ReplayGain 2.0 (EBU R128 based)
pub const REPLAYGAIN_V2: u8 = 2;

/// Top-level analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub replaygain: ReplayGainSettings,
}

/// ReplayGain analysis preferences
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplayGainSettings {
    /// Analyze tracks when they are first loaded
    #[serde(default = "default_initial_analysis")]
    pub initial_analysis: bool,

    /// Re-analyze tracks that already have a ReplayGain ratio
    #[serde(default)]
    pub reanalyze: bool,

    /// Which analyzer version is preferred (1 or 2)
    #[serde(default = "default_analyzer_version")]
    pub analyzer_version: u8,
}

impl ReplayGainSettings {
    /// Whether the analyzer of the given `version` should skip `track`
    pub fn is_analyzer_disabled(&self, version: u8, track: &Track) -> bool {
        let enabled = self.initial_analysis && version == self.analyzer_version;
        if !enabled {
            return true;
        }
        if self.reanalyze {
            return false;
        }
        track.replay_gain().has_ratio()
    }

    pub fn validate(&self) -> Result<()> {
        if !(REPLAYGAIN_V1..=REPLAYGAIN_V2).contains(&self.analyzer_version) {
            return Err(AnalyzerError::Config(format!(
                "Unknown ReplayGain analyzer version {} (expected 1 or 2)",
                self.analyzer_version
            )));
        }
        Ok(())
    }
}

impl Default for ReplayGainSettings {
    fn default() -> Self {
        Self {
            initial_analysis: default_initial_analysis(),
            reanalyze: false,
            analyzer_version: default_analyzer_version(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), but reads overrides from `env` instead of
    /// the process environment when given
    fn load_with_env(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(AnalyzerError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.replaygain.validate()
    }
}

fn default_initial_analysis() -> bool {
    true
}

fn default_analyzer_version() -> u8 {
    REPLAYGAIN_V2
}
