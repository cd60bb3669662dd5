//! Error types for track analysis
//!
//! Analysis outcomes ("not applicable", "not enough samples") are reported
//! through the `Analyzer` return values, not through these errors.

use thiserror::Error;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors raised while configuring or driving analyzers
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Settings could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// EBU R128 backend error
    #[error("EBU R128 analysis failed: {0}")]
    Ebur128(String),
}

impl From<ebur128::Error> for AnalyzerError {
    fn from(err: ebur128::Error) -> Self {
        Self::Ebur128(err.to_string())
    }
}

impl From<config::ConfigError> for AnalyzerError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<AnalyzerError> for soul_core::SoulError {
    fn from(err: AnalyzerError) -> Self {
        soul_core::SoulError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ebur128_errors_keep_their_message() {
        let err = AnalyzerError::from(ebur128::Error::InvalidMode);
        assert!(matches!(err, AnalyzerError::Ebur128(_)));
        assert_eq!(err.to_string(), "EBU R128 analysis failed: Invalid Mode");
    }

    #[test]
    fn converts_into_soul_error() {
        let err: soul_core::SoulError = AnalyzerError::Config("bad version".into()).into();
        assert_eq!(err.to_string(), "Configuration error: bad version");
    }
}
