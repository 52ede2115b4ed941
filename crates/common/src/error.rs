//! Error types shared across Tapwise crates.

use std::path::PathBuf;

/// Top-level error type for Tapwise operations.
///
/// The classifier itself never fails; these errors come from the edges
/// (configuration files, touch scripts, output writers, the CLI).
#[derive(Debug, thiserror::Error)]
pub enum TapwiseError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Touch script error at line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Replay error: {message}")]
    Replay { message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TapwiseError.
pub type TapwiseResult<T> = Result<T, TapwiseError>;

impl TapwiseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn script(line: usize, msg: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: msg.into(),
        }
    }

    pub fn replay(msg: impl Into<String>) -> Self {
        Self::Replay {
            message: msg.into(),
        }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_error_mentions_line() {
        let err = TapwiseError::script(7, "unknown phase");
        assert_eq!(
            err.to_string(),
            "Touch script error at line 7: unknown phase"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TapwiseError = io.into();
        assert!(matches!(err, TapwiseError::Io(_)));
    }
}
