use std::path::PathBuf;

use thiserror::Error;

pub type AppResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed target '{spec}': {reason}")]
    MalformedTarget { spec: String, reason: String },

    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("failed to parse source file: {}", .0.display())]
    Parse(PathBuf),

    #[error("test runner failed: {0}")]
    Runner(String),

    #[error("baseline test run failed before any mutation: {0}")]
    Baseline(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn malformed(spec: &str, reason: &str) -> Self {
        Self::MalformedTarget {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }
}
