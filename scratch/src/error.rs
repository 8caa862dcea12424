//! Error types for template discovery, resolution and generation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while working with templates
#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("Can't find directory with templates: {path}")]
    TemplatesDirNotFound { path: PathBuf },

    #[error("Directory with templates {path} is not accessible: {reason}")]
    TemplatesDirAccess { path: PathBuf, reason: String },

    #[error("There is no template with name \"{name}\"")]
    TemplateNotFound { name: String },

    #[error("Problem with template \"{template}\": template contains unknown variable \"{variable}\"")]
    UnknownVariable { template: String, variable: String },

    #[error("Target {path} is not a directory")]
    TargetNotDirectory { path: PathBuf },

    #[error("Target directory {path} is not accessible: {reason}")]
    TargetAccess { path: PathBuf, reason: String },

    #[error("Target directory {path} is not empty (found \"{entry}\")")]
    TargetNotEmpty { path: PathBuf, entry: String },

    #[error("Invalid date format \"{format}\"")]
    InvalidDateFormat { format: String },

    #[error("Input aborted")]
    InputAborted(#[from] PromptError),

    #[error("IO error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk template directory")]
    Walk(#[from] walkdir::Error),
}

impl ScratchError {
    /// Wrap an IO error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from reading a line of user input
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("end of input")]
    Eof,

    #[error("interrupted")]
    Interrupted,

    #[error("read failed: {0}")]
    Read(String),
}

/// Result alias for template operations
pub type Result<T> = std::result::Result<T, ScratchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variable_message() {
        let err = ScratchError::UnknownVariable {
            template: "package".to_string(),
            variable: "FOO".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("package"));
        assert!(msg.contains("FOO"));
        assert!(msg.contains("unknown variable"));
    }

    #[test]
    fn test_target_not_empty_message() {
        let err = ScratchError::TargetNotEmpty {
            path: PathBuf::from("/tmp/target"),
            entry: "notes.txt".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("not empty"));
        assert!(msg.contains("notes.txt"));
    }

    #[test]
    fn test_prompt_error_converts() {
        let err: ScratchError = PromptError::Eof.into();
        assert!(matches!(err, ScratchError::InputAborted(PromptError::Eof)));
    }

    #[test]
    fn test_cause_not_repeated_in_message() {
        let err: ScratchError = PromptError::Eof.into();
        assert_eq!(err.to_string(), "Input aborted");
        assert_eq!(std::error::Error::source(&err).unwrap().to_string(), "end of input");

        let err = ScratchError::io("/tmp/x", std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "IO error on /tmp/x");
    }
}
