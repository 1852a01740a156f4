//! Error types for contour reconstruction

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContourError>;

/// The external pitch estimator could not produce a usable estimate.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Could not allocate scratch artifact: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("Failed to run estimator '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Estimator exited with status {}: {stderr}", display_code(.code))]
    Exited { code: Option<i32>, stderr: String },

    #[error("Estimator did not finish within {timeout:?}")]
    TimedOut { timeout: Duration },

    #[error("Estimator output '{path}' could not be read: {source}")]
    MissingOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed estimator output at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl CollaboratorError {
    pub fn malformed<S: Into<String>>(line: usize, reason: S) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

/// Failure of a single analysis call. No partial contour accompanies it.
#[derive(Error, Debug)]
pub enum ContourError {
    #[error("Pitch estimator failed: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Pitch estimator found no voiced frames")]
    EmptyEstimate,

    #[error("Cannot infer contour rate from {samples} estimate sample(s)")]
    UnresolvableRate { samples: usize },

    #[error("Audio loading error: {0}")]
    AudioLoad(String),
}

impl ContourError {
    pub fn audio_load<S: Into<String>>(msg: S) -> Self {
        Self::AudioLoad(msg.into())
    }
}
