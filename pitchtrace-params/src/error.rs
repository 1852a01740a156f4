//! Error types for parameter parsing

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParamsError>;

/// Errors raised while parsing textual overrides.
///
/// Merging overrides never fails; see [`crate::ParameterWarning`] for the
/// diagnostics produced there.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("Invalid assignment '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),

    #[error("Invalid value '{0}': expected a number or boolean")]
    InvalidValue(String),
}

impl ParamsError {
    pub fn assignment<S: Into<String>>(msg: S) -> Self {
        Self::InvalidAssignment(msg.into())
    }

    pub fn value<S: Into<String>>(msg: S) -> Self {
        Self::InvalidValue(msg.into())
    }
}
