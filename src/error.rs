use thiserror::Error;

use crate::{
    analyzer::StructuralError, config::ConfigError, eval::EvalError, formatter::ReportingError,
    loader::LoadError, matcher::MatcherError, runner::RunError,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("speckle: {0}")]
    Structural(#[from] StructuralError),
    #[error("speckle: {0}")]
    Matcher(#[from] MatcherError),
    #[error("speckle: {0}")]
    Eval(#[from] EvalError),
    #[error("speckle: {0}")]
    Run(#[from] RunError),
    #[error("speckle: {0}")]
    Reporting(#[from] ReportingError),
    // config / loading
    #[error("speckle: {0}")]
    Config(#[from] ConfigError),
    #[error("speckle: {0}")]
    Load(#[from] LoadError),

    #[error("speckle: internal error: {0}")]
    Internal(String),
}

pub type SpeckleResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }

    /// The matcher failure behind this error, wherever it surfaced.
    pub fn matcher_error(&self) -> Option<&MatcherError> {
        match self {
            Error::Matcher(err) | Error::Eval(EvalError::Matcher(err)) => Some(err),
            Error::Run(err) => err.matcher_error(),
            _ => None,
        }
    }
}
