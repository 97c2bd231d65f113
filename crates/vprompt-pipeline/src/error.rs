//! Pipeline error types.

use thiserror::Error;

use vprompt_models::{RequestError, StyleParseError, StyleRegistryError};

use crate::oracle::OracleError;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    #[error("Postcondition violated: {0}")]
    PostconditionViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn postcondition(msg: impl Into<String>) -> Self {
        Self::PostconditionViolation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Caller-side request problem; fixing the request fixes the error.
    pub fn is_precondition(&self) -> bool {
        matches!(self, PipelineError::Precondition(_))
    }

    /// Defect inside the pipeline itself.
    pub fn is_internal(&self) -> bool {
        matches!(self, PipelineError::PostconditionViolation(_))
    }

    /// Check if the request may succeed when repeated unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::OracleUnavailable(OracleError::RequestFailed(_) | OracleError::Timeout(_))
        )
    }
}

impl From<RequestError> for PipelineError {
    fn from(err: RequestError) -> Self {
        Self::Precondition(err.to_string())
    }
}

impl From<StyleParseError> for PipelineError {
    fn from(err: StyleParseError) -> Self {
        Self::Precondition(err.to_string())
    }
}

impl From<StyleRegistryError> for PipelineError {
    fn from(err: StyleRegistryError) -> Self {
        Self::Config(err.to_string())
    }
}
