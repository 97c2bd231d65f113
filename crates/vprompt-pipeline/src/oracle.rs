//! Generative text oracle seam.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("Oracle request failed: {0}")]
    RequestFailed(String),

    #[error("Oracle timed out after {0}s")]
    Timeout(u64),

    #[error("Oracle returned an empty response")]
    EmptyResponse,
}

impl OracleError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}

/// External generative model that turns an instruction into free-form text.
///
/// Retries and timeouts belong to the implementation.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, instruction: &str) -> Result<String, OracleError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "oracle"
    }
}

/// Oracle that replays a fixed outcome.
#[derive(Debug, Clone)]
pub struct RecordedOracle {
    outcome: Result<String, OracleError>,
}

impl RecordedOracle {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            outcome: Ok(response.into()),
        }
    }

    pub fn failing(error: OracleError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl Oracle for RecordedOracle {
    async fn complete(&self, instruction: &str) -> Result<String, OracleError> {
        debug!(
            instruction_chars = instruction.len(),
            "Replaying recorded oracle response"
        );
        self.outcome.clone()
    }

    fn name(&self) -> &str {
        "recorded"
    }
}
