//! Structured synthesis logging.
//!
//! Lifecycle logging for a single synthesis request with the request id and
//! style attached to every event.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

/// Logger for one synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesisLogger {
    request_id: String,
    style_id: String,
}

impl SynthesisLogger {
    pub fn new(request_id: &Uuid, style_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            style_id: style_id.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            style = %self.style_id,
            "Synthesis started: {}", message
        );
    }

    /// Log a stage transition.
    pub fn log_stage(&self, from: &str, to: &str) {
        info!(
            request_id = %self.request_id,
            style = %self.style_id,
            from,
            to,
            "Synthesis stage transition"
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            request_id = %self.request_id,
            style = %self.style_id,
            "Synthesis warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            request_id = %self.request_id,
            style = %self.style_id,
            "Synthesis error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            request_id = %self.request_id,
            style = %self.style_id,
            "Synthesis completed: {}", message
        );
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    /// Create a tracing span for this request.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "synthesis",
            request_id = %self.request_id,
            style = %self.style_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_logger_creation() {
        let request_id = Uuid::new_v4();
        let logger = SynthesisLogger::new(&request_id, "cinematic");

        assert_eq!(logger.request_id(), request_id.to_string());
        assert_eq!(logger.style_id(), "cinematic");
    }
}
