//! Synthesis metrics.
//!
//! Counters and histograms for the prompt pipeline. Recording is a no-op
//! until the embedding application installs a recorder.

use metrics::{counter, histogram};

use vprompt_models::SynthesisPath;

/// Metric name constants for consistency.
pub mod names {
    /// Completed syntheses by path.
    pub const SYNTHESIS_TOTAL: &str = "vprompt_synthesis_total";

    /// Oracle responses that could not be parsed, by reason.
    pub const PARSE_FAILURES_TOTAL: &str = "vprompt_parse_failures_total";

    /// Quality score distribution by path.
    pub const QUALITY_SCORE: &str = "vprompt_quality_score";

    /// End-to-end synthesis latency in seconds.
    pub const SYNTHESIS_LATENCY_SECONDS: &str = "vprompt_synthesis_latency_seconds";
}

/// Record a completed synthesis.
pub fn record_synthesis(path: SynthesisPath, quality_score: u8, latency_ms: f64) {
    let path = path.as_str();

    counter!(names::SYNTHESIS_TOTAL, "path" => path).increment(1);

    histogram!(names::QUALITY_SCORE, "path" => path).record(f64::from(quality_score));

    histogram!(names::SYNTHESIS_LATENCY_SECONDS, "path" => path).record(latency_ms / 1000.0);
}

/// Record an unparseable oracle response.
pub fn record_parse_failure(reason: &'static str) {
    counter!(names::PARSE_FAILURES_TOTAL, "reason" => reason).increment(1);
}
