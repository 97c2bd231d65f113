//! Pipeline output models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::scene::{EnhancedScene, TimelineSequence};
use crate::style::AspectRatio;

/// Which branch of the pipeline produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisPath {
    /// Built from a parsed oracle payload
    Oracle,
    /// Built from templates because the oracle output was unparsable
    Fallback,
}

impl SynthesisPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisPath::Oracle => "oracle",
            SynthesisPath::Fallback => "fallback",
        }
    }
}

impl fmt::Display for SynthesisPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top-level scene/camera/lighting summary of the whole video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PromptSummary {
    pub scene: String,
    pub camera: String,
    pub lighting: String,
}

/// Processing metadata attached to every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessingMetadata {
    /// Request correlation ID
    pub request_id: Uuid,

    /// Branch that produced the result
    pub path: SynthesisPath,

    /// Wall-clock time spent in the request, in milliseconds
    pub elapsed_ms: u64,

    /// Estimated oracle cost in USD
    pub estimated_cost_usd: f64,

    /// When the result was assembled
    pub generated_at: DateTime<Utc>,
}

/// Final multi-scene prompt returned to the caller.
///
/// Constructed once per request. Persistence is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedPromptResult {
    pub title: String,
    pub description: String,
    pub category: String,
    pub base_style: String,
    pub aspect_ratio: AspectRatio,
    pub summary: PromptSummary,
    pub negative_prompts: Vec<String>,
    pub timeline: Vec<TimelineSequence>,
    pub enhanced_scenes: Vec<EnhancedScene>,
    /// Completeness score, 0-100
    pub quality_score: u8,
    pub processing: ProcessingMetadata,
}

impl GeneratedPromptResult {
    pub fn scene_count(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_fallback(&self) -> bool {
        self.processing.path == SynthesisPath::Fallback
    }

    /// Total duration of the timeline in seconds.
    pub fn total_duration_secs(&self) -> u32 {
        self.timeline
            .last()
            .map(|s| s.timestamp.end_secs)
            .unwrap_or(0)
    }
}
