//! Timeline scene models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::TimeRange;

/// Per-scene overrides supplied by the oracle.
///
/// These travel with the timeline so enrichment stays a pure function of
/// the timeline and re-enriching a stored timeline reproduces the same scenes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SceneDirectives {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_setup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_movement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_grading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,
}

impl SceneDirectives {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One fixed-duration scene of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineSequence {
    /// 1-based position in the timeline
    pub sequence: u32,

    /// Derived time range, contiguous with the neighbouring scenes
    pub timestamp: TimeRange,

    /// What happens on screen
    pub action: String,

    /// Spoken line or voice-over
    pub dialogue: String,

    /// Background audio
    pub ambient_sound: String,

    /// Elements the video model must avoid
    pub negative_prompt: String,

    /// How the product appears in this scene
    pub product_description: String,

    /// Oracle-supplied overrides
    #[serde(default, skip_serializing_if = "SceneDirectives::is_empty")]
    pub directives: SceneDirectives,
}

/// Fixed realism requirements attached to every scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RealismFlags {
    pub physics_realism: bool,
    pub hand_accuracy: String,
}

impl RealismFlags {
    pub const HAND_ACCURACY: &'static str = "high-precision";

    pub fn is_set(&self) -> bool {
        self.physics_realism && !self.hand_accuracy.trim().is_empty()
    }
}

impl Default for RealismFlags {
    fn default() -> Self {
        Self {
            physics_realism: true,
            hand_accuracy: Self::HAND_ACCURACY.to_string(),
        }
    }
}

/// Presenter appearance copied from the character profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConsistencyMarkers {
    pub face: String,
    pub eyes: String,
    pub hair: String,
    pub clothing_palette: Vec<String>,
    pub build: String,
    pub skin_tone: String,
    pub camera_positioning: String,
}

impl ConsistencyMarkers {
    pub fn is_complete(&self) -> bool {
        [
            &self.face,
            &self.eyes,
            &self.hair,
            &self.build,
            &self.skin_tone,
            &self.camera_positioning,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
            && !self.clothing_palette.is_empty()
    }
}

/// Declarative guarantees downstream consumers are expected to honor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QualityProtocol {
    pub audio_hallucination_prevention: bool,
    pub physics_awareness: bool,
    pub consistency_validation: bool,
    pub professional_standards: bool,
}

impl QualityProtocol {
    pub fn all_enabled() -> Self {
        Self {
            audio_hallucination_prevention: true,
            physics_awareness: true,
            consistency_validation: true,
            professional_standards: true,
        }
    }

    pub fn is_fully_enabled(&self) -> bool {
        self.audio_hallucination_prevention
            && self.physics_awareness
            && self.consistency_validation
            && self.professional_standards
    }
}

/// A timeline scene plus derived technical attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnhancedScene {
    #[serde(flatten)]
    pub scene: TimelineSequence,

    pub environment: String,
    pub lighting: String,
    pub camera_setup: String,
    pub camera_movement: String,
    pub visual_style: String,
    pub color_grading: String,
    pub product_action: String,
    pub product_placement: String,
    pub realism: RealismFlags,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<ConsistencyMarkers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_protocol: Option<QualityProtocol>,
}

impl EnhancedScene {
    pub fn dialogue(&self) -> &str {
        &self.scene.dialogue
    }

    /// Whether every always-derived attribute is present.
    pub fn has_technical_attributes(&self) -> bool {
        [
            &self.environment,
            &self.lighting,
            &self.camera_setup,
            &self.camera_movement,
            &self.visual_style,
            &self.color_grading,
            &self.product_action,
            &self.product_placement,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
            && self.realism.is_set()
    }

    /// Whether the character consistency fields are populated.
    pub fn has_character_attributes(&self) -> bool {
        self.consistency.as_ref().is_some_and(|c| c.is_complete())
            && self
                .quality_protocol
                .as_ref()
                .is_some_and(|q| q.is_fully_enabled())
    }

    /// Whether title, description and scene description are all present.
    pub fn has_structural_fields(&self) -> bool {
        [&self.title, &self.description, &self.scene_description]
            .iter()
            .all(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}
