//! Synthesis request model and validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::CharacterProfile;
use crate::product::ProductMetadata;

/// Minimum number of scenes per prompt.
pub const MIN_SCENE_COUNT: usize = 2;

/// Maximum number of scenes per prompt.
pub const MAX_SCENE_COUNT: usize = 6;

/// Request to synthesize a multi-scene prompt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SynthesisRequest {
    /// Product the video is about; resolved by the caller
    #[serde(default)]
    pub product: Option<ProductMetadata>,

    /// Style profile id (e.g. "cinematic")
    pub style_id: String,

    /// Number of scenes, 2-6
    pub scene_count: usize,

    /// Extra requirements from the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_requirements: Option<String>,

    /// Presenter profile for character-driven styles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<CharacterProfile>,
}

impl SynthesisRequest {
    pub fn new(product: ProductMetadata, style_id: impl Into<String>, scene_count: usize) -> Self {
        Self {
            product: Some(product),
            style_id: style_id.into(),
            scene_count,
            custom_requirements: None,
            character: None,
        }
    }

    pub fn with_custom_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.custom_requirements = Some(requirements.into());
        self
    }

    pub fn with_character(mut self, character: CharacterProfile) -> Self {
        self.character = Some(character);
        self
    }

    /// Validate the request shape. Style ids are checked against the
    /// registry by the caller.
    pub fn validate(&self) -> Result<&ProductMetadata, RequestError> {
        if !(MIN_SCENE_COUNT..=MAX_SCENE_COUNT).contains(&self.scene_count) {
            return Err(RequestError::SceneCountOutOfRange(self.scene_count));
        }

        if self.style_id.trim().is_empty() {
            return Err(RequestError::MissingStyle);
        }

        self.product.as_ref().ok_or(RequestError::MissingProduct)
    }

    /// Custom requirements, if any non-blank text was given.
    pub fn custom_requirements(&self) -> Option<&str> {
        self.custom_requirements
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error(
        "Scene count {0} is outside the supported range {min}-{max}",
        min = MIN_SCENE_COUNT,
        max = MAX_SCENE_COUNT
    )]
    SceneCountOutOfRange(usize),

    #[error("Style must be specified")]
    MissingStyle,

    #[error("Product metadata is missing")]
    MissingProduct,
}
