//! Presenter character profile.
//!
//! Used to keep an on-screen presenter visually consistent across scenes
//! for character-driven styles.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed set of descriptive presenter attributes. Never mutated by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CharacterProfile {
    pub name: String,
    pub age_range: String,
    pub gender: String,
    pub ethnicity: String,
    pub skin_tone: String,
    pub face_shape: String,
    pub facial_features: String,
    pub eye_color: String,
    pub eye_shape: String,
    pub hair_color: String,
    pub hair_style: String,
    pub hair_length: String,
    pub build: String,
    pub height: String,
    pub posture: String,
    pub clothing_style: String,
    pub clothing_palette: Vec<String>,
    pub accessories: String,
    pub makeup_style: String,
    pub voice_tone: String,
    pub speaking_pace: String,
    /// Overall demeanour on camera (e.g. "warm and candid")
    pub behavioral_tone: String,
    /// How the presenter relates to the camera (e.g. "speaks directly to lens")
    pub camera_relationship: String,
    /// Preferred shooting angle (e.g. "slightly above eye level")
    pub preferred_angle: String,
}

impl CharacterProfile {
    /// One-line appearance summary used in instructions and fallback text.
    pub fn appearance_summary(&self) -> String {
        let parts = [
            self.age_range.as_str(),
            self.gender.as_str(),
            self.build.as_str(),
        ];
        let mut summary = join_present(&parts, " ");
        let hair = join_present(
            &[
                self.hair_length.as_str(),
                self.hair_color.as_str(),
                self.hair_style.as_str(),
            ],
            " ",
        );
        if !hair.is_empty() {
            if !summary.is_empty() {
                summary.push_str(" with ");
            }
            summary.push_str(&hair);
            summary.push_str(" hair");
        }
        if summary.is_empty() {
            "the presenter".to_string()
        } else {
            summary
        }
    }

    /// Clothing palette joined for display.
    pub fn palette_text(&self) -> String {
        join_present(
            &self
                .clothing_palette
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            ", ",
        )
    }

    /// Name to use in generated text.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "the presenter"
        } else {
            name
        }
    }
}

fn join_present(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
