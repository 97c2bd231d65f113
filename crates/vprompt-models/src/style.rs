//! Video style profiles and the style registry.
//!
//! A style profile is a named bundle of preferred and avoided attribute
//! values per [`StyleDimension`]. Profiles are immutable values; the
//! registry is built once and passed explicitly to whoever needs it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Attribute dimension a style expresses preferences for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StyleDimension {
    Lighting,
    Camera,
    Movement,
    ColorGrading,
    Environment,
}

impl StyleDimension {
    pub const ALL: &'static [StyleDimension] = &[
        StyleDimension::Lighting,
        StyleDimension::Camera,
        StyleDimension::Movement,
        StyleDimension::ColorGrading,
        StyleDimension::Environment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleDimension::Lighting => "lighting",
            StyleDimension::Camera => "camera",
            StyleDimension::Movement => "movement",
            StyleDimension::ColorGrading => "color_grading",
            StyleDimension::Environment => "environment",
        }
    }
}

impl fmt::Display for StyleDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How spoken audio is delivered in a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueMode {
    /// On-camera presenter speaking to the viewer
    Spoken,
    /// Off-camera narration
    #[default]
    VoiceOver,
}

/// Preferred and avoided values for one dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DimensionPreferences {
    #[serde(default)]
    pub preferred: Vec<String>,
    #[serde(default)]
    pub avoided: Vec<String>,
}

/// Named style profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoStyleProfile {
    /// Registry key (e.g. "cinematic", "ai-vlogs")
    pub id: String,

    /// Human-readable name
    pub display_name: String,

    /// Whether scenes feature a recurring on-screen presenter
    #[serde(default)]
    pub character_driven: bool,

    /// Spoken or voice-over dialogue
    #[serde(default)]
    pub dialogue_mode: DialogueMode,

    /// Output aspect ratio
    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    /// Preferences per dimension
    #[serde(default)]
    pub dimensions: BTreeMap<StyleDimension, DimensionPreferences>,
}

impl VideoStyleProfile {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            character_driven: false,
            dialogue_mode: DialogueMode::VoiceOver,
            aspect_ratio: AspectRatio::default(),
            dimensions: BTreeMap::new(),
        }
    }

    pub fn character_driven(mut self, dialogue_mode: DialogueMode) -> Self {
        self.character_driven = true;
        self.dialogue_mode = dialogue_mode;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_dimension(
        mut self,
        dimension: StyleDimension,
        preferred: &[&str],
        avoided: &[&str],
    ) -> Self {
        self.dimensions.insert(
            dimension,
            DimensionPreferences {
                preferred: preferred.iter().map(|s| s.to_string()).collect(),
                avoided: avoided.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    /// Preferred values for a dimension, most preferred first.
    pub fn preferred(&self, dimension: StyleDimension) -> &[String] {
        self.dimensions
            .get(&dimension)
            .map(|d| d.preferred.as_slice())
            .unwrap_or(&[])
    }

    /// Avoided values for a dimension.
    pub fn avoided(&self, dimension: StyleDimension) -> &[String] {
        self.dimensions
            .get(&dimension)
            .map(|d| d.avoided.as_slice())
            .unwrap_or(&[])
    }

    /// First preferred value for a dimension, if the profile declares one.
    pub fn first_preferred(&self, dimension: StyleDimension) -> Option<&str> {
        self.preferred(dimension)
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }

    /// Every avoided value across all dimensions, in dimension order.
    pub fn avoided_all(&self) -> Vec<&str> {
        StyleDimension::ALL
            .iter()
            .flat_map(|d| self.avoided(*d).iter().map(String::as_str))
            .collect()
    }

    pub fn is_vlog(&self) -> bool {
        self.character_driven && self.dialogue_mode == DialogueMode::Spoken
    }
}

/// Immutable lookup table of style profiles keyed by id.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    profiles: BTreeMap<String, VideoStyleProfile>,
}

impl StyleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the builtin profiles.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for profile in builtin_profiles() {
            registry.insert(profile);
        }
        registry
    }

    /// Add or replace a profile. Ids are matched case-insensitively.
    pub fn insert(&mut self, profile: VideoStyleProfile) {
        self.profiles.insert(normalize_id(&profile.id), profile);
    }

    /// Extend with profiles from a JSON array. A profile whose id already
    /// exists replaces the existing one.
    pub fn with_profiles_json(mut self, json: &str) -> Result<Self, StyleRegistryError> {
        let profiles: Vec<VideoStyleProfile> = serde_json::from_str(json)
            .map_err(|e| StyleRegistryError::InvalidProfiles(e.to_string()))?;
        for profile in profiles {
            if profile.id.trim().is_empty() {
                return Err(StyleRegistryError::InvalidProfiles(
                    "style profile id cannot be empty".to_string(),
                ));
            }
            self.insert(profile);
        }
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&VideoStyleProfile> {
        self.profiles.get(&normalize_id(id))
    }

    /// Look up a profile, failing on unknown ids.
    pub fn resolve(&self, id: &str) -> Result<&VideoStyleProfile, StyleParseError> {
        self.get(id).ok_or_else(|| StyleParseError(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.values().map(|p| p.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase().replace('_', "-")
}

#[derive(Debug, Error)]
#[error("Unknown style: {0}")]
pub struct StyleParseError(pub String);

#[derive(Debug, Error)]
pub enum StyleRegistryError {
    #[error("Invalid style profiles: {0}")]
    InvalidProfiles(String),
}

fn builtin_profiles() -> Vec<VideoStyleProfile> {
    use StyleDimension::*;

    vec![
        VideoStyleProfile::new("cinematic", "Cinematic")
            .with_aspect_ratio(AspectRatio::WIDESCREEN)
            .with_dimension(
                Lighting,
                &["golden hour rim lighting", "low-key dramatic lighting", "soft volumetric haze"],
                &["flat fluorescent lighting", "harsh on-camera flash"],
            )
            .with_dimension(
                Camera,
                &["anamorphic 35mm lens, shallow depth of field", "85mm portrait lens"],
                &["smartphone front camera", "fisheye distortion"],
            )
            .with_dimension(
                Movement,
                &["slow dolly push-in", "smooth gimbal orbit", "crane reveal"],
                &["shaky handheld", "rapid whip pans"],
            )
            .with_dimension(
                ColorGrading,
                &["teal and orange film grade", "rich filmic contrast"],
                &["oversaturated colors", "washed-out grading"],
            )
            .with_dimension(
                Environment,
                &["moody studio set with practical lights", "sweeping outdoor vista at dusk"],
                &["cluttered background", "plain white wall"],
            ),
        VideoStyleProfile::new("ai-vlogs", "AI Vlog")
            .character_driven(DialogueMode::Spoken)
            .with_aspect_ratio(AspectRatio::PORTRAIT)
            .with_dimension(
                Lighting,
                &["soft natural window light", "warm ring light"],
                &["dramatic chiaroscuro", "underexposed shadows"],
            )
            .with_dimension(
                Camera,
                &["smartphone selfie framing at arm's length", "24mm wide lens at eye level"],
                &["telephoto compression", "extreme low angle"],
            )
            .with_dimension(
                Movement,
                &["natural handheld sway", "walk-and-talk tracking"],
                &["robotic motion control", "static locked-off frame"],
            )
            .with_dimension(
                ColorGrading,
                &["bright true-to-life colors", "warm social-media grade"],
                &["heavy film grain", "monochrome"],
            )
            .with_dimension(
                Environment,
                &["cozy lived-in apartment", "bright coffee shop corner"],
                &["sterile laboratory", "empty void background"],
            ),
        VideoStyleProfile::new("product-showcase", "Product Showcase")
            .with_aspect_ratio(AspectRatio::SQUARE)
            .with_dimension(
                Lighting,
                &["three-point softbox studio lighting", "clean high-key lighting"],
                &["mixed color temperatures", "harsh direct sunlight"],
            )
            .with_dimension(
                Camera,
                &["100mm macro lens", "50mm lens on slider"],
                &["wide-angle distortion", "smartphone framing"],
            )
            .with_dimension(
                Movement,
                &["slow 360-degree turntable rotation", "precise motion-control glide"],
                &["handheld shake", "abrupt zooms"],
            )
            .with_dimension(
                ColorGrading,
                &["neutral color-accurate grade", "crisp commercial grade"],
                &["stylized color casts", "vintage fade"],
            )
            .with_dimension(
                Environment,
                &["seamless gradient backdrop", "minimal pedestal on reflective surface"],
                &["busy real-world location", "distracting props"],
            ),
        VideoStyleProfile::new("lifestyle", "Lifestyle")
            .with_aspect_ratio(AspectRatio::INSTAGRAM_PORTRAIT)
            .with_dimension(
                Lighting,
                &["soft morning sunlight", "warm ambient interior light"],
                &["clinical studio lighting", "neon color wash"],
            )
            .with_dimension(
                Camera,
                &["35mm lens at natural eye level", "50mm lens with gentle bokeh"],
                &["extreme close-up macro", "surveillance-style high angle"],
            )
            .with_dimension(
                Movement,
                &["gentle handheld follow", "slow lateral slide"],
                &["aggressive zoom", "drone fly-through"],
            )
            .with_dimension(
                ColorGrading,
                &["airy pastel grade", "warm natural tones"],
                &["high-contrast noir", "cold blue cast"],
            ),
        VideoStyleProfile::new("ugc-testimonial", "UGC Testimonial")
            .character_driven(DialogueMode::Spoken)
            .with_aspect_ratio(AspectRatio::PORTRAIT)
            .with_dimension(
                Lighting,
                &["natural daylight from a nearby window", "soft bedroom lamp light"],
                &["professional studio rig", "theatrical spotlight"],
            )
            .with_dimension(
                Camera,
                &["front-facing phone camera at chest height", "propped-up phone, medium shot"],
                &["cinema camera look", "drone shot"],
            )
            .with_dimension(
                Movement,
                &["mostly static with small natural movements", "casual handheld reframing"],
                &["choreographed camera moves", "slow motion"],
            )
            .with_dimension(
                ColorGrading,
                &["unprocessed phone-camera colors", "light warm filter"],
                &["cinematic teal and orange", "heavy vignette"],
            )
            .with_dimension(
                Environment,
                &["real bathroom counter", "living room couch"],
                &["green screen", "staged showroom"],
            ),
        VideoStyleProfile::new("unboxing", "Unboxing")
            .character_driven(DialogueMode::Spoken)
            .with_aspect_ratio(AspectRatio::PORTRAIT)
            .with_dimension(
                Lighting,
                &["bright overhead desk lighting", "soft diffused daylight"],
                &["dim moody lighting", "colored gels"],
            )
            .with_dimension(
                Camera,
                &["top-down overhead camera", "45-degree tabletop angle"],
                &["face-only close-up", "extreme wide shot"],
            )
            .with_dimension(
                Movement,
                &["static overhead with hand action", "slow push-in on reveal"],
                &["fast cuts between angles", "spinning camera"],
            )
            .with_dimension(
                ColorGrading,
                &["clean neutral grade", "slightly warm true-to-life grade"],
                &["desaturated grade", "film emulation"],
            )
            .with_dimension(
                Environment,
                &["clean wooden desk", "minimal white tabletop"],
                &["cluttered floor", "outdoor street"],
            ),
    ]
}

/// Aspect ratio specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Standard portrait (9:16) for TikTok/Reels
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };

    /// Widescreen (16:9)
    pub const WIDESCREEN: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    /// Square (1:1)
    pub const SQUARE: AspectRatio = AspectRatio {
        width: 1,
        height: 1,
    };

    /// Instagram portrait (4:5)
    pub const INSTAGRAM_PORTRAIT: AspectRatio = AspectRatio {
        width: 4,
        height: 5,
    };

    /// Create a new aspect ratio.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 2 {
            return Err(AspectRatioParseError::InvalidFormat(s.to_string()));
        }

        let width = parts[0]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[0].to_string()))?;
        let height = parts[1]
            .trim()
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[1].to_string()))?;

        if width == 0 || height == 0 {
            return Err(AspectRatioParseError::ZeroValue);
        }

        Ok(AspectRatio { width, height })
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("Invalid aspect ratio format: {0}, expected 'W:H'")]
    InvalidFormat(String),
    #[error("Invalid number in aspect ratio: {0}")]
    InvalidNumber(String),
    #[error("Aspect ratio cannot have zero values")]
    ZeroValue,
}
