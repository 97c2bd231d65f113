//! Scene normalization.
//!
//! Turns a parsed candidate into exactly `scene_count` timeline scenes.
//! Supplied fields are coerced to text, missing ones come from the default
//! table, missing scenes are synthesized, and timestamps are always
//! recomputed from the scene index. This stage cannot fail.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use vprompt_models::{
    CharacterProfile, ProductMetadata, SceneDirectives, TimeRange, TimelineSequence,
    VideoStyleProfile,
};

use crate::defaults::{DefaultContext, DefaultTable, SceneField};
use crate::parser::{coerce_text, ParsedCandidate};

/// Keys the scene list may live under, in lookup order.
pub const SCENE_LIST_KEYS: &[&str] = &[
    "timeline",
    "timeline_sequences",
    "timelineSequences",
    "scenes",
    "sequences",
];

const ACTION_KEYS: &[&str] = &["action", "visual", "visuals", "scene_action", "sceneAction"];
const DIALOGUE_KEYS: &[&str] = &[
    "dialogue",
    "dialog",
    "voiceover",
    "voice_over",
    "voiceOver",
    "narration",
    "script",
];
const AMBIENT_KEYS: &[&str] = &["ambient_sound", "ambientSound", "ambient", "sound", "audio"];
const NEGATIVE_KEYS: &[&str] = &["negative_prompt", "negativePrompt", "negative", "avoid"];
const PRODUCT_KEYS: &[&str] = &["product_description", "productDescription", "product"];

const ENVIRONMENT_KEYS: &[&str] = &["environment", "setting", "location"];
const LIGHTING_KEYS: &[&str] = &["lighting"];
const CAMERA_SETUP_KEYS: &[&str] = &["camera_setup", "cameraSetup", "camera"];
const CAMERA_MOVEMENT_KEYS: &[&str] = &["camera_movement", "cameraMovement", "movement"];
const COLOR_GRADING_KEYS: &[&str] = &["color_grading", "colorGrading", "grade"];
const VISUAL_STYLE_KEYS: &[&str] = &["visual_style", "visualStyle"];
const TITLE_KEYS: &[&str] = &["title", "scene_title", "sceneTitle"];
const DESCRIPTION_KEYS: &[&str] = &["description"];
const SCENE_DESCRIPTION_KEYS: &[&str] = &["scene_description", "sceneDescription"];

/// Leading speaker/dialogue labels the oracle likes to emit.
static LEADING_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*[\*_]*\s*(?:character|presenter|narrator|host|speaker|voice[- ]?over|vo|dialogue)(?:\s*\([^)]*\))?\s*[\*_]*\s*:\s*[\*_]*\s*",
    )
    .expect("leading label pattern is valid")
});

/// `Character:` artifacts anywhere in the line.
static CHARACTER_ARTIFACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[?\s*character\s*:\s*\]?\s*").expect("character artifact pattern is valid")
});

/// Strip oracle labelling artifacts from a dialogue line.
///
/// Leading role labels (including the presenter's own name), a leading
/// `Dialogue:` label and `Character:` artifacts anywhere are removed until
/// none remain. Removing an artifact can expose or re-form a label, so every
/// pass runs all three.
pub fn clean_dialogue(text: &str, character: Option<&CharacterProfile>) -> String {
    let name_label = character
        .map(|c| c.name.trim())
        .filter(|n| !n.is_empty())
        .map(|n| format!("{n}:"));

    let mut current = text.trim().to_string();
    loop {
        let before = current.len();

        if let Some(m) = LEADING_LABEL.find(&current) {
            current = current[m.end()..].trim_start().to_string();
        }
        if let Some(label) = &name_label {
            let has_label = current
                .get(..label.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(label));
            if has_label {
                current = current[label.len()..].trim_start().to_string();
            }
        }
        if CHARACTER_ARTIFACT.is_match(&current) {
            current = CHARACTER_ARTIFACT.replace_all(&current, "").trim().to_string();
        }

        // Every removal shortens the text, so this terminates.
        if current.len() == before {
            break;
        }
    }

    current
}

/// Scene list inside a candidate, or an empty slice.
pub fn candidate_scenes(candidate: &ParsedCandidate) -> &[Value] {
    candidate
        .array(SCENE_LIST_KEYS)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Fills and repairs timeline scenes.
#[derive(Debug, Clone, Copy)]
pub struct SceneNormalizer<'a> {
    product: &'a ProductMetadata,
    style: &'a VideoStyleProfile,
    character: Option<&'a CharacterProfile>,
    table: DefaultTable,
    scene_duration_secs: u32,
}

impl<'a> SceneNormalizer<'a> {
    pub fn new(
        product: &'a ProductMetadata,
        style: &'a VideoStyleProfile,
        character: Option<&'a CharacterProfile>,
        table: DefaultTable,
        scene_duration_secs: u32,
    ) -> Self {
        Self {
            product,
            style,
            character,
            table,
            scene_duration_secs,
        }
    }

    /// Produce exactly `scene_count` scenes. With no candidate every scene
    /// is synthesized.
    pub fn normalize(
        &self,
        candidate: Option<&ParsedCandidate>,
        scene_count: usize,
    ) -> Vec<TimelineSequence> {
        let supplied = candidate.map(candidate_scenes).unwrap_or(&[]);
        if supplied.len() > scene_count {
            debug!(
                supplied = supplied.len(),
                requested = scene_count,
                "Dropping surplus oracle scenes"
            );
        }

        (0..scene_count)
            .map(|index| self.normalize_scene(supplied.get(index), index, scene_count))
            .collect()
    }

    fn normalize_scene(
        &self,
        supplied: Option<&Value>,
        index: usize,
        total: usize,
    ) -> TimelineSequence {
        let ctx = DefaultContext::new(self.product, self.style, self.character, index, total);
        let fields = SuppliedFields::from_value(supplied);

        let default = |field| self.table.resolve(field, &ctx);

        let dialogue = fields
            .text(DIALOGUE_KEYS)
            .map(|d| clean_dialogue(&d, self.character))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| clean_dialogue(&default(SceneField::Dialogue), self.character));

        TimelineSequence {
            sequence: (index + 1) as u32,
            timestamp: TimeRange::for_scene(index, self.scene_duration_secs),
            action: fields
                .text(ACTION_KEYS)
                .unwrap_or_else(|| default(SceneField::Action)),
            dialogue,
            ambient_sound: fields
                .text(AMBIENT_KEYS)
                .unwrap_or_else(|| default(SceneField::AmbientSound)),
            negative_prompt: fields
                .text(NEGATIVE_KEYS)
                .unwrap_or_else(|| default(SceneField::NegativePrompt)),
            product_description: fields
                .text(PRODUCT_KEYS)
                .unwrap_or_else(|| default(SceneField::ProductDescription)),
            directives: fields.directives(),
        }
    }
}

/// View over one supplied scene value.
enum SuppliedFields<'v> {
    Object(&'v Map<String, Value>),
    /// A bare string scene is read as its action
    Action(String),
    Missing,
}

impl<'v> SuppliedFields<'v> {
    fn from_value(value: Option<&'v Value>) -> Self {
        match value {
            Some(Value::Object(map)) => SuppliedFields::Object(map),
            Some(other) => match coerce_text(other) {
                Some(text) => SuppliedFields::Action(text),
                None => SuppliedFields::Missing,
            },
            None => SuppliedFields::Missing,
        }
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        match self {
            SuppliedFields::Object(map) => keys
                .iter()
                .filter_map(|k| map.get(*k))
                .find_map(coerce_text),
            SuppliedFields::Action(text) if keys == ACTION_KEYS => Some(text.clone()),
            _ => None,
        }
    }

    fn directives(&self) -> SceneDirectives {
        SceneDirectives {
            environment: self.text(ENVIRONMENT_KEYS),
            lighting: self.text(LIGHTING_KEYS),
            camera_setup: self.text(CAMERA_SETUP_KEYS),
            camera_movement: self.text(CAMERA_MOVEMENT_KEYS),
            color_grading: self.text(COLOR_GRADING_KEYS),
            visual_style: self.text(VISUAL_STYLE_KEYS),
            title: self.text(TITLE_KEYS),
            description: self.text(DESCRIPTION_KEYS),
            scene_description: self.text(SCENE_DESCRIPTION_KEYS),
        }
    }
}
