//! Oracle instruction rendering.

use std::fmt::Write;

use vprompt_models::{
    CharacterProfile, DialogueMode, ProductMetadata, StyleDimension, VideoStyleProfile,
};

/// Everything the instruction embeds.
#[derive(Debug, Clone, Copy)]
pub struct InstructionInput<'a> {
    pub product: &'a ProductMetadata,
    pub style: &'a VideoStyleProfile,
    pub character: Option<&'a CharacterProfile>,
    pub scene_count: usize,
    pub scene_duration_secs: u32,
    pub custom_requirements: Option<&'a str>,
}

/// Render the instruction sent to the oracle.
pub fn render_instruction(input: &InstructionInput<'_>) -> String {
    let product = input.product;
    let style = input.style;
    let scene_count = input.scene_count;
    let duration = input.scene_duration_secs;
    let total = duration as usize * scene_count;

    let product_block = product_block(product);
    let style_block = style_block(style);
    let dialogue_rule = match style.dialogue_mode {
        DialogueMode::Spoken => "Dialogue is spoken on camera by the presenter.",
        DialogueMode::VoiceOver => "Dialogue is an off-screen voice-over narration.",
    };

    let mut instruction = format!(
        r#"You are a video director writing a {scene_count}-scene {style_name} video prompt.
Each scene lasts exactly {duration} seconds, {total} seconds in total.

PRODUCT:
{product_block}
STYLE: {style_name}
{style_block}
{dialogue_rule}

IMPORTANT: You must strictly follow this output format.
Return ONLY a single JSON object with this schema:
{{
  "title": "Video title",
  "description": "One-paragraph video description",
  "category": "Product category",
  "negative_prompts": ["things to avoid"],
  "timeline": [
    {{
      "sequence": 1,
      "action": "What happens on screen",
      "dialogue": "\"Exact words in double quotes\" (delivery notes)",
      "ambient_sound": "Background audio",
      "negative_prompt": "comma-separated things to avoid in this scene",
      "product_description": "How the product looks in this scene",
      "environment": "Setting",
      "lighting": "Lighting setup",
      "camera_setup": "Lens and angle",
      "camera_movement": "Camera motion",
      "color_grading": "Grade",
      "title": "Scene title",
      "description": "Scene purpose",
      "scene_description": "Full visual description of the scene"
    }}
  ]
}}

Additional instructions:
- Return ONLY a single JSON object and nothing else.
- Produce exactly {scene_count} entries in "timeline".
- Put every line of dialogue in double quotes and do not prefix it with a speaker label.
"#,
        style_name = style.display_name,
    );

    if let Some(character) = input.character.filter(|_| style.character_driven) {
        let _ = write!(
            instruction,
            "\nPRESENTER (keep identical in every scene):\n{}",
            character_block(character)
        );
    }

    if let Some(requirements) = input.custom_requirements {
        let _ = write!(instruction, "\nCUSTOM REQUIREMENTS:\n{requirements}\n");
    }

    instruction
}

fn product_block(product: &ProductMetadata) -> String {
    let mut block = format!(
        "- Name: {}\n- Category: {}\n",
        product.display_name(),
        product.display_category()
    );
    for (label, values) in [
        ("Features", &product.features),
        ("Colors", &product.colors),
        ("Materials", &product.materials),
    ] {
        if !values.is_empty() {
            let _ = writeln!(block, "- {label}: {}", values.join(", "));
        }
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(block, "- Description: {}", description.trim());
    }
    block
}

fn style_block(style: &VideoStyleProfile) -> String {
    let mut block = format!("- Aspect ratio: {}\n", style.aspect_ratio);
    for dimension in StyleDimension::ALL {
        let preferred = style.preferred(*dimension);
        if !preferred.is_empty() {
            let _ = writeln!(block, "- Preferred {}: {}", dimension, preferred.join(", "));
        }
        let avoided = style.avoided(*dimension);
        if !avoided.is_empty() {
            let _ = writeln!(block, "- Avoid {}: {}", dimension, avoided.join(", "));
        }
    }
    block
}

fn character_block(character: &CharacterProfile) -> String {
    let mut block = format!(
        "- Name: {}\n- Appearance: {}\n",
        character.display_name(),
        character.appearance_summary()
    );
    let fields = [
        ("Skin tone", &character.skin_tone),
        ("Face", &character.face_shape),
        ("Facial features", &character.facial_features),
        ("Eyes", &character.eye_color),
        ("Clothing style", &character.clothing_style),
        ("Accessories", &character.accessories),
        ("Voice", &character.voice_tone),
        ("Speaking pace", &character.speaking_pace),
        ("Demeanor", &character.behavioral_tone),
        ("Camera relationship", &character.camera_relationship),
        ("Preferred angle", &character.preferred_angle),
    ];
    for (label, value) in fields {
        if !value.trim().is_empty() {
            let _ = writeln!(block, "- {label}: {}", value.trim());
        }
    }
    let palette = character.palette_text();
    if !palette.is_empty() {
        let _ = writeln!(block, "- Clothing palette: {palette}");
    }
    block
}
