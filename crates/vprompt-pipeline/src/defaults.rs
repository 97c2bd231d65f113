//! Declarative default table for scene fields.
//!
//! Every synthesized value in the pipeline comes from this table, keyed by
//! `(style key, field)`. Lookup falls back from the exact style id to the
//! style's dialogue-mode group (`@spoken` / `@voice_over`) and finally to
//! the wildcard `*`.
//!
//! Each entry holds an ordered list of templates forming a small narrative
//! arc: the first template opens the video, the last one closes it and the
//! ones in between cycle across middle scenes.

use vprompt_models::{CharacterProfile, DialogueMode, ProductMetadata, VideoStyleProfile};

/// Field a default can be resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneField {
    Action,
    Dialogue,
    AmbientSound,
    NegativePrompt,
    ProductDescription,
    ProductAction,
    ProductPlacement,
    Environment,
    Lighting,
    CameraSetup,
    CameraMovement,
    ColorGrading,
    VideoTitle,
    VideoDescription,
}

/// Position of a scene within the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePosition {
    Opening,
    Middle(usize),
    Closing,
}

impl ScenePosition {
    pub fn of(index: usize, total: usize) -> Self {
        if index == 0 {
            ScenePosition::Opening
        } else if index + 1 >= total {
            ScenePosition::Closing
        } else {
            ScenePosition::Middle(index - 1)
        }
    }

    fn pick<'a>(&self, templates: &'a [&'a str]) -> &'a str {
        match templates.len() {
            0 => "",
            1 => templates[0],
            2 => match self {
                ScenePosition::Opening => templates[0],
                ScenePosition::Middle(i) => templates[i % 2],
                ScenePosition::Closing => templates[1],
            },
            n => match self {
                ScenePosition::Opening => templates[0],
                ScenePosition::Middle(i) => templates[1 + i % (n - 2)],
                ScenePosition::Closing => templates[n - 1],
            },
        }
    }
}

/// Inputs available to templates.
#[derive(Debug, Clone, Copy)]
pub struct DefaultContext<'a> {
    pub product: &'a ProductMetadata,
    pub style: &'a VideoStyleProfile,
    pub character: Option<&'a CharacterProfile>,
    /// Zero-based scene index
    pub index: usize,
    /// Total number of scenes
    pub total: usize,
}

impl<'a> DefaultContext<'a> {
    pub fn new(
        product: &'a ProductMetadata,
        style: &'a VideoStyleProfile,
        character: Option<&'a CharacterProfile>,
        index: usize,
        total: usize,
    ) -> Self {
        Self {
            product,
            style,
            character,
            index,
            total,
        }
    }

    pub fn position(&self) -> ScenePosition {
        ScenePosition::of(self.index, self.total)
    }

    fn render(&self, template: &str) -> String {
        let presenter = self
            .character
            .map(|c| c.display_name())
            .unwrap_or("the presenter");
        let avoid = self.style.avoided_all().join(", ");

        let rendered = template
            .replace("{product}", self.product.display_name())
            .replace("{category}", self.product.display_category())
            .replace("{feature}", self.product.feature_at(self.index))
            .replace("{color}", self.product.primary_color())
            .replace("{material}", self.product.primary_material())
            .replace("{presenter}", presenter)
            .replace("{style}", &self.style.display_name)
            .replace("{n}", &(self.index + 1).to_string())
            .replace("{scenes}", &self.total.to_string())
            .replace("{avoid}", &avoid)
            .trim()
            .trim_end_matches(',')
            .trim()
            .to_string();
        capitalize_first(rendered)
    }
}

fn capitalize_first(text: String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => text,
    }
}

struct DefaultEntry {
    style: &'static str,
    field: SceneField,
    templates: &'static [&'static str],
}

const WILDCARD: &str = "*";
const SPOKEN_GROUP: &str = "@spoken";
const VOICE_OVER_GROUP: &str = "@voice_over";

/// Immutable default table.
#[derive(Clone, Copy)]
pub struct DefaultTable {
    entries: &'static [DefaultEntry],
}

impl std::fmt::Debug for DefaultTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTable")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Default for DefaultTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DefaultTable {
    pub fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    /// Resolve the default text for `field` in the given context.
    pub fn resolve(&self, field: SceneField, ctx: &DefaultContext<'_>) -> String {
        let group = match ctx.style.dialogue_mode {
            DialogueMode::Spoken => SPOKEN_GROUP,
            DialogueMode::VoiceOver => VOICE_OVER_GROUP,
        };
        let style_id = ctx.style.id.to_lowercase();

        let templates = [style_id.as_str(), group, WILDCARD]
            .iter()
            .find_map(|key| self.lookup(key, field))
            .unwrap_or(&[]);

        ctx.render(ctx.position().pick(templates))
    }

    fn lookup(&self, style: &str, field: SceneField) -> Option<&'static [&'static str]> {
        self.entries
            .iter()
            .find(|e| e.style == style && e.field == field)
            .map(|e| e.templates)
    }
}

const BUILTIN: &[DefaultEntry] = &[
    // Actions
    DefaultEntry {
        style: "cinematic",
        field: SceneField::Action,
        templates: &[
            "Slow reveal of {product} emerging from shadow, light catching its {color} {material} finish",
            "Intimate detail pass over {product} that lingers on its {feature}",
            "Wide establishing shot placing {product} in a dramatic setting that frames its {feature}",
            "Hero shot of {product} centered in frame as the camera settles and the light peaks",
        ],
    },
    DefaultEntry {
        style: "product-showcase",
        field: SceneField::Action,
        templates: &[
            "{product} rotates slowly on a pedestal, its {color} {material} surface catching the light",
            "Macro close-up isolating the {feature} of {product} with crisp edge detail",
            "Precise glide along {product} revealing its silhouette and {feature}",
            "Final front-facing hero angle of {product} with every detail in sharp focus",
        ],
    },
    DefaultEntry {
        style: "unboxing",
        field: SceneField::Action,
        templates: &[
            "Hands slide the lid off the box to reveal {product} nestled inside",
            "{presenter} lifts {product} out of the packaging and turns it to show its {feature}",
            "{presenter} lays out the accessories next to {product} one by one",
            "{presenter} sets {product} upright beside its open box and gives a thumbs up",
        ],
    },
    DefaultEntry {
        style: SPOKEN_GROUP,
        field: SceneField::Action,
        templates: &[
            "{presenter} picks up {product} and holds it toward the camera with genuine excitement",
            "{presenter} demonstrates the {feature} of {product} while talking to camera",
            "{presenter} uses {product} in a real everyday moment, reacting naturally",
            "{presenter} smiles and sets {product} down beside them, nodding to the viewer",
        ],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::Action,
        templates: &[
            "{product} is introduced in a natural setting, its {color} {material} finish catching soft light",
            "{product} is shown in everyday use, highlighting its {feature}",
            "A lingering close-up of {product} resting in its environment",
        ],
    },
    // Dialogue
    DefaultEntry {
        style: "ugc-testimonial",
        field: SceneField::Dialogue,
        templates: &[
            "\"Okay, I was skeptical about {product} at first, but hear me out.\" (candid, conversational)",
            "\"The {feature} is honestly what sold me, I use it every single day.\" (enthusiastic, genuine)",
            "\"If you've been on the fence about {product}, this is your sign.\" (warm, direct to camera)",
        ],
    },
    DefaultEntry {
        style: SPOKEN_GROUP,
        field: SceneField::Dialogue,
        templates: &[
            "\"You guys, I finally got my hands on {product} and I have to show you.\" (excited, direct to camera)",
            "\"Look at this, the {feature} is so much better than I expected.\" (genuine, conversational)",
            "\"Honestly? {product} just became part of my daily routine.\" (warm, confident sign-off)",
        ],
    },
    DefaultEntry {
        style: VOICE_OVER_GROUP,
        field: SceneField::Dialogue,
        templates: &[
            "\"Some things are made to be noticed. Meet {product}.\" (calm, measured narration)",
            "\"Every detail considered, down to its {feature}.\" (smooth, confident narration)",
            "\"{product}. Designed for the moments that matter.\" (resonant closing narration)",
        ],
    },
    // Ambient sound
    DefaultEntry {
        style: "cinematic",
        field: SceneField::AmbientSound,
        templates: &["Low orchestral swell under subtle room tone"],
    },
    DefaultEntry {
        style: "product-showcase",
        field: SceneField::AmbientSound,
        templates: &["Minimal electronic pulse with soft transition whooshes"],
    },
    DefaultEntry {
        style: "unboxing",
        field: SceneField::AmbientSound,
        templates: &["Crisp cardboard and paper rustling with quiet room tone"],
    },
    DefaultEntry {
        style: SPOKEN_GROUP,
        field: SceneField::AmbientSound,
        templates: &["Natural room tone with light background ambience, voice clearly in front"],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::AmbientSound,
        templates: &["Soft ambient background music with natural environmental sound"],
    },
    // Negative prompts
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::NegativePrompt,
        templates: &[
            "blurry footage, distorted hands, extra fingers, warped product shape, unreadable labels, watermark, {avoid}",
        ],
    },
    // Product description
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::ProductDescription,
        templates: &[
            "{product} in {color} {material}, presented as a premium {category} product",
            "{product} with its {feature} clearly visible",
            "{product} in {color} {material}, shown at its most flattering angle",
        ],
    },
    // Product action
    DefaultEntry {
        style: SPOKEN_GROUP,
        field: SceneField::ProductAction,
        templates: &[
            "held up to the lens by {presenter}",
            "demonstrated in hand, showing its {feature}",
            "placed down gently within reach of {presenter}",
        ],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::ProductAction,
        templates: &[
            "revealed and turning slightly to catch the light",
            "shown in use to demonstrate its {feature}",
            "resting still in its final hero position",
        ],
    },
    // Product placement
    DefaultEntry {
        style: "unboxing",
        field: SceneField::ProductPlacement,
        templates: &[
            "inside its open packaging at the center of the desk",
            "held above the box, centered in frame",
            "standing upright next to the open box, logo facing camera",
        ],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::ProductPlacement,
        templates: &[
            "center frame in the foreground",
            "mid-frame, clearly visible and in focus",
            "center frame on a clean surface, logo facing camera",
        ],
    },
    // Technical dimensions missing from a style profile
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::Environment,
        templates: &["Clean, uncluttered setting that complements {product}"],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::Lighting,
        templates: &["Balanced soft key light with gentle fill"],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::CameraSetup,
        templates: &["50mm lens at eye level"],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::CameraMovement,
        templates: &["Slow, steady push-in"],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::ColorGrading,
        templates: &["Natural, true-to-life color grade"],
    },
    // Result-level text
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::VideoTitle,
        templates: &["{product} | {style} Video"],
    },
    DefaultEntry {
        style: WILDCARD,
        field: SceneField::VideoDescription,
        templates: &[
            "A {scenes}-scene {style} video featuring {product}, a {category} product known for its {feature}.",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use vprompt_models::StyleRegistry;

    fn product() -> ProductMetadata {
        ProductMetadata::new("Glow Serum", "skincare")
            .with_features(["lightweight texture", "vitamin C boost"])
            .with_colors(["amber"])
            .with_materials(["glass"])
    }

    #[test]
    fn test_position_of() {
        assert_eq!(ScenePosition::of(0, 4), ScenePosition::Opening);
        assert_eq!(ScenePosition::of(1, 4), ScenePosition::Middle(0));
        assert_eq!(ScenePosition::of(2, 4), ScenePosition::Middle(1));
        assert_eq!(ScenePosition::of(3, 4), ScenePosition::Closing);
        assert_eq!(ScenePosition::of(1, 2), ScenePosition::Closing);
    }

    #[test]
    fn test_pick_arc() {
        let templates = ["open", "mid-a", "mid-b", "close"];
        assert_eq!(ScenePosition::Opening.pick(&templates), "open");
        assert_eq!(ScenePosition::Middle(0).pick(&templates), "mid-a");
        assert_eq!(ScenePosition::Middle(3).pick(&templates), "mid-b");
        assert_eq!(ScenePosition::Closing.pick(&templates), "close");
        assert_eq!(ScenePosition::Closing.pick(&["only"]), "only");
        assert_eq!(ScenePosition::Middle(0).pick(&[]), "");
    }

    #[test]
    fn test_dialogue_differs_between_vlog_and_cinematic() {
        let registry = StyleRegistry::builtin();
        let product = product();
        let table = DefaultTable::builtin();

        let vlog = registry.get("ai-vlogs").unwrap();
        let cinematic = registry.get("cinematic").unwrap();

        let vlog_line = table.resolve(
            SceneField::Dialogue,
            &DefaultContext::new(&product, vlog, None, 0, 3),
        );
        let cinematic_line = table.resolve(
            SceneField::Dialogue,
            &DefaultContext::new(&product, cinematic, None, 0, 3),
        );

        assert_ne!(vlog_line, cinematic_line);
        assert!(vlog_line.contains("Glow Serum"));
        assert!(cinematic_line.starts_with('"'));
    }

    #[test]
    fn test_exact_style_beats_group_and_wildcard() {
        let registry = StyleRegistry::builtin();
        let product = product();
        let table = DefaultTable::builtin();
        let ugc = registry.get("ugc-testimonial").unwrap();

        let line = table.resolve(
            SceneField::Dialogue,
            &DefaultContext::new(&product, ugc, None, 0, 3),
        );
        assert!(line.contains("skeptical"));
    }

    #[test]
    fn test_custom_style_falls_back_to_group() {
        let product = product();
        let table = DefaultTable::builtin();
        let custom = VideoStyleProfile::new("retro", "Retro");

        let action = table.resolve(
            SceneField::Action,
            &DefaultContext::new(&product, &custom, None, 1, 3),
        );
        assert_eq!(
            action,
            "Glow Serum is shown in everyday use, highlighting its vitamin C boost"
        );
    }

    #[test]
    fn test_placeholders_filled() {
        let registry = StyleRegistry::builtin();
        let product = product();
        let table = DefaultTable::builtin();
        let presenter = CharacterProfile {
            name: "Maya".into(),
            ..Default::default()
        };
        let vlog = registry.get("ai-vlogs").unwrap();

        let action = table.resolve(
            SceneField::Action,
            &DefaultContext::new(&product, vlog, Some(&presenter), 0, 2),
        );
        assert_eq!(
            action,
            "Maya picks up Glow Serum and holds it toward the camera with genuine excitement"
        );

        let title = table.resolve(
            SceneField::VideoTitle,
            &DefaultContext::new(&product, vlog, None, 0, 2),
        );
        assert_eq!(title, "Glow Serum | AI Vlog Video");
    }

    #[test]
    fn test_negative_prompt_includes_avoided_values() {
        let registry = StyleRegistry::builtin();
        let product = product();
        let table = DefaultTable::builtin();
        let cinematic = registry.get("cinematic").unwrap();

        let negative = table.resolve(
            SceneField::NegativePrompt,
            &DefaultContext::new(&product, cinematic, None, 0, 3),
        );
        assert!(negative.starts_with("blurry footage"));
        assert!(negative.contains("shaky handheld"));

        let bare = VideoStyleProfile::new("bare", "Bare");
        let negative = table.resolve(
            SceneField::NegativePrompt,
            &DefaultContext::new(&product, &bare, None, 0, 3),
        );
        assert!(negative.ends_with("watermark"));
    }

    #[test]
    fn test_every_field_resolves_non_empty() {
        let registry = StyleRegistry::builtin();
        let product = ProductMetadata::new("", "");
        let table = DefaultTable::builtin();
        let fields = [
            SceneField::Action,
            SceneField::Dialogue,
            SceneField::AmbientSound,
            SceneField::NegativePrompt,
            SceneField::ProductDescription,
            SceneField::ProductAction,
            SceneField::ProductPlacement,
            SceneField::Environment,
            SceneField::Lighting,
            SceneField::CameraSetup,
            SceneField::CameraMovement,
            SceneField::ColorGrading,
            SceneField::VideoTitle,
            SceneField::VideoDescription,
        ];
        for id in registry.ids() {
            let style = registry.get(id).unwrap();
            for index in 0..6 {
                let ctx = DefaultContext::new(&product, style, None, index, 6);
                for field in fields {
                    assert!(
                        !table.resolve(field, &ctx).is_empty(),
                        "{:?} empty for {} scene {}",
                        field,
                        id,
                        index
                    );
                }
            }
        }
    }
}
