//! Scene enrichment.
//!
//! Derives the technical attributes of each scene from its directives, the
//! style profile and the default table, plus presenter consistency markers
//! for character-driven styles.

use vprompt_models::{
    CharacterProfile, ConsistencyMarkers, EnhancedScene, ProductMetadata, QualityProtocol,
    RealismFlags, SceneDirectives, StyleDimension, TimelineSequence, VideoStyleProfile,
};

use crate::defaults::{DefaultContext, DefaultTable, SceneField};

const DEFAULT_CAMERA_POSITIONING: &str = "Consistent eye-level framing, presenter facing camera";

/// Produces enhanced scenes from a normalized timeline.
#[derive(Debug, Clone, Copy)]
pub struct SceneEnricher<'a> {
    product: &'a ProductMetadata,
    style: &'a VideoStyleProfile,
    character: Option<&'a CharacterProfile>,
    table: DefaultTable,
}

impl<'a> SceneEnricher<'a> {
    pub fn new(
        product: &'a ProductMetadata,
        style: &'a VideoStyleProfile,
        character: Option<&'a CharacterProfile>,
        table: DefaultTable,
    ) -> Self {
        Self {
            product,
            style,
            character,
            table,
        }
    }

    /// Presenter used for consistency markers. Only character-driven styles
    /// carry one.
    pub fn presenter(&self) -> Option<&'a CharacterProfile> {
        self.character.filter(|_| self.style.character_driven)
    }

    pub fn enrich(&self, timeline: &[TimelineSequence]) -> Vec<EnhancedScene> {
        let total = timeline.len();
        timeline
            .iter()
            .enumerate()
            .map(|(index, scene)| self.enrich_scene(scene, index, total))
            .collect()
    }

    fn enrich_scene(&self, scene: &TimelineSequence, index: usize, total: usize) -> EnhancedScene {
        let ctx = DefaultContext::new(self.product, self.style, self.character, index, total);
        let directives = &scene.directives;

        let dimension = |dim: StyleDimension, field: SceneField| {
            directive_for(directives, dim)
                .or_else(|| self.style.first_preferred(dim).map(str::to_string))
                .unwrap_or_else(|| self.table.resolve(field, &ctx))
        };

        let presenter = self.presenter();

        EnhancedScene {
            environment: dimension(StyleDimension::Environment, SceneField::Environment),
            lighting: dimension(StyleDimension::Lighting, SceneField::Lighting),
            camera_setup: dimension(StyleDimension::Camera, SceneField::CameraSetup),
            camera_movement: dimension(StyleDimension::Movement, SceneField::CameraMovement),
            color_grading: dimension(StyleDimension::ColorGrading, SceneField::ColorGrading),
            visual_style: directives
                .visual_style
                .clone()
                .unwrap_or_else(|| format!("{} aesthetic", self.style.display_name)),
            product_action: self.table.resolve(SceneField::ProductAction, &ctx),
            product_placement: self.table.resolve(SceneField::ProductPlacement, &ctx),
            realism: RealismFlags::default(),
            title: directives.title.clone(),
            description: directives.description.clone(),
            scene_description: directives.scene_description.clone(),
            consistency: presenter.map(consistency_markers),
            quality_protocol: presenter.map(|_| QualityProtocol::all_enabled()),
            scene: scene.clone(),
        }
    }
}

fn directive_for(directives: &SceneDirectives, dim: StyleDimension) -> Option<String> {
    let value = match dim {
        StyleDimension::Environment => &directives.environment,
        StyleDimension::Lighting => &directives.lighting,
        StyleDimension::Camera => &directives.camera_setup,
        StyleDimension::Movement => &directives.camera_movement,
        StyleDimension::ColorGrading => &directives.color_grading,
    };
    value.clone()
}

fn join(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Consistency markers copied from the presenter profile.
pub fn consistency_markers(character: &CharacterProfile) -> ConsistencyMarkers {
    let camera_positioning = join(&[&character.camera_relationship, &character.preferred_angle]);

    ConsistencyMarkers {
        face: join(&[&character.face_shape, &character.facial_features]),
        eyes: join(&[&character.eye_color, &character.eye_shape]),
        hair: join(&[
            &character.hair_color,
            &character.hair_style,
            &character.hair_length,
        ]),
        clothing_palette: character.clothing_palette.clone(),
        build: join(&[&character.build, &character.height, &character.posture]),
        skin_tone: character.skin_tone.trim().to_string(),
        camera_positioning: if camera_positioning.is_empty() {
            DEFAULT_CAMERA_POSITIONING.to_string()
        } else {
            camera_positioning
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::SceneNormalizer;
    use vprompt_models::StyleRegistry;

    fn product() -> ProductMetadata {
        ProductMetadata::new("Glow Serum", "skincare")
            .with_features(["lightweight texture"])
            .with_colors(["amber"])
            .with_materials(["glass"])
    }

    fn maya() -> CharacterProfile {
        CharacterProfile {
            name: "Maya".into(),
            skin_tone: "warm olive".into(),
            face_shape: "oval".into(),
            facial_features: "light freckles".into(),
            eye_color: "hazel".into(),
            hair_color: "dark brown".into(),
            hair_style: "loose waves".into(),
            build: "slim".into(),
            clothing_palette: vec!["cream".into(), "sage".into()],
            camera_relationship: "talks directly to camera".into(),
            preferred_angle: "slightly above eye level".into(),
            ..Default::default()
        }
    }

    fn timeline(style: &VideoStyleProfile, count: usize) -> Vec<TimelineSequence> {
        SceneNormalizer::new(&product(), style, None, DefaultTable::builtin(), 8)
            .normalize(None, count)
    }

    #[test]
    fn test_style_preference_used_without_directive() {
        let registry = StyleRegistry::builtin();
        let style = registry.get("cinematic").unwrap();
        let product = product();
        let scenes = timeline(style, 3);

        let enhanced = SceneEnricher::new(&product, style, None, DefaultTable::builtin())
            .enrich(&scenes);

        assert_eq!(enhanced.len(), 3);
        assert_eq!(enhanced[0].lighting, "golden hour rim lighting");
        assert_eq!(enhanced[0].visual_style, "Cinematic aesthetic");
        assert!(enhanced.iter().all(|s| s.has_technical_attributes()));
        assert!(enhanced.iter().all(|s| s.consistency.is_none()));
    }

    #[test]
    fn test_directive_beats_style_preference() {
        let registry = StyleRegistry::builtin();
        let style = registry.get("cinematic").unwrap();
        let product = product();
        let mut scenes = timeline(style, 2);
        scenes[1].directives.lighting = Some("neon backlight".into());
        scenes[1].directives.title = Some("Night reveal".into());

        let enhanced = SceneEnricher::new(&product, style, None, DefaultTable::builtin())
            .enrich(&scenes);

        assert_eq!(enhanced[1].lighting, "neon backlight");
        assert_eq!(enhanced[1].title.as_deref(), Some("Night reveal"));
        assert_eq!(enhanced[0].lighting, "golden hour rim lighting");
    }

    #[test]
    fn test_missing_dimension_uses_table() {
        let registry = StyleRegistry::builtin();
        let style = registry.get("lifestyle").unwrap();
        let product = product();
        let scenes = timeline(style, 2);

        let enhanced = SceneEnricher::new(&product, style, None, DefaultTable::builtin())
            .enrich(&scenes);

        assert_eq!(
            enhanced[0].environment,
            "Clean, uncluttered setting that complements Glow Serum"
        );
    }

    #[test]
    fn test_character_markers_only_for_character_styles() {
        let registry = StyleRegistry::builtin();
        let product = product();
        let presenter = maya();

        let vlog = registry.get("ai-vlogs").unwrap();
        let enhanced = SceneEnricher::new(&product, vlog, Some(&presenter), DefaultTable::builtin())
            .enrich(&timeline(vlog, 2));
        let markers = enhanced[0].consistency.as_ref().unwrap();
        assert_eq!(markers.face, "oval, light freckles");
        assert_eq!(
            markers.camera_positioning,
            "talks directly to camera, slightly above eye level"
        );
        assert_eq!(markers.clothing_palette, vec!["cream", "sage"]);
        assert!(enhanced.iter().all(|s| s.has_character_attributes()));

        let cinematic = registry.get("cinematic").unwrap();
        let enhanced =
            SceneEnricher::new(&product, cinematic, Some(&presenter), DefaultTable::builtin())
                .enrich(&timeline(cinematic, 2));
        assert!(enhanced[0].consistency.is_none());
        assert!(enhanced[0].quality_protocol.is_none());
    }

    #[test]
    fn test_camera_positioning_default() {
        let markers = consistency_markers(&CharacterProfile::default());
        assert_eq!(markers.camera_positioning, DEFAULT_CAMERA_POSITIONING);
        assert!(!markers.is_complete());
    }

    #[test]
    fn test_enrich_is_deterministic() {
        let registry = StyleRegistry::builtin();
        let style = registry.get("unboxing").unwrap();
        let product = product();
        let presenter = maya();
        let scenes = timeline(style, 4);
        let enricher = SceneEnricher::new(&product, style, Some(&presenter), DefaultTable::builtin());

        assert_eq!(enricher.enrich(&scenes), enricher.enrich(&scenes));
    }
}
