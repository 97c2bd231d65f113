//! End-to-end synthesis scenarios.

use std::sync::Arc;

use vprompt_models::{
    is_contiguous, CharacterProfile, GeneratedPromptResult, ProductMetadata, StyleRegistry,
    SynthesisPath, SynthesisRequest, TimeRange,
};
use vprompt_pipeline::scorer;
use vprompt_pipeline::{
    DefaultTable, OracleError, PipelineConfig, PipelineError, PromptService, RecordedOracle,
    SceneEnricher,
};

const CINEMATIC_RESPONSE: &str = r#"Here is your video plan:

```json
{
  "title": "Amber Hour",
  "description": "A slow, luminous reveal of Glow Serum.",
  "timeline": [
    {
      "sequence": 1,
      "timestamp": "00:00-00:05",
      "action": "The serum bottle emerges from shadow on black marble",
      "dialogue": "Narrator: \"Some light is worth waiting for.\" (low, warm)",
      "ambient_sound": "Low cello drone",
      "negative_prompt": "lens flare, text overlay",
      "title": "Emergence",
      "description": "Hook the viewer",
      "scene_description": "Dark marble surface, single rim light tracing the bottle"
    },
    {
      "sequence": 2,
      "action": "A dropper releases one golden drop onto skin",
      "dialogue": "Dialogue: \"One drop. That's all it takes.\"",
      "lighting": "Warm side light through sheer curtains",
      "title": "The Drop",
      "description": "Show the texture",
      "scene_description": "Macro of the dropper over a wrist"
    },
    {
      "sequence": 3,
      "action": "Hero shot of the bottle as the light peaks",
      "dialogue": "“Glow Serum. Your light, amplified.”",
      "title": "Hero",
      "description": "Close on the product",
      "scene_description": "Centered bottle, background falling into bokeh",
    }
  ]
}
```

Let me know if you want changes!"#;

const PROSE_RESPONSE: &str = "I'm sorry, I can't produce JSON right now.\n\
Title: Morning Ritual\n\
Description: A calm morning routine featuring the serum.\n\
The first scene could show a sunrise.";

fn product() -> ProductMetadata {
    ProductMetadata::new("Glow Serum", "skincare")
        .with_features(["lightweight texture", "vitamin C boost"])
        .with_colors(["amber"])
        .with_materials(["glass"])
}

fn presenter() -> CharacterProfile {
    CharacterProfile {
        name: "Maya".into(),
        age_range: "late 20s".into(),
        skin_tone: "warm olive".into(),
        face_shape: "oval".into(),
        facial_features: "light freckles".into(),
        eye_color: "hazel".into(),
        hair_color: "dark brown".into(),
        hair_style: "loose waves".into(),
        build: "slim".into(),
        clothing_palette: vec!["cream".into(), "sage".into()],
        camera_relationship: "talks directly to camera".into(),
        preferred_angle: "eye level".into(),
        ..Default::default()
    }
}

fn service() -> PromptService {
    service_with(RecordedOracle::new("{}"))
}

fn service_with(oracle: RecordedOracle) -> PromptService {
    PromptService::new(
        PipelineConfig::default(),
        Arc::new(StyleRegistry::builtin()),
        Arc::new(oracle),
    )
}

fn assert_well_formed(result: &GeneratedPromptResult, scene_count: usize) {
    assert_eq!(result.timeline.len(), scene_count);
    assert_eq!(result.enhanced_scenes.len(), scene_count);
    assert!(is_contiguous(result.timeline.iter().map(|s| &s.timestamp)));
    for (index, scene) in result.timeline.iter().enumerate() {
        assert_eq!(scene.sequence as usize, index + 1);
        assert_eq!(scene.timestamp, TimeRange::for_scene(index, 8));
        assert!(!scene.action.trim().is_empty());
        assert!(!scene.dialogue.trim().is_empty());
        let dialogue = scene.dialogue.trim_start().to_lowercase();
        assert!(!dialogue.contains("character:"), "dialogue {:?}", scene.dialogue);
        assert!(!dialogue.starts_with("dialogue:"), "dialogue {:?}", scene.dialogue);
    }
    assert!(result.quality_score <= 100);
}

#[test]
fn test_fenced_cinematic_payload() {
    let request = SynthesisRequest::new(product(), "cinematic", 3);
    let result = service()
        .synthesize_from_text(&request, CINEMATIC_RESPONSE)
        .unwrap();

    assert_well_formed(&result, 3);
    assert_eq!(result.processing.path, SynthesisPath::Oracle);
    assert!(result.quality_score >= 80, "score {}", result.quality_score);
    assert_eq!(result.title, "Amber Hour");

    let first = &result.enhanced_scenes[0];
    assert_eq!(first.dialogue(), "\"Some light is worth waiting for.\" (low, warm)");
    assert_eq!(first.title.as_deref(), Some("Emergence"));
    assert_eq!(result.timeline[1].dialogue, "\"One drop. That's all it takes.\"");
    assert_eq!(
        result.enhanced_scenes[1].lighting,
        "Warm side light through sheer curtains"
    );
    assert_eq!(result.enhanced_scenes[2].lighting, "golden hour rim lighting");
    assert_eq!(result.negative_prompts[0], "lens flare");
}

#[test]
fn test_prose_only_response_falls_back() {
    let request = SynthesisRequest::new(product(), "lifestyle", 4);
    let result = service().synthesize_from_text(&request, PROSE_RESPONSE).unwrap();

    assert_well_formed(&result, 4);
    assert!(result.is_fallback());
    assert_eq!(result.quality_score, 60);
    assert_eq!(result.title, "Morning Ritual");
    assert_eq!(
        result.description,
        "A calm morning routine featuring the serum."
    );
}

#[test]
fn test_partial_payload_synthesizes_missing_scene() {
    let response = r#"{"scenes": [
        {"action": "Serum on a vanity", "dialogue": "\"Mornings just got easier.\""},
        {"action": "Applying a drop", "dialogue": "\"It sinks right in, no residue.\""}
    ]}"#;
    let request = SynthesisRequest::new(product(), "cinematic", 3);
    let result = service().synthesize_from_text(&request, response).unwrap();

    assert_well_formed(&result, 3);
    assert_eq!(result.timeline[1].action, "Applying a drop");
    assert!(result.timeline[2].action.contains("Glow Serum"));
    assert_eq!(
        result.timeline[2].timestamp,
        TimeRange {
            start_secs: 16,
            end_secs: 24
        }
    );
}

#[test]
fn test_dialogue_artifacts_removed() {
    let response = r#"{"timeline": [
        {"action": "A", "dialogue": "Character: Maya: \"Okay, this is my new favorite thing.\""},
        {"action": "B", "dialogue": "Dialogue: Character: \"Look how fast it absorbs!\""},
        {"action": "C", "dialogue": "Character:"}
    ]}"#;
    let request = SynthesisRequest::new(product(), "ai-vlogs", 3).with_character(presenter());
    let result = service().synthesize_from_text(&request, response).unwrap();

    assert_well_formed(&result, 3);
    assert_eq!(
        result.timeline[0].dialogue,
        "\"Okay, this is my new favorite thing.\""
    );
    assert_eq!(result.timeline[1].dialogue, "\"Look how fast it absorbs!\"");
    assert!(result.timeline[2].dialogue.starts_with('"'));
}

#[test]
fn test_nested_dialogue_artifacts_removed() {
    let response = r#"{"timeline": [
        {"action": "A", "dialogue": "[Character:] Dialogue: \"Hello there my friends\""},
        {"action": "B", "dialogue": "CharCharacter:acter: \"Hello there my friends\""}
    ]}"#;
    let request = SynthesisRequest::new(product(), "ai-vlogs", 2).with_character(presenter());
    let result = service().synthesize_from_text(&request, response).unwrap();

    assert_well_formed(&result, 2);
    assert_eq!(result.processing.path, SynthesisPath::Oracle);
    assert_eq!(result.timeline[0].dialogue, "\"Hello there my friends\"");
    assert_eq!(result.timeline[1].dialogue, "\"Hello there my friends\"");
}

#[test]
fn test_stray_brace_prose_before_payload() {
    let response = "Tip: wrap variables like { this. Here is the plan: \
        {\"title\": \"Real\", \"timeline\": [{\"action\": \"Bottle on marble\"}]}";
    let request = SynthesisRequest::new(product(), "cinematic", 2);
    let result = service().synthesize_from_text(&request, response).unwrap();

    assert_well_formed(&result, 2);
    assert_eq!(result.processing.path, SynthesisPath::Oracle);
    assert_eq!(result.title, "Real");
    assert_eq!(result.timeline[0].action, "Bottle on marble");
}

#[test]
fn test_invariants_hold_across_styles_and_counts() {
    let registry = StyleRegistry::builtin();
    let responses = [
        CINEMATIC_RESPONSE,
        PROSE_RESPONSE,
        "",
        "{ not json",
        "```json\n[1, 2]\n```",
        r#"{"timeline": "one long scene"}"#,
        r#"{"timeline": [null, 42, {"dialogue": ["\"Hi\"", "\"there\""]}]}"#,
        "Note: the {best \"option} is below {\"title\": \"X\", \"scenes\": []}",
        r#"{"scenes": [{"dialogue": "[Character:] Dialogue: \"Hi there friends\""}]}"#,
        r#"{"scenes": [{"dialogue": "CharCharacter:acter: \"Hello there my friends\""}]}"#,
    ];
    let service = service();

    for style_id in registry.ids() {
        for scene_count in 2..=6 {
            for response in responses {
                let request = SynthesisRequest::new(product(), style_id, scene_count)
                    .with_character(presenter());
                let result = service.synthesize_from_text(&request, response).unwrap();
                assert_well_formed(&result, scene_count);
                assert_eq!(result.base_style, style_id);
            }
        }
    }
}

#[test]
fn test_enrich_and_score_round_trip_is_idempotent() {
    let registry = StyleRegistry::builtin();
    let product = product();
    let character = presenter();

    for (style_id, response) in [
        ("cinematic", CINEMATIC_RESPONSE),
        ("ai-vlogs", CINEMATIC_RESPONSE),
        ("unboxing", "{}"),
    ] {
        let style = registry.get(style_id).unwrap();
        let request =
            SynthesisRequest::new(product.clone(), style_id, 3).with_character(character.clone());
        let result = service().synthesize_from_text(&request, response).unwrap();

        let enricher =
            SceneEnricher::new(&product, style, Some(&character), DefaultTable::builtin());
        let enhanced = enricher.enrich(&result.timeline);
        let score = scorer::score(&result.timeline, &enhanced, enricher.presenter());

        assert_eq!(enhanced, result.enhanced_scenes, "style {style_id}");
        assert_eq!(score, result.quality_score, "style {style_id}");
    }
}

#[test]
fn test_character_consistency_for_vlogs() {
    let request = SynthesisRequest::new(product(), "ai-vlogs", 2).with_character(presenter());
    let result = service().synthesize_from_text(&request, "{}").unwrap();

    for scene in &result.enhanced_scenes {
        let markers = scene.consistency.as_ref().unwrap();
        assert_eq!(markers.skin_tone, "warm olive");
        assert_eq!(markers.camera_positioning, "talks directly to camera, eye level");
        assert!(scene.quality_protocol.as_ref().unwrap().is_fully_enabled());
    }
}

#[test]
fn test_custom_style_from_registry_json() {
    let registry = StyleRegistry::builtin()
        .with_profiles_json(
            r#"[{"id": "retro", "display_name": "Retro VHS",
                 "dimensions": {"lighting": {"preferred": ["flickering CRT glow"], "avoided": ["crisp 4K clarity"]}}}]"#,
        )
        .unwrap();
    let service = PromptService::new(
        PipelineConfig::default(),
        Arc::new(registry),
        Arc::new(RecordedOracle::new("{}")),
    );

    let request = SynthesisRequest::new(product(), "retro", 2);
    let result = service.synthesize_from_text(&request, "{}").unwrap();

    assert_well_formed(&result, 2);
    assert_eq!(result.enhanced_scenes[0].lighting, "flickering CRT glow");
    assert_eq!(result.enhanced_scenes[0].visual_style, "Retro VHS aesthetic");
    assert!(result.negative_prompts.iter().any(|p| p == "crisp 4K clarity"));
}

#[test]
fn test_precondition_failures() {
    let service = service();

    for scene_count in [0, 1, 7] {
        let request = SynthesisRequest::new(product(), "cinematic", scene_count);
        let err = service.synthesize_from_text(&request, "{}").unwrap_err();
        assert!(err.is_precondition(), "scene count {scene_count}");
    }

    let request = SynthesisRequest::new(product(), "film-noir", 3);
    assert!(service
        .synthesize_from_text(&request, "{}")
        .unwrap_err()
        .is_precondition());

    let mut request = SynthesisRequest::new(product(), "cinematic", 3);
    request.product = None;
    assert!(service
        .synthesize_from_text(&request, "{}")
        .unwrap_err()
        .is_precondition());
}

#[tokio::test]
async fn test_synthesize_through_oracle() {
    let service = service_with(RecordedOracle::new(CINEMATIC_RESPONSE));
    let request = SynthesisRequest::new(product(), "cinematic", 3);
    let result = service.synthesize(&request).await.unwrap();

    assert_well_formed(&result, 3);
    assert_eq!(result.processing.path, SynthesisPath::Oracle);
    assert!(result.processing.estimated_cost_usd > 0.0);
}

#[tokio::test]
async fn test_oracle_failures_surface_as_unavailable() {
    let request = SynthesisRequest::new(product(), "cinematic", 3);

    let service = service_with(RecordedOracle::failing(OracleError::Timeout(30)));
    let err = service.synthesize(&request).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::OracleUnavailable(OracleError::Timeout(30))
    ));
    assert!(err.is_retryable());

    let service = service_with(RecordedOracle::failing(OracleError::request_failed(
        "connection reset",
    )));
    let err = service.synthesize(&request).await.unwrap_err();
    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn test_precondition_checked_before_oracle_call() {
    let service = service_with(RecordedOracle::failing(OracleError::EmptyResponse));
    let request = SynthesisRequest::new(product(), "cinematic", 9);
    let err = service.synthesize(&request).await.unwrap_err();
    assert!(err.is_precondition());
}
