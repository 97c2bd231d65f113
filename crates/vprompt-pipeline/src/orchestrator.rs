//! Pipeline orchestration.
//!
//! Drives one request through `Parsing -> {Enriching | Fallback} -> Done`
//! and re-validates the assembled result before returning it.

use serde_json::Value;
use tracing::{debug, info};

use vprompt_models::{
    is_contiguous, AspectRatio, GeneratedPromptResult, PromptSummary, SynthesisPath,
};

use crate::assembly::{derive_summary, merge_negative_prompts, RunMeta, SynthesisInput};
use crate::config::PipelineConfig;
use crate::defaults::DefaultTable;
use crate::enricher::SceneEnricher;
use crate::error::{PipelineError, PipelineResult};
use crate::fallback::FallbackSynthesizer;
use crate::logging::SynthesisLogger;
use crate::metrics;
use crate::normalizer::SceneNormalizer;
use crate::parser::{coerce_text, parse_timeline, prose_seed, ParseFailure, ParsedCandidate};
use crate::scorer;

const TITLE_KEYS: &[&str] = &["title", "video_title", "videoTitle"];
const DESCRIPTION_KEYS: &[&str] = &["description", "video_description", "videoDescription"];
const CATEGORY_KEYS: &[&str] = &["category", "product_category", "productCategory"];
const ASPECT_RATIO_KEYS: &[&str] = &["aspect_ratio", "aspectRatio"];
const NEGATIVE_PROMPT_KEYS: &[&str] = &[
    "negative_prompts",
    "negativePrompts",
    "negative_prompt",
    "negativePrompt",
];
const SUMMARY_KEYS: &[&str] = &["summary", "prompt_summary", "promptSummary"];

/// Pipeline stage.
#[derive(Debug)]
enum Stage {
    Parsing,
    Enriching(ParsedCandidate),
    Fallback(ParseFailure),
    Done(GeneratedPromptResult),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Parsing => "parsing",
            Stage::Enriching(_) => "enriching",
            Stage::Fallback(_) => "fallback",
            Stage::Done(_) => "done",
        }
    }
}

/// Runs parse, normalize, enrich and score over oracle text.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    table: DefaultTable,
    scene_duration_secs: u32,
    fallback_score: u8,
}

impl Orchestrator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_table(config, DefaultTable::builtin())
    }

    pub fn with_table(config: &PipelineConfig, table: DefaultTable) -> Self {
        Self {
            table,
            scene_duration_secs: config.scene_duration_secs,
            fallback_score: config.fallback_score,
        }
    }

    /// Turn oracle text into a validated result. Only a postcondition
    /// violation is an error; unusable text takes the fallback path.
    pub fn run(
        &self,
        input: &SynthesisInput<'_>,
        oracle_text: &str,
        meta: &RunMeta,
    ) -> PipelineResult<GeneratedPromptResult> {
        let logger = SynthesisLogger::new(&meta.request_id, &input.style.id);
        let _span = logger.create_span().entered();
        logger.log_start(&format!(
            "{} scenes, {} chars of oracle text",
            input.scene_count,
            oracle_text.len()
        ));

        let mut stage = Stage::Parsing;
        loop {
            let from = stage.name();
            stage = match stage {
                Stage::Parsing => match parse_timeline(oracle_text) {
                    Ok(candidate) => {
                        debug!(source = candidate.source.as_str(), "Parsed oracle payload");
                        Stage::Enriching(candidate)
                    }
                    Err(failure) => {
                        metrics::record_parse_failure(failure.reason());
                        logger.log_warning(&format!("Oracle output unusable: {failure}"));
                        Stage::Fallback(failure)
                    }
                },
                Stage::Enriching(candidate) => Stage::Done(self.assemble(input, &candidate, meta)),
                Stage::Fallback(failure) => {
                    debug!(reason = failure.reason(), "Synthesizing template timeline");
                    let synthesizer = FallbackSynthesizer::new(
                        self.table,
                        self.scene_duration_secs,
                        self.fallback_score,
                    );
                    Stage::Done(synthesizer.synthesize(input, meta, Some(prose_seed(oracle_text))))
                }
                Stage::Done(result) => {
                    if let Err(e) = validate_result(&result, input.scene_count) {
                        logger.log_error(&e.to_string());
                        return Err(e);
                    }
                    metrics::record_synthesis(
                        result.processing.path,
                        result.quality_score,
                        meta.started.elapsed().as_secs_f64() * 1000.0,
                    );
                    logger.log_completion(&format!(
                        "{} scenes via {} path, score {}",
                        result.scene_count(),
                        result.processing.path,
                        result.quality_score
                    ));
                    return Ok(result);
                }
            };
            logger.log_stage(from, stage.name());
        }
    }

    fn assemble(
        &self,
        input: &SynthesisInput<'_>,
        candidate: &ParsedCandidate,
        meta: &RunMeta,
    ) -> GeneratedPromptResult {
        let timeline = SceneNormalizer::new(
            input.product,
            input.style,
            input.character,
            self.table,
            self.scene_duration_secs,
        )
        .normalize(Some(candidate), input.scene_count);

        let enricher = SceneEnricher::new(input.product, input.style, input.character, self.table);
        let enhanced = enricher.enrich(&timeline);
        let quality_score = scorer::score(&timeline, &enhanced, enricher.presenter());

        let negative_prompts =
            merge_negative_prompts(&candidate_negatives(candidate), &timeline, input.style);
        let summary = candidate_summary(candidate).unwrap_or_else(|| derive_summary(&enhanced));

        info!(
            scenes = timeline.len(),
            quality_score,
            "Assembled oracle timeline"
        );

        GeneratedPromptResult {
            title: candidate
                .text(TITLE_KEYS)
                .unwrap_or_else(|| input.default_title(&self.table)),
            description: candidate
                .text(DESCRIPTION_KEYS)
                .unwrap_or_else(|| input.default_description(&self.table)),
            category: candidate
                .text(CATEGORY_KEYS)
                .unwrap_or_else(|| input.product.display_category().to_string()),
            base_style: input.style.id.clone(),
            aspect_ratio: candidate
                .text(ASPECT_RATIO_KEYS)
                .and_then(|s| s.parse::<AspectRatio>().ok())
                .unwrap_or(input.style.aspect_ratio),
            summary,
            negative_prompts,
            timeline,
            enhanced_scenes: enhanced,
            quality_score,
            processing: meta.processing(SynthesisPath::Oracle),
        }
    }
}

/// Top-level negative prompts. Strings are split on commas.
fn candidate_negatives(candidate: &ParsedCandidate) -> Vec<String> {
    let Some(value) = NEGATIVE_PROMPT_KEYS.iter().find_map(|k| candidate.root.get(*k)) else {
        return Vec::new();
    };

    match value {
        Value::Array(items) => items.iter().filter_map(coerce_text).collect(),
        other => coerce_text(other)
            .map(|text| text.split(',').map(|t| t.trim().to_string()).collect())
            .unwrap_or_default(),
    }
}

/// Summary object supplied by the oracle, if it is complete.
fn candidate_summary(candidate: &ParsedCandidate) -> Option<PromptSummary> {
    let summary = SUMMARY_KEYS
        .iter()
        .find_map(|k| candidate.root.get(*k))?
        .as_object()?;
    let field = |key: &str| summary.get(key).and_then(coerce_text);

    Some(PromptSummary {
        scene: field("scene")?,
        camera: field("camera")?,
        lighting: field("lighting")?,
    })
}

/// Check the structural guarantees of a result.
pub fn validate_result(result: &GeneratedPromptResult, scene_count: usize) -> PipelineResult<()> {
    if result.timeline.len() != scene_count {
        return Err(PipelineError::postcondition(format!(
            "timeline has {} scenes, expected {}",
            result.timeline.len(),
            scene_count
        )));
    }
    if result.enhanced_scenes.len() != scene_count {
        return Err(PipelineError::postcondition(format!(
            "{} enhanced scenes, expected {}",
            result.enhanced_scenes.len(),
            scene_count
        )));
    }

    for (index, (scene, enhanced)) in result
        .timeline
        .iter()
        .zip(&result.enhanced_scenes)
        .enumerate()
    {
        let expected = (index + 1) as u32;
        if scene.sequence != expected || enhanced.scene.sequence != expected {
            return Err(PipelineError::postcondition(format!(
                "scene {} has sequence {}",
                expected, scene.sequence
            )));
        }
        if scene.action.trim().is_empty() {
            return Err(PipelineError::postcondition(format!(
                "scene {expected} has no action"
            )));
        }
        if scene.dialogue.trim().is_empty() {
            return Err(PipelineError::postcondition(format!(
                "scene {expected} has no dialogue"
            )));
        }
        let dialogue = scene.dialogue.trim_start().to_lowercase();
        if dialogue.contains("character:") || dialogue.starts_with("dialogue:") {
            return Err(PipelineError::postcondition(format!(
                "scene {expected} dialogue still carries a role label"
            )));
        }
    }

    if !is_contiguous(result.timeline.iter().map(|s| &s.timestamp)) {
        return Err(PipelineError::postcondition(
            "timestamps are not contiguous",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vprompt_models::{ProductMetadata, StyleRegistry, TimeRange};

    fn run(text: &str, style_id: &str, count: usize) -> GeneratedPromptResult {
        let registry = StyleRegistry::builtin();
        let style = registry.get(style_id).unwrap();
        let product = ProductMetadata::new("Glow Serum", "skincare");
        let input = SynthesisInput::new(&product, style, None, count);
        Orchestrator::new(&PipelineConfig::default())
            .run(&input, text, &RunMeta::new(Uuid::new_v4(), 0.0))
            .unwrap()
    }

    #[test]
    fn test_structured_payload_takes_oracle_path() {
        let text = r#"{"title": "Amber Hour", "category": "beauty",
            "negative_prompts": ["lens flare", "Watermark"],
            "aspect_ratio": "9:16",
            "timeline": [{"action": "Bottle on marble", "dialogue": "\"Meet the serum\""}]}"#;
        let result = run(text, "cinematic", 2);

        assert_eq!(result.processing.path, SynthesisPath::Oracle);
        assert_eq!(result.title, "Amber Hour");
        assert_eq!(result.category, "beauty");
        assert_eq!(result.aspect_ratio, AspectRatio::PORTRAIT);
        assert_eq!(result.negative_prompts[0], "lens flare");
        assert_eq!(
            result
                .negative_prompts
                .iter()
                .filter(|p| p.eq_ignore_ascii_case("watermark"))
                .count(),
            1
        );
    }

    #[test]
    fn test_unparsable_text_takes_fallback_path() {
        let result = run("Title: Sunrise Ritual\nSorry, here are some ideas.", "lifestyle", 3);
        assert!(result.is_fallback());
        assert_eq!(result.quality_score, 60);
        assert_eq!(result.title, "Sunrise Ritual");
        assert_eq!(result.timeline.len(), 3);
    }

    #[test]
    fn test_candidate_summary_used_when_complete() {
        let text = r#"{"summary": {"scene": "Bathroom shelf", "camera": "macro", "lighting": "window light"}, "scenes": []}"#;
        let result = run(text, "cinematic", 2);
        assert_eq!(result.summary.scene, "Bathroom shelf");

        let text = r#"{"summary": {"scene": "Bathroom shelf"}, "scenes": []}"#;
        let result = run(text, "cinematic", 2);
        assert_ne!(result.summary.scene, "Bathroom shelf");
        assert_eq!(result.summary.lighting, "golden hour rim lighting");
    }

    #[test]
    fn test_comma_separated_negatives() {
        let text = r#"{"negative_prompt": "text overlay, logos", "scenes": []}"#;
        let result = run(text, "cinematic", 2);
        assert_eq!(&result.negative_prompts[..2], &["text overlay", "logos"]);
    }

    #[test]
    fn test_validate_result_detects_violations() {
        let mut result = run("{}", "cinematic", 3);
        assert!(validate_result(&result, 3).is_ok());
        assert!(validate_result(&result, 4).unwrap_err().is_internal());

        result.timeline[1].timestamp = TimeRange {
            start_secs: 9,
            end_secs: 16,
        };
        assert!(validate_result(&result, 3).is_err());

        let mut result = run("{}", "cinematic", 3);
        result.timeline[2].dialogue = "  ".into();
        assert!(validate_result(&result, 3).is_err());

        let mut result = run("{}", "cinematic", 3);
        result.timeline[0].dialogue = "Dialogue: \"Hello there\"".into();
        assert!(validate_result(&result, 3).is_err());

        let mut result = run("{}", "cinematic", 3);
        result.enhanced_scenes.pop();
        assert!(validate_result(&result, 3).is_err());
    }
}
