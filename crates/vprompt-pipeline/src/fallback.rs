//! Template-only synthesis for unusable oracle output.

use tracing::info;

use vprompt_models::{GeneratedPromptResult, SynthesisPath};

use crate::assembly::{derive_summary, merge_negative_prompts, RunMeta, SynthesisInput};
use crate::defaults::DefaultTable;
use crate::enricher::SceneEnricher;
use crate::normalizer::SceneNormalizer;
use crate::parser::ResultSeed;

/// Builds a complete result from the default table and style profile alone.
#[derive(Debug, Clone, Copy)]
pub struct FallbackSynthesizer {
    table: DefaultTable,
    scene_duration_secs: u32,
    fallback_score: u8,
}

impl FallbackSynthesizer {
    pub fn new(table: DefaultTable, scene_duration_secs: u32, fallback_score: u8) -> Self {
        Self {
            table,
            scene_duration_secs,
            fallback_score,
        }
    }

    /// Synthesize every scene. Title and description come from `seed` when
    /// the oracle prose carried them.
    pub fn synthesize(
        &self,
        input: &SynthesisInput<'_>,
        meta: &RunMeta,
        seed: Option<ResultSeed>,
    ) -> GeneratedPromptResult {
        let timeline = SceneNormalizer::new(
            input.product,
            input.style,
            input.character,
            self.table,
            self.scene_duration_secs,
        )
        .normalize(None, input.scene_count);

        let enhanced =
            SceneEnricher::new(input.product, input.style, input.character, self.table)
                .enrich(&timeline);

        let seed = seed.unwrap_or_default();
        let negative_prompts = merge_negative_prompts(&[], &timeline, input.style);

        info!(
            scenes = timeline.len(),
            seeded_title = seed.title.is_some(),
            "Synthesized fallback timeline"
        );

        GeneratedPromptResult {
            title: seed
                .title
                .unwrap_or_else(|| input.default_title(&self.table)),
            description: seed
                .description
                .unwrap_or_else(|| input.default_description(&self.table)),
            category: input.product.display_category().to_string(),
            base_style: input.style.id.clone(),
            aspect_ratio: input.style.aspect_ratio,
            summary: derive_summary(&enhanced),
            negative_prompts,
            timeline,
            enhanced_scenes: enhanced,
            quality_score: self.fallback_score,
            processing: meta.processing(SynthesisPath::Fallback),
        }
    }
}
