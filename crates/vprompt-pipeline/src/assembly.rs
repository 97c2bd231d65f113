//! Result assembly shared by the oracle and fallback paths.

use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use vprompt_models::{
    CharacterProfile, EnhancedScene, ProcessingMetadata, ProductMetadata, PromptSummary,
    SynthesisPath, TimelineSequence, VideoStyleProfile,
};

use crate::defaults::{DefaultContext, DefaultTable, SceneField};

/// Validated inputs for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub product: &'a ProductMetadata,
    pub style: &'a VideoStyleProfile,
    pub character: Option<&'a CharacterProfile>,
    pub scene_count: usize,
}

impl<'a> SynthesisInput<'a> {
    pub fn new(
        product: &'a ProductMetadata,
        style: &'a VideoStyleProfile,
        character: Option<&'a CharacterProfile>,
        scene_count: usize,
    ) -> Self {
        Self {
            product,
            style,
            character,
            scene_count,
        }
    }

    /// Context for result-level defaults.
    pub fn result_context(&self) -> DefaultContext<'a> {
        DefaultContext::new(self.product, self.style, self.character, 0, self.scene_count)
    }

    pub fn default_title(&self, table: &DefaultTable) -> String {
        table.resolve(SceneField::VideoTitle, &self.result_context())
    }

    pub fn default_description(&self, table: &DefaultTable) -> String {
        table.resolve(SceneField::VideoDescription, &self.result_context())
    }
}

/// Per-request bookkeeping carried into the result.
#[derive(Debug, Clone, Copy)]
pub struct RunMeta {
    pub request_id: Uuid,
    pub started: Instant,
    pub estimated_cost_usd: f64,
}

impl RunMeta {
    pub fn new(request_id: Uuid, estimated_cost_usd: f64) -> Self {
        Self {
            request_id,
            started: Instant::now(),
            estimated_cost_usd,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn processing(&self, path: SynthesisPath) -> ProcessingMetadata {
        ProcessingMetadata {
            request_id: self.request_id,
            path,
            elapsed_ms: self.elapsed_ms(),
            estimated_cost_usd: self.estimated_cost_usd,
            generated_at: Utc::now(),
        }
    }
}

/// Summary derived from the opening scene.
pub fn derive_summary(enhanced: &[EnhancedScene]) -> PromptSummary {
    match enhanced.first() {
        Some(first) => PromptSummary {
            scene: first
                .scene_description
                .clone()
                .unwrap_or_else(|| first.scene.action.clone()),
            camera: format!("{}, {}", first.camera_setup, first.camera_movement),
            lighting: first.lighting.clone(),
        },
        None => PromptSummary::default(),
    }
}

/// Order-preserving, case-insensitive union of negative prompts.
///
/// Candidate prompts come first, then per-scene prompts split on commas,
/// then the style's avoided values.
pub fn merge_negative_prompts(
    candidate: &[String],
    timeline: &[TimelineSequence],
    style: &VideoStyleProfile,
) -> Vec<String> {
    let scene_terms = timeline
        .iter()
        .flat_map(|scene| scene.negative_prompt.split(','));
    let avoided = style.avoided_all();

    let mut seen = std::collections::HashSet::new();
    candidate
        .iter()
        .map(String::as_str)
        .chain(scene_terms)
        .chain(avoided)
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(term.to_lowercase()))
        .map(str::to_string)
        .collect()
}
