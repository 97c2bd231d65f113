//! Prompt synthesis service.
//!
//! Validates a request, renders the instruction, calls the oracle once and
//! runs the orchestrator over the response.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use vprompt_models::{GeneratedPromptResult, StyleRegistry, SynthesisRequest};

use crate::assembly::{RunMeta, SynthesisInput};
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::instruction::{render_instruction, InstructionInput};
use crate::oracle::{Oracle, OracleError};
use crate::orchestrator::Orchestrator;

/// Characters per estimated token.
const CHARS_PER_TOKEN: f64 = 4.0;

/// Estimated oracle cost in USD, rounded to 6 decimals.
pub fn estimate_cost(instruction_chars: usize, response_chars: usize, cost_per_1k_tokens: f64) -> f64 {
    let tokens = (instruction_chars + response_chars) as f64 / CHARS_PER_TOKEN;
    let cost = tokens / 1000.0 * cost_per_1k_tokens;
    (cost * 1_000_000.0).round() / 1_000_000.0
}

/// Entry point for prompt synthesis.
pub struct PromptService {
    config: PipelineConfig,
    registry: Arc<StyleRegistry>,
    oracle: Arc<dyn Oracle>,
    orchestrator: Orchestrator,
}

impl PromptService {
    pub fn new(config: PipelineConfig, registry: Arc<StyleRegistry>, oracle: Arc<dyn Oracle>) -> Self {
        let orchestrator = Orchestrator::new(&config);
        Self {
            config,
            registry,
            oracle,
            orchestrator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Synthesize a multi-scene prompt for `request`.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> PipelineResult<GeneratedPromptResult> {
        let request_id = Uuid::new_v4();
        let input = self.prepare(request)?;
        let instruction = self.instruction(request, &input);

        info!(
            request_id = %request_id,
            style = %input.style.id,
            scene_count = input.scene_count,
            oracle = self.oracle.name(),
            "Calling oracle"
        );

        let mut meta = RunMeta::new(request_id, 0.0);
        let response = match self.oracle.complete(&instruction).await {
            Ok(text) if text.trim().is_empty() => Err(OracleError::EmptyResponse),
            other => other,
        };
        let response = response.inspect_err(|e| {
            warn!(request_id = %request_id, error = %e, "Oracle call failed");
        })?;

        meta.estimated_cost_usd = estimate_cost(
            instruction.chars().count(),
            response.chars().count(),
            self.config.cost_per_1k_tokens,
        );

        self.orchestrator.run(&input, &response, &meta)
    }

    /// Run the pipeline over an oracle response obtained elsewhere.
    pub fn synthesize_from_text(
        &self,
        request: &SynthesisRequest,
        oracle_text: &str,
    ) -> PipelineResult<GeneratedPromptResult> {
        let input = self.prepare(request)?;
        let instruction = self.instruction(request, &input);
        let cost = estimate_cost(
            instruction.chars().count(),
            oracle_text.chars().count(),
            self.config.cost_per_1k_tokens,
        );

        self.orchestrator
            .run(&input, oracle_text, &RunMeta::new(Uuid::new_v4(), cost))
    }

    /// Render the oracle instruction for a request.
    pub fn render_instruction(&self, request: &SynthesisRequest) -> PipelineResult<String> {
        let input = self.prepare(request)?;
        Ok(self.instruction(request, &input))
    }

    fn prepare<'r>(&'r self, request: &'r SynthesisRequest) -> PipelineResult<SynthesisInput<'r>> {
        let product = request.validate()?;
        let style = self.registry.resolve(&request.style_id)?;
        Ok(SynthesisInput::new(
            product,
            style,
            request.character.as_ref(),
            request.scene_count,
        ))
    }

    fn instruction(&self, request: &SynthesisRequest, input: &SynthesisInput<'_>) -> String {
        render_instruction(&InstructionInput {
            product: input.product,
            style: input.style,
            character: input.character,
            scene_count: input.scene_count,
            scene_duration_secs: self.config.scene_duration_secs,
            custom_requirements: request.custom_requirements(),
        })
    }
}
