//! Pipeline configuration.

use std::path::PathBuf;

use vprompt_models::{StyleRegistry, DEFAULT_SCENE_DURATION_SECS};

use crate::error::{PipelineError, PipelineResult};

/// Score assigned to results produced without a usable oracle payload.
pub const DEFAULT_FALLBACK_SCORE: u8 = 60;

/// USD per 1000 estimated tokens.
pub const DEFAULT_COST_PER_1K_TOKENS: f64 = 0.0005;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Length of every scene in seconds
    pub scene_duration_secs: u32,
    /// Quality score of fallback results
    pub fallback_score: u8,
    /// Cost per 1000 estimated tokens, used for the cost estimate
    pub cost_per_1k_tokens: f64,
    /// Optional JSON file with extra or overriding style profiles
    pub styles_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scene_duration_secs: DEFAULT_SCENE_DURATION_SECS,
            fallback_score: DEFAULT_FALLBACK_SCORE,
            cost_per_1k_tokens: DEFAULT_COST_PER_1K_TOKENS,
            styles_path: None,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            scene_duration_secs: std::env::var("VPROMPT_SCENE_DURATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SCENE_DURATION_SECS),
            fallback_score: std::env::var("VPROMPT_FALLBACK_SCORE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FALLBACK_SCORE),
            cost_per_1k_tokens: std::env::var("VPROMPT_COST_PER_1K_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_COST_PER_1K_TOKENS),
            styles_path: std::env::var("VPROMPT_STYLES_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.scene_duration_secs == 0 {
            return Err(PipelineError::config("scene duration must be positive"));
        }
        if self.fallback_score > 100 {
            return Err(PipelineError::config(format!(
                "fallback score {} exceeds 100",
                self.fallback_score
            )));
        }
        if !self.cost_per_1k_tokens.is_finite() || self.cost_per_1k_tokens < 0.0 {
            return Err(PipelineError::config(
                "cost per 1k tokens must be a non-negative number",
            ));
        }
        Ok(())
    }

    /// Builtin styles, extended from `styles_path` when set.
    pub fn load_style_registry(&self) -> PipelineResult<StyleRegistry> {
        let registry = StyleRegistry::builtin();
        match &self.styles_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                Ok(registry.with_profiles_json(&json)?)
            }
            None => Ok(registry),
        }
    }
}
