//! Multi-scene video prompt synthesis.
//!
//! This crate provides:
//! - Tolerant parsing of oracle output into a candidate payload
//! - Scene normalization and enrichment against style profiles
//! - Completeness scoring and a template-only fallback path
//! - The `PromptService` entry point and an oracle seam

pub mod assembly;
pub mod config;
pub mod defaults;
pub mod enricher;
pub mod error;
pub mod fallback;
pub mod instruction;
pub mod logging;
pub mod metrics;
pub mod normalizer;
pub mod oracle;
pub mod orchestrator;
pub mod parser;
pub mod scorer;
pub mod service;

pub use assembly::{RunMeta, SynthesisInput};
pub use config::PipelineConfig;
pub use defaults::{DefaultTable, SceneField};
pub use enricher::SceneEnricher;
pub use error::{PipelineError, PipelineResult};
pub use fallback::FallbackSynthesizer;
pub use logging::SynthesisLogger;
pub use normalizer::SceneNormalizer;
pub use oracle::{Oracle, OracleError, RecordedOracle};
pub use orchestrator::Orchestrator;
pub use parser::{parse_timeline, ParseFailure, ParsedCandidate};
pub use service::PromptService;
