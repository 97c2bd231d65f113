//! Shared data models for the VidPrompt scene synthesis pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Product metadata and synthesis requests
//! - Video style profiles and the style registry
//! - Presenter character profiles
//! - Timeline scenes, enhanced scenes and the final prompt result

pub mod character;
pub mod product;
pub mod request;
pub mod result;
pub mod scene;
pub mod style;
pub mod timestamp;

// Re-export common types
pub use character::CharacterProfile;
pub use product::ProductMetadata;
pub use request::{RequestError, SynthesisRequest, MAX_SCENE_COUNT, MIN_SCENE_COUNT};
pub use result::{GeneratedPromptResult, ProcessingMetadata, PromptSummary, SynthesisPath};
pub use scene::{
    ConsistencyMarkers, EnhancedScene, QualityProtocol, RealismFlags, SceneDirectives,
    TimelineSequence,
};
pub use style::{
    AspectRatio, DialogueMode, DimensionPreferences, StyleDimension, StyleParseError,
    StyleRegistry, StyleRegistryError, VideoStyleProfile,
};
pub use timestamp::{format_mmss, is_contiguous, TimeRange, DEFAULT_SCENE_DURATION_SECS};
