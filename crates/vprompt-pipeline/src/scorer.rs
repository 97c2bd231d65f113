//! Quality scoring.
//!
//! A pure completeness score in `0..=100` made of four weighted components.

use vprompt_models::{CharacterProfile, EnhancedScene, TimelineSequence, MAX_SCENE_COUNT};

pub const TIMELINE_WEIGHT: f64 = 40.0;
pub const DIALOGUE_WEIGHT: f64 = 30.0;
pub const TECHNICAL_WEIGHT: f64 = 20.0;
pub const STRUCTURAL_WEIGHT: f64 = 10.0;

/// Dialogue must be longer than this many characters to count.
pub const MIN_DIALOGUE_CHARS: usize = 20;

/// Per-component breakdown of a score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub timeline: f64,
    pub dialogue: f64,
    pub technical: f64,
    pub structural: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        let sum = self.timeline + self.dialogue + self.technical + self.structural;
        sum.round().clamp(0.0, 100.0) as u8
    }
}

/// Score a timeline and its enhanced scenes.
///
/// Consistency and quality-protocol fields only count toward technical
/// completeness when a character profile is given.
pub fn score(
    timeline: &[TimelineSequence],
    enhanced: &[EnhancedScene],
    character: Option<&CharacterProfile>,
) -> u8 {
    breakdown(timeline, enhanced, character).total()
}

pub fn breakdown(
    timeline: &[TimelineSequence],
    enhanced: &[EnhancedScene],
    character: Option<&CharacterProfile>,
) -> ScoreBreakdown {
    let coverage = (timeline.len() as f64 / MAX_SCENE_COUNT as f64).min(1.0);

    ScoreBreakdown {
        timeline: coverage * TIMELINE_WEIGHT,
        dialogue: fraction(enhanced, |s| is_quality_dialogue(s.dialogue())) * DIALOGUE_WEIGHT,
        technical: fraction(enhanced, |s| {
            s.has_technical_attributes() && (character.is_none() || s.has_character_attributes())
        }) * TECHNICAL_WEIGHT,
        structural: fraction(enhanced, EnhancedScene::has_structural_fields) * STRUCTURAL_WEIGHT,
    }
}

/// Fraction of scenes matching `pred`. An empty list counts as complete.
fn fraction<F>(scenes: &[EnhancedScene], pred: F) -> f64
where
    F: Fn(&EnhancedScene) -> bool,
{
    if scenes.is_empty() {
        return 1.0;
    }
    scenes.iter().filter(|s| pred(*s)).count() as f64 / scenes.len() as f64
}

pub fn is_quality_dialogue(dialogue: &str) -> bool {
    let dialogue = dialogue.trim();
    dialogue.chars().count() > MIN_DIALOGUE_CHARS && has_quoted_span(dialogue)
}

/// Whether the text contains a pair of straight or curly double quotes.
pub fn has_quoted_span(text: &str) -> bool {
    if let Some(open) = text.find('"') {
        if text[open + 1..].contains('"') {
            return true;
        }
    }
    text.find('\u{201C}')
        .is_some_and(|open| text[open + '\u{201C}'.len_utf8()..].contains('\u{201D}'))
}
