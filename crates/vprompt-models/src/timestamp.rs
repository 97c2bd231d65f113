//! Scene timestamp ranges.
//!
//! Scene timing is always derived from the scene index and a fixed scene
//! duration. Timestamps written by the oracle are never read back; oracles
//! routinely get the arithmetic wrong.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default duration of a single scene in seconds.
pub const DEFAULT_SCENE_DURATION_SECS: u32 = 8;

/// Half-open `[start, end)` range of a scene, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TimeRange {
    /// Start offset in seconds
    pub start_secs: u32,
    /// End offset in seconds
    pub end_secs: u32,
}

impl TimeRange {
    /// Range for the zero-based scene `index` with `duration_secs` per scene.
    ///
    /// # Examples
    /// ```
    /// use vprompt_models::timestamp::TimeRange;
    /// let range = TimeRange::for_scene(2, 8);
    /// assert_eq!(range.start_secs, 16);
    /// assert_eq!(range.end_secs, 24);
    /// assert_eq!(range.to_string(), "00:16-00:24");
    /// ```
    pub const fn for_scene(index: usize, duration_secs: u32) -> Self {
        let start_secs = index as u32 * duration_secs;
        Self {
            start_secs,
            end_secs: start_secs + duration_secs,
        }
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.end_secs.saturating_sub(self.start_secs)
    }

    /// Whether `next` starts exactly where this range ends.
    pub fn is_followed_by(&self, next: &TimeRange) -> bool {
        self.end_secs == next.start_secs
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_mmss(self.start_secs), format_mmss(self.end_secs))
    }
}

/// Format seconds into an `MM:SS` string.
pub fn format_mmss(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Check that a sequence of ranges is contiguous and non-overlapping,
/// starting at zero.
pub fn is_contiguous<'a, I>(ranges: I) -> bool
where
    I: IntoIterator<Item = &'a TimeRange>,
{
    let mut expected_start = 0;
    for range in ranges {
        if range.start_secs != expected_start || range.end_secs <= range.start_secs {
            return false;
        }
        expected_start = range.end_secs;
    }
    true
}
