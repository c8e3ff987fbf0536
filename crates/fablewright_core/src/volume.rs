//! Volumes: top-level narrative arcs.

use serde::{Deserialize, Serialize};

/// A book-length arc, ordered by `volume_number`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    /// Position in the series, starting at 1
    pub volume_number: u32,
    /// Volume title
    pub title: String,
    /// Central theme
    pub theme: String,
    /// What the reader is promised to feel
    pub emotional_promise: String,
    /// Relationship state at the start of the volume
    pub relationship_state_start: String,
    /// Relationship state at the end of the volume
    pub relationship_state_end: String,
    /// The volume's turning point
    pub turning_point: String,
    /// Planned number of chapters
    pub target_chapter_count: u32,
    /// Volume outline; a hard boundary for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    /// Whether the volume is finished
    pub completed: bool,
}
