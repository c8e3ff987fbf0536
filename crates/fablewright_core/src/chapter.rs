//! Chapters and the state deltas generation produces for them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What changed in the story during a chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateDelta {
    /// Character name to their state at chapter end
    pub character_states: BTreeMap<String, String>,
    /// Changes to the world
    pub world_changes: Vec<String>,
    /// Plot beats advanced
    pub plot_progression: Vec<String>,
    /// Emotional state at chapter end
    pub emotional_state: String,
    /// Threads left open
    pub unresolved_threads: Vec<String>,
    /// Threads closed in this chapter
    pub resolved_threads: Vec<String>,
}

impl StateDelta {
    /// Whether the delta carries no information.
    pub fn is_empty(&self) -> bool {
        self.character_states.is_empty()
            && self.world_changes.is_empty()
            && self.plot_progression.is_empty()
            && self.emotional_state.trim().is_empty()
            && self.unresolved_threads.is_empty()
            && self.resolved_threads.is_empty()
    }
}

/// Aggregate counts recomputed from a chapter's pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterStats {
    /// Sum of page word counts
    pub word_count: usize,
    /// Number of pages
    pub page_count: u32,
}

/// A chapter within a volume.
///
/// `(volume_number, chapter_number)` identifies a chapter uniquely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Chapter {
    /// Owning volume
    pub volume_number: u32,
    /// Position within the volume, starting at 1
    pub chapter_number: u32,
    /// Position within the whole book
    pub global_chapter_number: u32,
    /// Chapter title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Target word count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<u32>,
    /// Target page count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_page_count: Option<u32>,
    /// Binding beat outline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    /// Free-text act label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub act_tag: Option<String>,
    /// Generated summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Generated prose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Generated state delta
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_delta: Option<StateDelta>,
    /// Current word count
    pub word_count: usize,
    /// Current page count
    pub page_count: u32,
}

impl Chapter {
    /// Create an empty chapter at the given position.
    pub fn new(volume_number: u32, chapter_number: u32, global_chapter_number: u32) -> Self {
        Self {
            volume_number,
            chapter_number,
            global_chapter_number,
            ..Default::default()
        }
    }

    /// Overwrite the stored counts.
    pub fn apply_stats(&mut self, stats: ChapterStats) {
        self.word_count = stats.word_count;
        self.page_count = stats.page_count;
    }

    /// The outline, if it has any non-blank text.
    pub fn binding_outline(&self) -> Option<&str> {
        self.outline.as_deref().map(str::trim).filter(|o| !o.is_empty())
    }
}
