//! JSON shapes the model is asked to return.

use fablewright_core::StateDelta;
use serde::{Deserialize, Serialize};

/// A chapter as returned by the model, before formatting and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDraft {
    /// Chapter prose
    pub content: String,
    /// Short summary of what happened
    #[serde(default)]
    pub summary: String,
    /// What changed in the story state
    #[serde(default)]
    pub state_delta: StateDelta,
}

/// A page as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDraft {
    /// Page prose
    pub content: String,
    /// Outline beats the page covered
    #[serde(default)]
    pub beat_coverage: Vec<String>,
    /// Where the scene is heading at the page break
    #[serde(default)]
    pub narrative_momentum: String,
}
