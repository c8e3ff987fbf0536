//! Everything a prompt is assembled from.

use fablewright_core::{
    ActContext, ActMemory, Chapter, Page, StoryCanon, Volume, VolumeMemory,
};
use serde::{Deserialize, Serialize};

/// Inputs for generating a whole chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRequest {
    /// Story canon
    pub canon: StoryCanon,
    /// Volume the chapter belongs to
    pub volume: Volume,
    /// Volumes planned for the book
    #[serde(default = "one")]
    pub total_volumes: u32,
    /// The chapter to write: number, title, outline, act tag, targets
    pub chapter: Chapter,
    /// Running volume memory
    #[serde(default)]
    pub volume_memory: Option<VolumeMemory>,
    /// Act metadata for the chapter's act tag
    #[serde(default)]
    pub act: Option<ActContext>,
    /// Running act memory
    #[serde(default)]
    pub act_memory: Option<ActMemory>,
    /// The chapter before this one, if any
    #[serde(default)]
    pub previous_chapter: Option<Chapter>,
    /// Free-text direction from the author
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Inputs for generating one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Story canon
    pub canon: StoryCanon,
    /// Volume the chapter belongs to
    pub volume: Volume,
    /// Volumes planned for the book
    #[serde(default = "one")]
    pub total_volumes: u32,
    /// Chapter the page belongs to
    pub chapter: Chapter,
    /// Page to write
    pub page_number: u32,
    /// Pages already written in this chapter, in order
    #[serde(default)]
    pub prior_pages: Vec<Page>,
    /// Running volume memory
    #[serde(default)]
    pub volume_memory: Option<VolumeMemory>,
    /// Act metadata
    #[serde(default)]
    pub act: Option<ActContext>,
    /// Running act memory
    #[serde(default)]
    pub act_memory: Option<ActMemory>,
    /// The chapter before this one, used for the first page
    #[serde(default)]
    pub previous_chapter: Option<Chapter>,
    /// Free-text direction from the author
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Inputs for generating a story canon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonRequest {
    /// The author's premise
    pub premise: String,
    /// Free-text roster, one character per line
    pub characters: String,
    /// Genre
    pub genre: String,
    /// Tone
    pub tone: String,
    /// Point of view
    pub pov: String,
    /// Target length, e.g. "3 volumes"
    pub target_length: String,
    /// Extra notes on world, themes or constraints
    pub notes: Option<String>,
}

fn one() -> u32 {
    1
}
