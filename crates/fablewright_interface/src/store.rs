//! Canon store and persistence sink contracts.

use async_trait::async_trait;
use fablewright_core::{
    ActContext, ActMemory, Chapter, Page, StateDelta, StoryCanon, Volume, VolumeMemory,
};
use fablewright_error::FablewrightResult;
use serde::{Deserialize, Serialize};

/// Read-only source of canonical story state.
///
/// The store supplies everything the context assembler needs; the generation
/// core never writes through it.
#[async_trait]
pub trait CanonStore: Send + Sync {
    /// The book's story canon.
    async fn story_canon(&self) -> FablewrightResult<StoryCanon>;

    /// All volumes, ordered by volume number.
    async fn volumes(&self) -> FablewrightResult<Vec<Volume>>;

    /// A single volume.
    async fn volume(&self, volume_number: u32) -> FablewrightResult<Volume>;

    /// Memory for a volume, if any has been recorded.
    async fn volume_memory(&self, volume_number: u32) -> FablewrightResult<Option<VolumeMemory>>;

    /// Act metadata for a chapter's act tag, if any.
    async fn act_context(&self, act_tag: &str) -> FablewrightResult<Option<ActContext>>;

    /// Memory for an act, if any has been recorded.
    async fn act_memory(&self, act_tag: &str) -> FablewrightResult<Option<ActMemory>>;

    /// Chapters of a volume, ordered by chapter number.
    async fn chapters(&self, volume_number: u32) -> FablewrightResult<Vec<Chapter>>;

    /// Pages of a chapter, ordered by page number.
    async fn pages(&self, volume_number: u32, chapter_number: u32) -> FablewrightResult<Vec<Page>>;
}

/// Score, issues and warnings carried with an accepted chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySummary {
    /// Validator score, 0 to 100
    pub score: u32,
    /// Issues found
    pub issues: Vec<String>,
    /// Warnings found
    pub warnings: Vec<String>,
}

/// A chapter result ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedChapter {
    /// Owning volume
    pub volume_number: u32,
    /// Chapter within the volume
    pub chapter_number: u32,
    /// Chapter prose
    pub content: String,
    /// Chapter summary
    pub summary: String,
    /// What changed
    pub state_delta: StateDelta,
    /// Words in `content`
    pub word_count: usize,
    /// Validator verdict
    pub prose_validation: QualitySummary,
}

/// A page result ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedPage {
    /// Owning volume
    pub volume_number: u32,
    /// Owning chapter
    pub chapter_number: u32,
    /// Page within the chapter
    pub page_number: u32,
    /// Page prose
    pub content: String,
    /// Micro-beats covered
    pub beat_coverage: Vec<String>,
    /// Setup for the next page
    pub narrative_momentum: String,
    /// Words in `content`
    pub word_count: usize,
}

/// Write-only destination for accepted results.
///
/// Storage, identifiers and transactions belong to the implementation.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Store an accepted chapter.
    async fn save_chapter(&self, chapter: &AcceptedChapter) -> FablewrightResult<()>;

    /// Store an accepted page.
    async fn save_page(&self, page: &AcceptedPage) -> FablewrightResult<()>;
}
