//! A canon store and persistence sink held in process memory.
//!
//! Backs the CLI's request files and the test suites. Derived memory is
//! updated as chapters are saved, the same way a durable store would.

use async_trait::async_trait;
use fablewright_core::{
    ActContext, ActMemory, Chapter, ChapterPages, ChapterStats, Page, StoryCanon, Volume,
    VolumeMemory,
};
use fablewright_error::{FablewrightResult, StoreError, StoreErrorKind};
use fablewright_interface::{AcceptedChapter, AcceptedPage, CanonStore, PersistenceSink};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Book {
    canon: Option<StoryCanon>,
    volumes: BTreeMap<u32, Volume>,
    volume_memory: BTreeMap<u32, VolumeMemory>,
    acts: HashMap<String, ActContext>,
    act_memory: HashMap<String, ActMemory>,
    chapters: BTreeMap<(u32, u32), Chapter>,
    pages: BTreeMap<(u32, u32), ChapterPages>,
}

impl Book {
    fn chapter_mut(&mut self, volume_number: u32, chapter_number: u32) -> FablewrightResult<&mut Chapter> {
        self.chapters
            .get_mut(&(volume_number, chapter_number))
            .ok_or_else(|| not_found(format!("chapter {} of volume {}", chapter_number, volume_number)))
    }

    fn apply_page_stats(
        &mut self,
        volume_number: u32,
        chapter_number: u32,
        stats: ChapterStats,
    ) -> FablewrightResult<ChapterStats> {
        self.chapter_mut(volume_number, chapter_number)?.apply_stats(stats);
        Ok(stats)
    }
}

fn not_found(what: String) -> fablewright_error::FablewrightError {
    StoreError::new(StoreErrorKind::NotFound(what)).into()
}

fn duplicate(what: String) -> fablewright_error::FablewrightError {
    StoreError::new(StoreErrorKind::Duplicate(what)).into()
}

/// In-memory [`CanonStore`] and [`PersistenceSink`].
///
/// # Examples
///
/// ```
/// use fablewright_core::{Chapter, StoryCanon, Volume};
/// use fablewright_generation::InMemoryStore;
///
/// let store = InMemoryStore::new().with_canon(StoryCanon::default());
/// store.insert_volume(Volume { volume_number: 1, ..Default::default() }).unwrap();
/// store.insert_chapter(Chapter::new(1, 1, 1)).unwrap();
///
/// assert!(store.insert_chapter(Chapter::new(1, 1, 1)).is_err());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    book: RwLock<Book>,
}

impl InMemoryStore {
    /// An empty store with no canon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canon, builder style.
    pub fn with_canon(mut self, canon: StoryCanon) -> Self {
        if let Ok(book) = self.book.get_mut() {
            book.canon = Some(canon);
        }
        self
    }

    fn read(&self) -> FablewrightResult<RwLockReadGuard<'_, Book>> {
        self.book
            .read()
            .map_err(|e| StoreError::new(StoreErrorKind::Unavailable(e.to_string())).into())
    }

    fn write(&self) -> FablewrightResult<RwLockWriteGuard<'_, Book>> {
        self.book
            .write()
            .map_err(|e| StoreError::new(StoreErrorKind::Unavailable(e.to_string())).into())
    }

    /// Replace the canon.
    pub fn set_canon(&self, canon: StoryCanon) -> FablewrightResult<()> {
        self.write()?.canon = Some(canon);
        Ok(())
    }

    /// Add a volume.
    ///
    /// # Errors
    ///
    /// Fails with a duplicate error if the volume number is taken.
    pub fn insert_volume(&self, volume: Volume) -> FablewrightResult<()> {
        let mut book = self.write()?;
        if book.volumes.contains_key(&volume.volume_number) {
            return Err(duplicate(format!("volume {}", volume.volume_number)));
        }
        book.volumes.insert(volume.volume_number, volume);
        Ok(())
    }

    /// Add a chapter to an existing volume.
    ///
    /// # Errors
    ///
    /// Fails if the volume is missing or the chapter already exists.
    pub fn insert_chapter(&self, chapter: Chapter) -> FablewrightResult<()> {
        let mut book = self.write()?;
        if !book.volumes.contains_key(&chapter.volume_number) {
            return Err(not_found(format!("volume {}", chapter.volume_number)));
        }
        let key = (chapter.volume_number, chapter.chapter_number);
        if book.chapters.contains_key(&key) {
            return Err(duplicate(format!(
                "chapter {} of volume {}",
                chapter.chapter_number, chapter.volume_number
            )));
        }
        book.chapters.insert(key, chapter);
        Ok(())
    }

    /// Register the act context for a chapter act tag.
    pub fn insert_act(&self, tag: impl Into<String>, act: ActContext) -> FablewrightResult<()> {
        let tag = tag.into();
        self.write()?.acts.insert(tag.clone(), act.with_tag(tag));
        Ok(())
    }

    /// Replace a volume's running memory.
    pub fn set_volume_memory(&self, volume_number: u32, memory: VolumeMemory) -> FablewrightResult<()> {
        self.write()?.volume_memory.insert(volume_number, memory);
        Ok(())
    }

    /// Replace an act's running memory.
    pub fn set_act_memory(&self, tag: impl Into<String>, memory: ActMemory) -> FablewrightResult<()> {
        self.write()?.act_memory.insert(tag.into(), memory);
        Ok(())
    }

    /// A stored chapter.
    pub fn chapter(&self, volume_number: u32, chapter_number: u32) -> FablewrightResult<Chapter> {
        self.read()?
            .chapters
            .get(&(volume_number, chapter_number))
            .cloned()
            .ok_or_else(|| not_found(format!("chapter {} of volume {}", chapter_number, volume_number)))
    }

    /// Delete one page and refresh the chapter's counts.
    #[instrument(skip(self))]
    pub fn delete_page(
        &self,
        volume_number: u32,
        chapter_number: u32,
        page_number: u32,
    ) -> FablewrightResult<ChapterStats> {
        let mut book = self.write()?;
        let stats = book
            .pages
            .entry((volume_number, chapter_number))
            .or_default()
            .delete(page_number)?;
        book.apply_page_stats(volume_number, chapter_number, stats)
    }

    /// Delete a page and every later page, unlocking the new last page.
    #[instrument(skip(self))]
    pub fn cascade_delete_pages_from(
        &self,
        volume_number: u32,
        chapter_number: u32,
        page_number: u32,
    ) -> FablewrightResult<ChapterStats> {
        let mut book = self.write()?;
        let stats = book
            .pages
            .entry((volume_number, chapter_number))
            .or_default()
            .cascade_delete_from(page_number)?;
        book.apply_page_stats(volume_number, chapter_number, stats)
    }
}

#[async_trait]
impl CanonStore for InMemoryStore {
    async fn story_canon(&self) -> FablewrightResult<StoryCanon> {
        self.read()?
            .canon
            .clone()
            .ok_or_else(|| not_found("story canon".to_string()))
    }

    async fn volumes(&self) -> FablewrightResult<Vec<Volume>> {
        Ok(self.read()?.volumes.values().cloned().collect())
    }

    async fn volume(&self, volume_number: u32) -> FablewrightResult<Volume> {
        self.read()?
            .volumes
            .get(&volume_number)
            .cloned()
            .ok_or_else(|| not_found(format!("volume {}", volume_number)))
    }

    async fn volume_memory(&self, volume_number: u32) -> FablewrightResult<Option<VolumeMemory>> {
        Ok(self.read()?.volume_memory.get(&volume_number).cloned())
    }

    async fn act_context(&self, act_tag: &str) -> FablewrightResult<Option<ActContext>> {
        Ok(self.read()?.acts.get(act_tag).cloned())
    }

    async fn act_memory(&self, act_tag: &str) -> FablewrightResult<Option<ActMemory>> {
        Ok(self.read()?.act_memory.get(act_tag).cloned())
    }

    async fn chapters(&self, volume_number: u32) -> FablewrightResult<Vec<Chapter>> {
        Ok(self
            .read()?
            .chapters
            .range((volume_number, 0)..=(volume_number, u32::MAX))
            .map(|(_, chapter)| chapter.clone())
            .collect())
    }

    async fn pages(&self, volume_number: u32, chapter_number: u32) -> FablewrightResult<Vec<Page>> {
        Ok(self
            .read()?
            .pages
            .get(&(volume_number, chapter_number))
            .map(|pages| pages.pages().to_vec())
            .unwrap_or_default())
    }
}

#[async_trait]
impl PersistenceSink for InMemoryStore {
    #[instrument(skip(self, chapter), fields(volume = chapter.volume_number, chapter = chapter.chapter_number))]
    async fn save_chapter(&self, chapter: &AcceptedChapter) -> FablewrightResult<()> {
        let mut book = self.write()?;

        let stored = book.chapter_mut(chapter.volume_number, chapter.chapter_number)?;
        stored.content = Some(chapter.content.clone());
        stored.summary = Some(chapter.summary.clone());
        stored.state_delta = Some(chapter.state_delta.clone());
        stored.word_count = chapter.word_count;
        let act_tag = stored.act_tag.clone();

        book.volume_memory
            .entry(chapter.volume_number)
            .or_default()
            .absorb(&chapter.state_delta);

        if let Some(tag) = act_tag {
            let pressure = book
                .acts
                .get(&tag)
                .map(ActContext::pressure)
                .unwrap_or_else(|| ActContext::default().pressure());
            book.act_memory
                .entry(tag)
                .or_default()
                .absorb(&chapter.state_delta, pressure);
        }

        debug!(word_count = chapter.word_count, "Chapter saved");
        Ok(())
    }

    #[instrument(skip(self, page), fields(volume = page.volume_number, chapter = page.chapter_number, page = page.page_number))]
    async fn save_page(&self, page: &AcceptedPage) -> FablewrightResult<()> {
        let mut book = self.write()?;
        book.chapter_mut(page.volume_number, page.chapter_number)?;

        let record = Page {
            beat_coverage: page.beat_coverage.clone(),
            narrative_momentum: page.narrative_momentum.clone(),
            ..Page::new(page.page_number, page.content.clone())
        };

        let sequence = book
            .pages
            .entry((page.volume_number, page.chapter_number))
            .or_default();
        let stats = if sequence.get(page.page_number).is_some() {
            sequence.replace_last(record)?
        } else {
            sequence.append(record)?
        };
        book.apply_page_stats(page.volume_number, page.chapter_number, stats)?;

        debug!(
            word_count = stats.word_count,
            page_count = stats.page_count,
            "Page saved"
        );
        Ok(())
    }
}
