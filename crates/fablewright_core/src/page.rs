//! Pages and the ordering rules that govern them.

use crate::{ChapterStats, count_words};
use fablewright_error::{ContinuityError, ContinuityErrorKind, FablewrightResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// The atomic generation unit within a chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    /// Position in the chapter, starting at 1
    pub page_number: u32,
    /// Page prose
    pub content: String,
    /// Words in `content`
    pub word_count: usize,
    /// Micro-beats this page covers
    pub beat_coverage: Vec<String>,
    /// How this page sets up the next
    pub narrative_momentum: String,
    /// Locked pages may not be regenerated
    pub locked: bool,
}

impl Page {
    /// Create an unlocked page, counting its words.
    pub fn new(page_number: u32, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            page_number,
            word_count: count_words(&content),
            content,
            ..Default::default()
        }
    }
}

/// The ordered pages of one chapter.
///
/// Once a later page exists, all earlier pages are locked and stay locked
/// until a cascading delete removes everything after them.
///
/// # Examples
///
/// ```
/// use fablewright_core::{ChapterPages, Page};
///
/// let mut pages = ChapterPages::default();
/// pages.append(Page::new(1, "first page")).unwrap();
/// pages.append(Page::new(2, "second page here")).unwrap();
///
/// assert!(pages.get(1).unwrap().locked);
/// assert!(pages.ensure_regenerable(1).is_err());
/// assert!(pages.ensure_regenerable(2).is_ok());
/// assert_eq!(pages.stats().word_count, 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterPages {
    pages: Vec<Page>,
}

impl ChapterPages {
    /// Build from stored pages, sorting by number and re-deriving locks.
    pub fn from_pages(mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|p| p.page_number);
        let mut sequence = Self { pages };
        sequence.relock();
        sequence
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Find a page by number.
    pub fn get(&self, page_number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Number of the last page, if any.
    pub fn last_page_number(&self) -> Option<u32> {
        self.pages.last().map(|p| p.page_number)
    }

    /// The page number the chapter accepts next.
    pub fn next_page_number(&self) -> u32 {
        self.last_page_number().map_or(1, |n| n + 1)
    }

    /// Append the next page, locking every earlier page.
    #[instrument(skip(self, page), fields(page_number = page.page_number))]
    pub fn append(&mut self, mut page: Page) -> FablewrightResult<ChapterStats> {
        let expected = self.next_page_number();
        if page.page_number != expected {
            return Err(ContinuityError::new(ContinuityErrorKind::PageOutOfOrder {
                expected,
                actual: page.page_number,
            })
            .into());
        }
        page.word_count = count_words(&page.content);
        page.locked = false;
        self.pages.push(page);
        self.relock();
        debug!(page_count = self.pages.len(), "Page appended");
        Ok(self.stats())
    }

    /// Fail unless the page exists and no later page exists.
    pub fn ensure_regenerable(&self, page_number: u32) -> FablewrightResult<()> {
        let page = self
            .get(page_number)
            .ok_or_else(|| ContinuityError::new(ContinuityErrorKind::PageNotFound(page_number)))?;
        match self.last_page_number() {
            Some(last) if page.locked || last > page_number => {
                Err(ContinuityError::new(ContinuityErrorKind::PageLocked {
                    page_number,
                    later_page: last,
                })
                .into())
            }
            _ => Ok(()),
        }
    }

    /// Replace the content of the last page.
    pub fn replace_last(&mut self, page: Page) -> FablewrightResult<ChapterStats> {
        self.ensure_regenerable(page.page_number)?;
        self.pages.pop();
        self.append(page)
    }

    /// Delete a single page and recompute the chapter counts.
    #[instrument(skip(self))]
    pub fn delete(&mut self, page_number: u32) -> FablewrightResult<ChapterStats> {
        let index = self
            .pages
            .iter()
            .position(|p| p.page_number == page_number)
            .ok_or_else(|| ContinuityError::new(ContinuityErrorKind::PageNotFound(page_number)))?;
        self.pages.remove(index);
        self.relock();
        debug!(remaining = self.pages.len(), "Page deleted");
        Ok(self.stats())
    }

    /// Delete a page and every page after it, unlocking the new last page.
    #[instrument(skip(self))]
    pub fn cascade_delete_from(&mut self, page_number: u32) -> FablewrightResult<ChapterStats> {
        if self.get(page_number).is_none() {
            return Err(ContinuityError::new(ContinuityErrorKind::PageNotFound(page_number)).into());
        }
        self.pages.retain(|p| p.page_number < page_number);
        self.relock();
        debug!(remaining = self.pages.len(), "Pages deleted from {}", page_number);
        Ok(self.stats())
    }

    /// The most recent `limit` pages, oldest first.
    pub fn continuity_window(&self, limit: usize) -> &[Page] {
        let start = self.pages.len().saturating_sub(limit);
        &self.pages[start..]
    }

    /// Word and page counts over the current pages.
    pub fn stats(&self) -> ChapterStats {
        ChapterStats {
            word_count: self.pages.iter().map(|p| p.word_count).sum(),
            page_count: self.pages.len() as u32,
        }
    }

    fn relock(&mut self) {
        let last = self.pages.len().saturating_sub(1);
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.locked = i < last;
        }
    }
}
