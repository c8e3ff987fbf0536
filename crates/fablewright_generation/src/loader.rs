//! Assembling generation requests from a canon store.

use fablewright_context::{ChapterRequest, PageRequest};
use fablewright_core::{ActContext, ActMemory, Chapter};
use fablewright_error::{FablewrightResult, StoreError, StoreErrorKind};
use fablewright_interface::CanonStore;
use tracing::{debug, instrument};

fn find_chapter(chapters: &[Chapter], volume_number: u32, chapter_number: u32) -> FablewrightResult<Chapter> {
    chapters
        .iter()
        .find(|c| c.chapter_number == chapter_number)
        .cloned()
        .ok_or_else(|| {
            StoreError::new(StoreErrorKind::NotFound(format!(
                "chapter {} of volume {}",
                chapter_number, volume_number
            )))
            .into()
        })
}

/// The chapter before this one, crossing into the previous volume if needed.
async fn previous_chapter<S>(
    store: &S,
    chapters: &[Chapter],
    volume_number: u32,
    chapter_number: u32,
) -> FablewrightResult<Option<Chapter>>
where
    S: CanonStore + ?Sized,
{
    if let Some(previous) = chapters
        .iter()
        .filter(|c| c.chapter_number < chapter_number)
        .max_by_key(|c| c.chapter_number)
    {
        return Ok(Some(previous.clone()));
    }
    if volume_number <= 1 {
        return Ok(None);
    }
    Ok(store
        .chapters(volume_number - 1)
        .await?
        .into_iter()
        .max_by_key(|c| c.chapter_number))
}

async fn act_state<S>(
    store: &S,
    act_tag: Option<&str>,
) -> FablewrightResult<(Option<ActContext>, Option<ActMemory>)>
where
    S: CanonStore + ?Sized,
{
    let Some(tag) = act_tag else {
        return Ok((None, None));
    };
    let act = store.act_context(tag).await?.map(|a| a.with_tag(tag));
    let memory = store.act_memory(tag).await?;
    Ok((act, memory))
}

/// Load everything a chapter prompt needs.
///
/// # Errors
///
/// Returns a store error if the canon, volume or chapter is missing.
#[instrument(skip(store, instructions))]
pub async fn load_chapter_request<S>(
    store: &S,
    volume_number: u32,
    chapter_number: u32,
    instructions: Option<String>,
) -> FablewrightResult<ChapterRequest>
where
    S: CanonStore + ?Sized,
{
    let canon = store.story_canon().await?;
    let total_volumes = store.volumes().await?.len() as u32;
    let volume = store.volume(volume_number).await?;
    let chapters = store.chapters(volume_number).await?;
    let chapter = find_chapter(&chapters, volume_number, chapter_number)?;
    let previous_chapter = previous_chapter(store, &chapters, volume_number, chapter_number).await?;
    let (act, act_memory) = act_state(store, chapter.act_tag.as_deref()).await?;
    let volume_memory = store.volume_memory(volume_number).await?;

    debug!(
        total_volumes,
        has_previous = previous_chapter.is_some(),
        has_act = act.is_some(),
        "Chapter request loaded"
    );

    Ok(ChapterRequest {
        canon,
        volume,
        total_volumes,
        chapter,
        volume_memory,
        act,
        act_memory,
        previous_chapter,
        instructions,
    })
}

/// Load everything a page prompt needs, including the pages before it.
///
/// # Errors
///
/// Returns a store error if the canon, volume or chapter is missing.
#[instrument(skip(store, instructions))]
pub async fn load_page_request<S>(
    store: &S,
    volume_number: u32,
    chapter_number: u32,
    page_number: u32,
    instructions: Option<String>,
) -> FablewrightResult<PageRequest>
where
    S: CanonStore + ?Sized,
{
    let canon = store.story_canon().await?;
    let total_volumes = store.volumes().await?.len() as u32;
    let volume = store.volume(volume_number).await?;
    let chapters = store.chapters(volume_number).await?;
    let chapter = find_chapter(&chapters, volume_number, chapter_number)?;
    let previous_chapter = previous_chapter(store, &chapters, volume_number, chapter_number).await?;
    let (act, act_memory) = act_state(store, chapter.act_tag.as_deref()).await?;
    let volume_memory = store.volume_memory(volume_number).await?;

    let mut prior_pages = store.pages(volume_number, chapter_number).await?;
    prior_pages.retain(|p| p.page_number < page_number);

    debug!(prior_pages = prior_pages.len(), "Page request loaded");

    Ok(PageRequest {
        canon,
        volume,
        total_volumes,
        chapter,
        page_number,
        prior_pages,
        volume_memory,
        act,
        act_memory,
        previous_chapter,
        instructions,
    })
}
