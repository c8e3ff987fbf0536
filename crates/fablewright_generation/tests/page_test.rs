//! Tests for single-attempt page generation.

mod test_utils;

use fablewright_context::PageRequest;
use fablewright_core::Page;
use fablewright_error::{ContinuityErrorKind, FablewrightErrorKind};
use fablewright_generation::{GenerationOrchestrator, InMemoryStore};
use fablewright_interface::CanonStore;
use std::sync::Arc;
use test_utils::*;

fn request(page_number: u32, prior: u32) -> PageRequest {
    PageRequest {
        canon: locked_canon(),
        volume: volume(1),
        total_volumes: 1,
        chapter: chapter(1, 1),
        page_number,
        prior_pages: (1..=prior)
            .map(|n| Page::new(n, format!("Page {} text.", n)))
            .collect(),
        ..Default::default()
    }
}

fn orchestrator(service: &Arc<MockCompletionService>) -> GenerationOrchestrator {
    GenerationOrchestrator::new(service.clone(), &fast_config()).unwrap()
}

#[tokio::test]
async fn test_page_in_band_is_returned() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(9))));

    let page = orchestrator(&service).generate_page(&request(1, 0)).await?;

    assert_eq!(page.word_count, 9 * SCENE_WORDS);
    assert_eq!(page.beat_coverage, vec!["descent".to_string()]);
    assert_eq!(page.narrative_momentum, "Tomas is hiding something.");
    assert_eq!(service.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_short_page_is_a_word_count_error() {
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(5))));

    let err = orchestrator(&service)
        .generate_page(&request(1, 0))
        .await
        .unwrap_err();

    match err.kind() {
        FablewrightErrorKind::WordCount(e) => {
            assert_eq!(e.word_count, 5 * SCENE_WORDS);
            assert!(!e.is_too_long());
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn test_long_page_is_a_word_count_error() {
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(16))));

    let err = orchestrator(&service)
        .generate_page(&request(1, 0))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), FablewrightErrorKind::WordCount(e) if e.is_too_long()));
}

#[tokio::test]
async fn test_word_band_is_inclusive_at_both_edges() -> anyhow::Result<()> {
    for (words, accepted) in [(599, false), (600, true), (1200, true), (1201, false)] {
        let service = Arc::new(MockCompletionService::new_success(page_json(&page_of_words(
            words,
        ))));

        let outcome = orchestrator(&service).generate_page(&request(1, 0)).await;

        match outcome {
            Ok(page) => {
                assert!(accepted, "{} words should be rejected", words);
                assert_eq!(page.word_count, words);
            }
            Err(err) => {
                assert!(!accepted, "{} words should be accepted: {}", words, err);
                assert!(
                    matches!(err.kind(), FablewrightErrorKind::WordCount(e) if e.word_count == words)
                );
            }
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_page_is_not_retried() {
    let service = Arc::new(MockCompletionService::new_success("Page nine, as requested."));

    let err = orchestrator(&service)
        .generate_page(&request(1, 0))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), FablewrightErrorKind::MalformedOutput(_)));
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn test_skipping_ahead_is_rejected_before_calling_the_model() {
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(9))));

    let err = orchestrator(&service)
        .generate_page(&request(5, 2))
        .await
        .unwrap_err();

    match err.kind() {
        FablewrightErrorKind::Continuity(e) => assert_eq!(
            e.kind(),
            &ContinuityErrorKind::PageOutOfOrder {
                expected: 3,
                actual: 5
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_locked_page_cannot_be_regenerated() {
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(9))));

    let err = orchestrator(&service)
        .generate_page(&request(2, 3))
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        FablewrightErrorKind::Continuity(e)
            if matches!(e.kind(), ContinuityErrorKind::PageLocked { page_number: 2, later_page: 3 })
    ));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_last_page_regeneration_excludes_itself_from_context() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(9))));

    orchestrator(&service).generate_page(&request(3, 3)).await?;

    let prompt = service.requests()[0].user_prompt().clone();
    assert!(prompt.contains("--- Page 2 ---"));
    assert!(!prompt.contains("--- Page 3 ---"));
    assert!(!prompt.contains("Page 3 text."));
    Ok(())
}

#[tokio::test]
async fn test_continuity_window_holds_at_most_seventeen_pages() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(9))));

    orchestrator(&service).generate_page(&request(21, 20)).await?;

    let prompt = service.requests()[0].user_prompt().clone();
    assert!(!prompt.contains("--- Page 3 ---"));
    assert!(prompt.contains("--- Page 4 ---"));
    assert!(prompt.contains("--- Page 20 ---"));
    Ok(())
}

#[tokio::test]
async fn test_accepted_pages_are_appended_and_locked() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryStore::new().with_canon(locked_canon()));
    store.insert_volume(volume(1))?;
    store.insert_chapter(chapter(1, 1))?;
    let service = Arc::new(MockCompletionService::new_success(page_json(&page_text(9))));
    let orchestrator = orchestrator(&service).with_sink(store.clone());

    orchestrator.generate_page(&request(1, 0)).await?;
    let mut second = request(2, 0);
    second.prior_pages = store.pages(1, 1).await?;
    orchestrator.generate_page(&second).await?;

    let pages = store.pages(1, 1).await?;
    assert_eq!(pages.len(), 2);
    assert!(pages[0].locked);
    assert!(!pages[1].locked);
    let saved = store.chapter(1, 1)?;
    assert_eq!(saved.page_count, 2);
    assert_eq!(saved.word_count, 2 * 9 * SCENE_WORDS);
    Ok(())
}
