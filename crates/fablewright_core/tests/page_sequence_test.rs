//! Tests for page ordering, locking and cascading deletes.

use fablewright_core::{ChapterPages, Page};
use fablewright_error::{ContinuityErrorKind, FablewrightErrorKind};

fn chapter_with(n: u32) -> ChapterPages {
    let mut pages = ChapterPages::default();
    for i in 1..=n {
        pages
            .append(Page::new(i, format!("page {} has five words", i)))
            .unwrap();
    }
    pages
}

fn continuity_kind(err: &fablewright_error::FablewrightError) -> &ContinuityErrorKind {
    match err.kind() {
        FablewrightErrorKind::Continuity(e) => e.kind(),
        other => panic!("Expected continuity error, got {:?}", other),
    }
}

#[test]
fn test_append_locks_all_earlier_pages() {
    let pages = chapter_with(4);

    let locks: Vec<bool> = pages.pages().iter().map(|p| p.locked).collect();
    assert_eq!(locks, vec![true, true, true, false]);
}

#[test]
fn test_append_rejects_out_of_order_page() {
    let mut pages = chapter_with(2);

    let err = pages.append(Page::new(5, "skipped ahead")).unwrap_err();
    assert_eq!(
        continuity_kind(&err),
        &ContinuityErrorKind::PageOutOfOrder {
            expected: 3,
            actual: 5
        }
    );
}

#[test]
fn test_regenerating_page_with_successor_is_rejected() {
    let pages = chapter_with(3);

    let err = pages.ensure_regenerable(2).unwrap_err();
    assert_eq!(
        continuity_kind(&err),
        &ContinuityErrorKind::PageLocked {
            page_number: 2,
            later_page: 3
        }
    );
    assert!(pages.ensure_regenerable(3).is_ok());
}

#[test]
fn test_regenerating_missing_page_is_rejected() {
    let pages = chapter_with(1);

    let err = pages.ensure_regenerable(7).unwrap_err();
    assert_eq!(continuity_kind(&err), &ContinuityErrorKind::PageNotFound(7));
}

#[test]
fn test_replace_last_keeps_numbering() {
    let mut pages = chapter_with(2);

    let stats = pages.replace_last(Page::new(2, "rewritten")).unwrap();

    assert_eq!(stats.page_count, 2);
    assert_eq!(pages.get(2).unwrap().content, "rewritten");
    assert!(pages.get(1).unwrap().locked);
}

#[test]
fn test_delete_recomputes_stats() {
    let mut pages = chapter_with(3);
    assert_eq!(pages.stats().word_count, 15);

    let stats = pages.delete(3).unwrap();

    assert_eq!(stats.page_count, 2);
    assert_eq!(stats.word_count, 10);
    assert!(!pages.get(2).unwrap().locked);
}

#[test]
fn test_cascade_delete_unlocks_new_last_page() {
    let mut pages = chapter_with(5);

    let stats = pages.cascade_delete_from(3).unwrap();

    assert_eq!(stats.page_count, 2);
    assert_eq!(pages.last_page_number(), Some(2));
    assert!(pages.get(1).unwrap().locked);
    assert!(!pages.get(2).unwrap().locked);
    assert!(pages.ensure_regenerable(2).is_ok());
    assert_eq!(pages.next_page_number(), 3);
}

#[test]
fn test_continuity_window_takes_most_recent_pages() {
    let pages = chapter_with(20);

    let window = pages.continuity_window(17);

    assert_eq!(window.len(), 17);
    assert_eq!(window.first().unwrap().page_number, 4);
    assert_eq!(window.last().unwrap().page_number, 20);
    assert_eq!(pages.continuity_window(50).len(), 20);
}

#[test]
fn test_from_pages_sorts_and_relocks() {
    let pages = ChapterPages::from_pages(vec![
        Page::new(2, "second"),
        Page::new(1, "first"),
        Page::new(3, "third"),
    ]);

    let numbers: Vec<u32> = pages.pages().iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(pages.get(2).unwrap().locked);
    assert!(!pages.get(3).unwrap().locked);
}
