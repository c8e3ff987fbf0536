//! Tests for the chapter generate, validate and regenerate loop.

mod test_utils;

use fablewright_context::ChapterRequest;
use fablewright_error::{FablewrightErrorKind, GenerationErrorKind, ProviderErrorKind};
use fablewright_generation::{
    AttemptOutcome, GenerationOrchestrator, InMemoryStore, TerminalState,
};
use fablewright_interface::CanonStore;
use std::sync::Arc;
use std::time::Duration;
use test_utils::*;

fn request() -> ChapterRequest {
    ChapterRequest {
        canon: locked_canon(),
        volume: volume(1),
        total_volumes: 1,
        chapter: chapter(1, 1),
        ..Default::default()
    }
}

fn orchestrator(service: &Arc<MockCompletionService>) -> GenerationOrchestrator {
    GenerationOrchestrator::new(service.clone(), &fast_config()).unwrap()
}

#[tokio::test]
async fn test_good_first_draft_is_accepted() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success(chapter_json(&good_scene())));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Accepted);
    assert_eq!(outcome.attempt_count(), 1);
    assert_eq!(outcome.result.prose_validation.score, 100);
    assert_eq!(outcome.result.word_count, SCENE_WORDS);
    assert_eq!(outcome.result.summary, "Mara descends into the flooded tunnels.");
    assert_eq!(outcome.result.state_delta.emotional_state, "dread");
    assert_eq!(service.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_weak_draft_is_regenerated_with_corrections() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_sequence(vec![
        MockResponse::Success(chapter_json(WEAK_SCENE)),
        MockResponse::Success(chapter_json(&good_scene())),
    ]));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Accepted);
    assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Rejected);
    assert_eq!(outcome.attempts[0].score, Some(40));
    assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::Accepted);

    let requests = service.requests();
    assert!(!requests[0].user_prompt().contains("REVISION REQUIRED"));
    assert!(requests[1].user_prompt().contains("REVISION REQUIRED (attempt 2)"));
    assert!(requests[1].user_prompt().contains("scored 40/100"));
    assert!(requests[1].user_prompt().starts_with(requests[0].user_prompt().as_str()));
    assert_eq!(requests[0].system_prompt(), requests[1].system_prompt());
    Ok(())
}

#[tokio::test]
async fn test_exhausted_attempts_keep_the_best_draft() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_sequence(vec![
        MockResponse::Success(chapter_json(&leaking_scene())),
        MockResponse::Success(chapter_json(WEAK_SCENE)),
        MockResponse::Success(chapter_json(&leaking_scene())),
    ]));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Exhausted);
    assert_eq!(outcome.attempt_count(), 3);
    assert_eq!(outcome.result.prose_validation.score, 40);
    assert_eq!(outcome.result.content, WEAK_SCENE);
    assert_eq!(service.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_equal_scores_keep_the_earlier_draft() -> anyhow::Result<()> {
    let later = "I woke up. The council met. The plan was approved.";
    let service = Arc::new(MockCompletionService::new_sequence(vec![
        MockResponse::Success(chapter_json(WEAK_SCENE)),
        MockResponse::Success(chapter_json(later)),
        MockResponse::Success(chapter_json(later)),
    ]));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Exhausted);
    assert_eq!(outcome.result.content, WEAK_SCENE);
    Ok(())
}

#[tokio::test]
async fn test_malformed_output_consumes_an_attempt() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_sequence(vec![
        MockResponse::Success("I'd rather not write this chapter.".to_string()),
        MockResponse::Success(chapter_json(&good_scene())),
    ]));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Accepted);
    assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Malformed);
    assert!(outcome.attempts[0].score.is_none());
    assert!(
        service.requests()[1]
            .user_prompt()
            .contains("could not be read as JSON")
    );
    Ok(())
}

#[tokio::test]
async fn test_no_parseable_attempt_is_an_error() {
    let service = Arc::new(MockCompletionService::new_success("{\"content\": \"cut off"));

    let err = orchestrator(&service)
        .generate_chapter(&request())
        .await
        .unwrap_err();

    match err.kind() {
        FablewrightErrorKind::Generation(e) => {
            assert!(matches!(
                e.kind,
                GenerationErrorKind::AttemptsExhausted { attempts: 3, .. }
            ));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(service.call_count(), 3);
}

#[tokio::test]
async fn test_repaired_json_is_recorded() -> anyhow::Result<()> {
    let raw = format!(
        "```json\n{{\"content\": \"{}\", \"summary\": \"Descent.\",}}\n```",
        good_scene().replace('"', "\\\"")
    );
    let service = Arc::new(MockCompletionService::new_success(raw));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert!(outcome.attempts[0].repaired);
    assert_eq!(outcome.status, TerminalState::Accepted);
    assert_eq!(outcome.result.summary, "Descent.");
    Ok(())
}

#[tokio::test]
async fn test_permanent_provider_error_is_not_retried() {
    let service = Arc::new(MockCompletionService::new_error(ProviderErrorKind::Api {
        status: 401,
        message: "invalid x-api-key".to_string(),
    }));

    let err = orchestrator(&service)
        .generate_chapter(&request())
        .await
        .unwrap_err();

    assert!(err.is_provider_failure());
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn test_transient_provider_error_is_retried_once_then_fatal() {
    let service = Arc::new(MockCompletionService::new_error(
        ProviderErrorKind::Unreachable("connection refused".to_string()),
    ));

    let err = orchestrator(&service)
        .generate_chapter(&request())
        .await
        .unwrap_err();

    assert!(err.is_provider_failure());
    assert_eq!(service.call_count(), 2);
}

#[tokio::test]
async fn test_provider_failure_after_scored_draft_keeps_best() -> anyhow::Result<()> {
    let unreachable = ProviderErrorKind::Unreachable("connection refused".to_string());
    let service = Arc::new(MockCompletionService::new_sequence(vec![
        MockResponse::Success(chapter_json(WEAK_SCENE)),
        MockResponse::Error(unreachable.clone()),
        MockResponse::Error(unreachable),
    ]));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Exhausted);
    assert_eq!(outcome.result.prose_validation.score, 40);
    assert_eq!(outcome.attempt_count(), 2);
    assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Rejected);
    assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::ProviderFailed);
    assert!(outcome.attempts[1].reason.as_deref().unwrap().contains("connection refused"));
    assert_eq!(service.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_empty_response_is_retried() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_sequence(vec![
        MockResponse::Success("   \n".to_string()),
        MockResponse::Success(chapter_json(&good_scene())),
    ]));

    let outcome = orchestrator(&service).generate_chapter(&request()).await?;

    assert_eq!(outcome.attempt_count(), 1);
    assert_eq!(service.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_slow_response_times_out_and_is_retried() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_sequence(vec![
        MockResponse::Stall(Duration::from_secs(5), chapter_json(&good_scene())),
        MockResponse::Success(chapter_json(&good_scene())),
    ]));
    let mut config = fast_config();
    config.generation.request_timeout_secs = 1;
    let orchestrator = GenerationOrchestrator::new(service.clone(), &config)?;

    let outcome = orchestrator.generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Accepted);
    assert_eq!(service.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_accepted_chapter_reaches_the_sink() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryStore::new().with_canon(locked_canon()));
    store.insert_volume(volume(1))?;
    store.insert_chapter(chapter(1, 1))?;
    let service = Arc::new(MockCompletionService::new_success(chapter_json(&good_scene())));
    let orchestrator = orchestrator(&service).with_sink(store.clone());

    let outcome = orchestrator.generate_chapter(&request()).await?;

    let saved = store.chapter(1, 1)?;
    assert_eq!(saved.content.as_deref(), Some(outcome.result.content.as_str()));
    assert_eq!(saved.word_count, SCENE_WORDS);
    let memory = store.volume_memory(1).await?.unwrap_or_default();
    assert_eq!(memory.unresolved_arcs, vec!["the flooding tunnels".to_string()]);
    assert_eq!(memory.last_emotional_state.as_deref(), Some("dread"));
    Ok(())
}

#[tokio::test]
async fn test_single_attempt_configuration() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success(chapter_json(WEAK_SCENE)));
    let mut config = fast_config();
    config.generation.max_attempts = 1;
    let orchestrator = GenerationOrchestrator::new(service.clone(), &config)?;

    let outcome = orchestrator.generate_chapter(&request()).await?;

    assert_eq!(outcome.status, TerminalState::Exhausted);
    assert_eq!(service.call_count(), 1);
    Ok(())
}
