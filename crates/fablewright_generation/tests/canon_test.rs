//! Tests for canon generation.

mod test_utils;

use fablewright_context::CanonRequest;
use fablewright_error::{CanonErrorKind, FablewrightErrorKind};
use fablewright_generation::GenerationOrchestrator;
use serde_json::json;
use std::sync::Arc;
use test_utils::*;

fn canon_json() -> String {
    json!({
        "whitepaper": "A drowned city and the smugglers who still work its tunnels.",
        "characters": [
            { "fullName": "Mara Voss", "shortName": "Mara", "description": "Smuggler" },
            { "fullName": "Tomas Reyes", "shortName": "Tomas" }
        ],
        "settings": "Lowtown, half under water.",
        "themes": ["trust", "debt"],
        "locked": true
    })
    .to_string()
}

fn request(characters: &str) -> CanonRequest {
    CanonRequest {
        premise: "Smugglers in a drowned city.".to_string(),
        characters: characters.to_string(),
        genre: "Literary thriller".to_string(),
        tone: "Tense".to_string(),
        pov: "Close third".to_string(),
        target_length: "Three volumes".to_string(),
        notes: None,
    }
}

#[tokio::test]
async fn test_generated_canon_is_unlocked_with_request_metadata() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success(format!(
        "Here is the canon:\n```json\n{}\n```",
        canon_json()
    )));
    let orchestrator = GenerationOrchestrator::new(service.clone(), &fast_config())?;

    let outcome = orchestrator
        .generate_canon(&request("Mara Voss – smuggler\nTomas Reyes – her partner"))
        .await?;

    assert!(outcome.is_clean(), "issues: {:?}", outcome.issue_messages());
    assert!(!outcome.canon.locked);
    assert_eq!(outcome.canon.metadata.genre, "Literary thriller");
    assert_eq!(outcome.canon.metadata.pov, "Close third");
    assert_eq!(outcome.canon.characters.len(), 2);
    assert_eq!(service.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_character_is_reported_not_fatal() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success(canon_json()));
    let orchestrator = GenerationOrchestrator::new(service.clone(), &fast_config())?;

    let outcome = orchestrator
        .generate_canon(&request(
            "Mara Voss – smuggler\nTomas Reyes – her partner\nIlse Brandt – the fence",
        ))
        .await?;

    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(
        outcome.issues[0].kind(),
        &CanonErrorKind::MissingCharacter("Ilse Brandt".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_empty_canon_reports_every_structural_problem() -> anyhow::Result<()> {
    let service = Arc::new(MockCompletionService::new_success("{}"));
    let orchestrator = GenerationOrchestrator::new(service.clone(), &fast_config())?;

    let outcome = orchestrator.generate_canon(&request("")).await?;

    let kinds: Vec<_> = outcome.issues.iter().map(|e| e.kind().clone()).collect();
    assert!(kinds.contains(&CanonErrorKind::EmptyWhitepaper));
    assert!(kinds.contains(&CanonErrorKind::NoCharacters));
    assert!(kinds.contains(&CanonErrorKind::NoThemes));
    Ok(())
}

#[tokio::test]
async fn test_unparseable_canon_is_malformed_output() {
    let service = Arc::new(MockCompletionService::new_success("I need more detail first."));
    let orchestrator = GenerationOrchestrator::new(service.clone(), &fast_config()).unwrap();

    let err = orchestrator
        .generate_canon(&request("Mara Voss"))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), FablewrightErrorKind::MalformedOutput(_)));
}

#[tokio::test]
async fn test_canon_without_short_names_still_parses() -> anyhow::Result<()> {
    let response = json!({
        "whitepaper": "A drowned city and the smugglers who still work its tunnels.",
        "characters": [
            { "fullName": "Mara Voss", "description": "Smuggler" },
            { "fullName": "Tomas Reyes" }
        ],
        "themes": ["trust"]
    })
    .to_string();
    let service = Arc::new(MockCompletionService::new_success(response));
    let orchestrator = GenerationOrchestrator::new(service.clone(), &fast_config())?;

    let outcome = orchestrator
        .generate_canon(&request("Mara Voss – smuggler\nTomas Reyes – her partner"))
        .await?;

    assert!(outcome.is_clean(), "issues: {:?}", outcome.issue_messages());
    assert_eq!(outcome.canon.characters[0].short_name, "Mara");
    assert_eq!(outcome.canon.characters[1].short_name, "Tomas");
    Ok(())
}
