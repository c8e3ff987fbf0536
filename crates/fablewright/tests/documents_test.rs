//! Tests for loading request documents from disk.

use fablewright::{
    CanonRequest, ContextAssembler, FablewrightConfig, FablewrightErrorKind, ProseFormatter,
    load_document, read_text,
};
use std::io::Write;
use tempfile::Builder;

const CANON_TOML: &str = r#"
premise = "A lighthouse keeper finds the sea has stopped moving."
characters = """
Mara Quill (Mara) - the keeper, stubborn and sleepless
Tomas Reyes - the supply pilot
"""
genre = "literary fantasy"
tone = "quiet dread"
pov = "close third"
targetLength = "2 volumes"
"#;

fn write_temp(suffix: &str, contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = Builder::new().suffix(suffix).tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_toml_request() -> anyhow::Result<()> {
    let file = write_temp(".toml", CANON_TOML)?;
    let request: CanonRequest = load_document(file.path())?;

    assert_eq!(request.genre, "literary fantasy");
    assert_eq!(request.target_length, "2 volumes");
    assert!(request.characters.contains("Tomas Reyes"));
    assert!(request.notes.is_none());
    Ok(())
}

#[test]
fn test_load_json_request() -> anyhow::Result<()> {
    let json = r#"{"premise": "The sea stopped.", "targetLength": "1 volume", "pov": "first"}"#;
    let file = write_temp(".json", json)?;
    let request: CanonRequest = load_document(file.path())?;

    assert_eq!(request.premise, "The sea stopped.");
    assert_eq!(request.pov, "first");
    assert!(request.genre.is_empty());
    Ok(())
}

#[test]
fn test_unknown_extension_parses_as_json() -> anyhow::Result<()> {
    let file = write_temp(".req", r#"{"premise": "Fog."}"#)?;
    let request: CanonRequest = load_document(file.path())?;
    assert_eq!(request.premise, "Fog.");
    Ok(())
}

#[test]
fn test_malformed_json_names_file() -> anyhow::Result<()> {
    let file = write_temp(".json", r#"{"premise": "#)?;
    let err = load_document::<CanonRequest>(file.path()).unwrap_err();

    assert!(matches!(err.kind(), FablewrightErrorKind::Json(_)));
    assert!(err.to_string().contains(&file.path().display().to_string()));
    Ok(())
}

#[test]
fn test_malformed_toml_is_config_error() -> anyhow::Result<()> {
    let file = write_temp(".toml", "premise = ")?;
    let err = load_document::<CanonRequest>(file.path()).unwrap_err();
    assert!(matches!(err.kind(), FablewrightErrorKind::Config(_)));
    Ok(())
}

#[test]
fn test_missing_file_is_read_error() {
    let err = read_text("/nonexistent/fablewright/scene.txt").unwrap_err();
    assert!(matches!(err.kind(), FablewrightErrorKind::Config(_)));
}

#[test]
fn test_read_text_then_format() -> anyhow::Result<()> {
    let file = write_temp(
        ".txt",
        "Rain hammered the glass. \"Hold the door,\" she said. Tomas did not move.",
    )?;
    let text = read_text(file.path())?;
    let formatted = ProseFormatter.format(&text);

    assert!(formatted.contains("\n\n"));
    assert!(formatted.contains("\"Hold the door,\" she said."));
    Ok(())
}

#[test]
fn test_canon_prompt_from_loaded_request() -> anyhow::Result<()> {
    let file = write_temp(".toml", CANON_TOML)?;
    let request: CanonRequest = load_document(file.path())?;
    let config = FablewrightConfig::load()?;
    let prompt = ContextAssembler::new(config.assembler_settings()).build_canon_prompt(&request);

    assert!(prompt.user().contains("A lighthouse keeper finds the sea has stopped moving."));
    assert!(prompt.user().contains("Mara Quill"));
    Ok(())
}
