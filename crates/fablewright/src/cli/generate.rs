//! Model-backed commands and prompt previews.

use super::{OutputFormat, PromptCommands, prose::to_json};
use fablewright::{
    AssembledPrompt, CanonRequest, ChapterRequest, ContextAssembler, FablewrightConfig,
    FablewrightResult, GenerationOrchestrator, PageRequest, build_service, load_document,
};
use std::path::Path;
use tracing::{info, instrument, warn};

fn orchestrator(config: &FablewrightConfig) -> FablewrightResult<GenerationOrchestrator> {
    let service = build_service(&config.provider)?;
    GenerationOrchestrator::new(service, config)
}

fn print_assembled(prompt: &AssembledPrompt) {
    println!("=== SYSTEM ===\n{}\n", prompt.system());
    println!("=== USER ===\n{}", prompt.user());
}

/// Print the prompt a request would send, without calling a model.
#[instrument(skip_all)]
pub fn print_prompt(config: &FablewrightConfig, command: PromptCommands) -> FablewrightResult<()> {
    let assembler = ContextAssembler::new(config.assembler_settings());

    let prompt = match command {
        PromptCommands::Chapter { request } => {
            assembler.build_chapter_prompt(&load_document::<ChapterRequest>(&request)?)
        }
        PromptCommands::Page { request } => {
            assembler.build_page_prompt(&load_document::<PageRequest>(&request)?)
        }
        PromptCommands::Canon { request } => {
            assembler.build_canon_prompt(&load_document::<CanonRequest>(&request)?)
        }
    };

    print_assembled(&prompt);
    Ok(())
}

/// Generate a chapter and print it.
#[instrument(skip_all, fields(request = %request.display()))]
pub async fn generate_chapter(
    config: &FablewrightConfig,
    request: &Path,
    format: OutputFormat,
) -> FablewrightResult<()> {
    let chapter_request: ChapterRequest = load_document(request)?;
    let outcome = orchestrator(config)?
        .generate_chapter(&chapter_request)
        .await?;

    info!(
        status = %outcome.status,
        attempts = outcome.attempt_count(),
        score = outcome.result.prose_validation.score,
        "Chapter finished"
    );

    match format {
        OutputFormat::Json => println!("{}", to_json(&outcome)?),
        OutputFormat::Human => {
            println!("{}\n", outcome.result.content);
            println!("---");
            println!("Summary: {}", outcome.result.summary);
            println!(
                "Words: {}  Score: {}/100  Status: {}  Attempts: {}",
                outcome.result.word_count,
                outcome.result.prose_validation.score,
                outcome.status,
                outcome.attempt_count()
            );
        }
    }

    Ok(())
}

/// Generate a page and print it.
#[instrument(skip_all, fields(request = %request.display()))]
pub async fn generate_page(
    config: &FablewrightConfig,
    request: &Path,
    format: OutputFormat,
) -> FablewrightResult<()> {
    let page_request: PageRequest = load_document(request)?;
    let page = orchestrator(config)?.generate_page(&page_request).await?;

    match format {
        OutputFormat::Json => println!("{}", to_json(&page)?),
        OutputFormat::Human => {
            println!("{}\n", page.content);
            println!("---");
            println!("Words: {}", page.word_count);
            if !page.narrative_momentum.is_empty() {
                println!("Momentum: {}", page.narrative_momentum);
            }
        }
    }

    Ok(())
}

/// Generate a story canon and print it as JSON.
#[instrument(skip_all, fields(request = %request.display()))]
pub async fn generate_canon(config: &FablewrightConfig, request: &Path) -> FablewrightResult<()> {
    let canon_request: CanonRequest = load_document(request)?;
    let outcome = orchestrator(config)?.generate_canon(&canon_request).await?;

    for message in outcome.issue_messages() {
        warn!(issue = %message, "Canon needs attention before locking");
    }

    println!("{}", to_json(&outcome.canon)?);
    Ok(())
}
