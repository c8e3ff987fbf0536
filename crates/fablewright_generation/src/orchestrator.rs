//! The generate, validate and regenerate loop.

use crate::config::{FablewrightConfig, GenerationSettings};
use crate::drafts::{ChapterDraft, PageDraft};
use crate::extraction::{ParseOutcome, parse_with_repair};
use crate::outcome::{AttemptRecord, CanonOutcome, ChapterOutcome, ChapterResult, PageResult};
use crate::service::complete_with_retry;
use crate::state::{GenerationState, TerminalState};
use fablewright_context::{
    AssembledPrompt, CanonRequest, ChapterRequest, ContextAssembler, PageRequest,
};
use fablewright_core::{ChapterPages, CompletionRequest, StoryCanon, count_words};
use fablewright_error::{
    CanonError, CanonErrorKind, ContinuityError, ContinuityErrorKind, FablewrightResult,
    GenerationError, GenerationErrorKind, MalformedOutputError, WordCountError,
};
use fablewright_interface::{
    AcceptedChapter, AcceptedPage, PersistenceSink, QualitySummary, TextCompletionService,
};
use fablewright_prose::{ProseFormatter, ProseValidation, ProseValidator, parse_characters};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// A scored chapter attempt.
struct Candidate {
    draft: ChapterDraft,
    validation: ProseValidation,
}

/// Drives chapter, page and canon generation against an injected service.
///
/// The orchestrator holds no story state: every request carries the canon,
/// memory and continuity it needs. Accepted results go to the optional
/// [`PersistenceSink`].
pub struct GenerationOrchestrator {
    service: Arc<dyn TextCompletionService>,
    assembler: ContextAssembler,
    formatter: ProseFormatter,
    validator: ProseValidator,
    settings: GenerationSettings,
    sink: Option<Arc<dyn PersistenceSink>>,
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("provider", &self.service.provider_name())
            .field("model", &self.service.model_name())
            .field("settings", &self.settings)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl GenerationOrchestrator {
    /// Create an orchestrator from a service and configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the validator rubric or generation
    /// limits are invalid.
    pub fn new(
        service: Arc<dyn TextCompletionService>,
        config: &FablewrightConfig,
    ) -> FablewrightResult<Self> {
        config.validate()?;
        Ok(Self {
            service,
            assembler: ContextAssembler::new(config.assembler_settings()),
            formatter: ProseFormatter,
            validator: ProseValidator::new(config.validator.clone())?,
            settings: config.generation.clone(),
            sink: None,
        })
    }

    /// Persist accepted chapters and pages through `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn PersistenceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Generation limits in effect.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// The prompt assembler in use.
    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    fn completion_request(
        &self,
        prompt: &AssembledPrompt,
        max_tokens: u32,
    ) -> FablewrightResult<CompletionRequest> {
        CompletionRequest::builder()
            .system_prompt(prompt.system().as_str())
            .user_prompt(prompt.user().as_str())
            .max_tokens(max_tokens)
            .temperature(self.settings.temperature)
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::RequestBuild(e.to_string())).into())
    }

    async fn complete(&self, request: &CompletionRequest) -> FablewrightResult<String> {
        complete_with_retry(
            self.service.as_ref(),
            request,
            self.settings.request_timeout(),
            self.settings.provider_retries,
            self.settings.retry_backoff(),
        )
        .await
    }

    fn warn_if_unlocked(canon: &StoryCanon) {
        if !canon.locked {
            let error = CanonError::new(CanonErrorKind::Unlocked);
            warn!(error = %error, "Generating against an unlocked canon");
        }
    }

    /// Generate a chapter, regenerating weak drafts up to `max_attempts` times.
    ///
    /// The first draft that passes validation is accepted. If none passes, the
    /// highest-scoring parseable draft is returned with status
    /// [`TerminalState::Exhausted`]; ties keep the earlier draft. Unparseable
    /// output consumes an attempt and the next prompt asks for valid JSON.
    ///
    /// A provider failure that survives the retry ends the loop. If an earlier
    /// attempt produced a scored draft, that draft is returned as
    /// [`TerminalState::Exhausted`].
    ///
    /// # Errors
    ///
    /// - Provider failures before any draft was scored
    /// - [`GenerationErrorKind::AttemptsExhausted`] when no attempt parsed
    #[instrument(
        skip(self, request),
        fields(
            volume = request.chapter.volume_number,
            chapter = request.chapter.chapter_number,
            provider = self.service.provider_name()
        )
    )]
    pub async fn generate_chapter(
        &self,
        request: &ChapterRequest,
    ) -> FablewrightResult<ChapterOutcome> {
        Self::warn_if_unlocked(&request.canon);

        let prompt = self.assembler.build_chapter_prompt(request);
        let base = self.completion_request(&prompt, self.settings.chapter_max_tokens)?;
        let max_attempts = self.settings.max_attempts.max(1);

        let mut records = Vec::new();
        let mut accepted: Option<Candidate> = None;
        let mut best: Option<Candidate> = None;
        let mut last_failure = String::new();
        let mut state = GenerationState::start();

        let terminal = loop {
            state = match state {
                GenerationState::Drafting {
                    attempt,
                    corrective,
                } => {
                    info!(attempt, max_attempts, "Drafting chapter");
                    let call = match &corrective {
                        Some(block) => base.with_appended(block),
                        None => base.clone(),
                    };
                    let raw = match self.complete(&call).await {
                        Ok(raw) => raw,
                        Err(e) if e.is_provider_failure() && best.is_some() => {
                            warn!(
                                attempt,
                                error = %e,
                                "Provider failed, keeping best chapter draft"
                            );
                            records.push(AttemptRecord::provider_failed(attempt, &e.to_string()));
                            break TerminalState::Exhausted;
                        }
                        Err(e) => return Err(e),
                    };

                    match parse_with_repair::<ChapterDraft>(&raw) {
                        ParseOutcome::Parsed(draft) => GenerationState::Validating {
                            attempt,
                            draft,
                            repaired: false,
                        },
                        ParseOutcome::Repaired(draft) => GenerationState::Validating {
                            attempt,
                            draft,
                            repaired: true,
                        },
                        ParseOutcome::Fatal(reason) => {
                            warn!(attempt, reason = %reason, "Chapter response was malformed");
                            records.push(AttemptRecord::malformed(attempt, &reason));
                            let next = if attempt >= max_attempts {
                                GenerationState::Terminal(TerminalState::Exhausted)
                            } else {
                                GenerationState::RegenerationRequested {
                                    attempt,
                                    corrective: self
                                        .assembler
                                        .malformed_output_block(&reason, attempt + 1),
                                }
                            };
                            last_failure = reason;
                            next
                        }
                    }
                }
                GenerationState::Validating {
                    attempt,
                    draft,
                    repaired,
                } => {
                    let content = self.formatter.format(&draft.content);
                    let validation = self.validator.validate(&content);
                    debug!(
                        attempt,
                        score = validation.score,
                        issues = validation.issues.len(),
                        "Chapter draft validated"
                    );
                    records.push(AttemptRecord::scored(attempt, &validation, repaired));

                    let candidate = Candidate {
                        draft: ChapterDraft { content, ..draft },
                        validation,
                    };

                    if !candidate.validation.should_regenerate {
                        accepted = Some(candidate);
                        GenerationState::Terminal(TerminalState::Accepted)
                    } else {
                        last_failure = candidate
                            .validation
                            .regeneration_reason
                            .clone()
                            .unwrap_or_else(|| "quality checks failed".to_string());
                        let next = if attempt >= max_attempts {
                            GenerationState::Terminal(TerminalState::Exhausted)
                        } else {
                            GenerationState::RegenerationRequested {
                                attempt,
                                corrective: self
                                    .assembler
                                    .corrective_block(&candidate.validation, attempt + 1),
                            }
                        };
                        if best
                            .as_ref()
                            .is_none_or(|b| candidate.validation.score > b.validation.score)
                        {
                            best = Some(candidate);
                        }
                        next
                    }
                }
                GenerationState::RegenerationRequested {
                    attempt,
                    corrective,
                } => {
                    warn!(attempt, reason = %last_failure, "Regeneration requested");
                    GenerationState::Drafting {
                        attempt: attempt + 1,
                        corrective: Some(corrective),
                    }
                }
                GenerationState::Terminal(terminal) => break terminal,
            };
        };

        let Some(Candidate { draft, validation }) = accepted.or(best) else {
            error!(attempts = max_attempts, reason = %last_failure, "No chapter attempt parsed");
            return Err(GenerationError::new(GenerationErrorKind::AttemptsExhausted {
                attempts: max_attempts,
                reason: last_failure,
            })
            .into());
        };

        let result = ChapterResult {
            word_count: count_words(&draft.content),
            content: draft.content,
            summary: draft.summary,
            state_delta: draft.state_delta,
            prose_validation: validation,
        };

        match terminal {
            TerminalState::Accepted => info!(
                score = result.prose_validation.score,
                attempts = records.len(),
                "Chapter accepted"
            ),
            TerminalState::Exhausted => warn!(
                score = result.prose_validation.score,
                attempts = records.len(),
                "Attempts exhausted, keeping best chapter draft"
            ),
        }

        if let Some(sink) = &self.sink {
            sink.save_chapter(&AcceptedChapter {
                volume_number: request.chapter.volume_number,
                chapter_number: request.chapter.chapter_number,
                content: result.content.clone(),
                summary: result.summary.clone(),
                state_delta: result.state_delta.clone(),
                word_count: result.word_count,
                prose_validation: QualitySummary {
                    score: result.prose_validation.score,
                    issues: result.prose_validation.issues.clone(),
                    warnings: result.prose_validation.warnings.clone(),
                },
            })
            .await?;
        }

        Ok(ChapterOutcome {
            result,
            status: terminal,
            attempts: records,
        })
    }

    /// Generate one page in a single attempt.
    ///
    /// Pages are strictly sequential: the requested page must be the next
    /// page, or the last existing page when regenerating. Only pages before
    /// the requested one feed the continuity window.
    ///
    /// # Errors
    ///
    /// - [`ContinuityErrorKind`] for skipped or locked pages
    /// - [`MalformedOutputError`] when the response cannot be parsed
    /// - [`WordCountError`] when the formatted page leaves the word band
    /// - Provider failures that survive the retry
    #[instrument(
        skip(self, request),
        fields(
            volume = request.chapter.volume_number,
            chapter = request.chapter.chapter_number,
            page = request.page_number,
            provider = self.service.provider_name()
        )
    )]
    pub async fn generate_page(&self, request: &PageRequest) -> FablewrightResult<PageResult> {
        Self::warn_if_unlocked(&request.canon);

        let existing = ChapterPages::from_pages(request.prior_pages.clone());
        match existing.last_page_number() {
            Some(last) if request.page_number <= last => {
                existing.ensure_regenerable(request.page_number)?;
                info!(page = request.page_number, "Regenerating last page");
            }
            _ if request.page_number != existing.next_page_number() => {
                return Err(ContinuityError::new(ContinuityErrorKind::PageOutOfOrder {
                    expected: existing.next_page_number(),
                    actual: request.page_number,
                })
                .into());
            }
            _ => {}
        }

        let mut scoped = request.clone();
        scoped
            .prior_pages
            .retain(|page| page.page_number < request.page_number);

        let prompt = self.assembler.build_page_prompt(&scoped);
        let call = self.completion_request(&prompt, self.settings.page_max_tokens)?;
        let raw = self.complete(&call).await?;

        let draft = match parse_with_repair::<PageDraft>(&raw) {
            ParseOutcome::Parsed(draft) => draft,
            ParseOutcome::Repaired(draft) => {
                debug!("Page response needed repair");
                draft
            }
            ParseOutcome::Fatal(reason) => {
                error!(reason = %reason, "Page response was malformed");
                return Err(MalformedOutputError::new(reason, &raw).into());
            }
        };

        let content = self.formatter.format(&draft.content);
        let word_count = count_words(&content);
        let (min, max) = (self.settings.page_min_words, self.settings.page_max_words);
        if word_count < min || word_count > max {
            error!(word_count, min, max, "Page outside the word band");
            return Err(WordCountError::new(word_count, min, max).into());
        }

        let result = PageResult {
            content,
            beat_coverage: draft.beat_coverage,
            narrative_momentum: draft.narrative_momentum,
            word_count,
        };

        if let Some(sink) = &self.sink {
            sink.save_page(&AcceptedPage {
                volume_number: request.chapter.volume_number,
                chapter_number: request.chapter.chapter_number,
                page_number: request.page_number,
                content: result.content.clone(),
                beat_coverage: result.beat_coverage.clone(),
                narrative_momentum: result.narrative_momentum.clone(),
                word_count,
            })
            .await?;
        }

        info!(word_count, "Page generated");
        Ok(result)
    }

    /// Generate a story canon from a premise and character roster.
    ///
    /// The canon comes back unlocked. Structural problems, such as a listed
    /// character missing from the output, are logged and returned with it.
    ///
    /// # Errors
    ///
    /// - [`MalformedOutputError`] when the response cannot be parsed
    /// - Provider failures that survive the retry
    #[instrument(skip(self, request), fields(provider = self.service.provider_name()))]
    pub async fn generate_canon(&self, request: &CanonRequest) -> FablewrightResult<CanonOutcome> {
        let prompt = self.assembler.build_canon_prompt(request);
        let call = self.completion_request(&prompt, self.settings.canon_max_tokens)?;
        let raw = self.complete(&call).await?;

        let mut canon = match parse_with_repair::<StoryCanon>(&raw) {
            ParseOutcome::Parsed(canon) | ParseOutcome::Repaired(canon) => canon,
            ParseOutcome::Fatal(reason) => {
                error!(reason = %reason, "Canon response was malformed");
                return Err(MalformedOutputError::new(reason, &raw).into());
            }
        };

        fill_blank(&mut canon.metadata.genre, &request.genre);
        fill_blank(&mut canon.metadata.tone, &request.tone);
        fill_blank(&mut canon.metadata.pov, &request.pov);
        fill_blank(&mut canon.metadata.target_length, &request.target_length);
        canon.locked = false;

        let roster = parse_characters(&request.characters);
        let required: Vec<&str> = roster.iter().map(|c| c.full_name.as_str()).collect();
        let issues = canon.validate(&required);
        for issue in &issues {
            error!(error = %issue, "Generated canon failed a structural check");
        }

        info!(
            characters = canon.characters.len(),
            issues = issues.len(),
            "Canon generated"
        );
        Ok(CanonOutcome { canon, issues })
    }
}

fn fill_blank(field: &mut String, fallback: &str) {
    if field.trim().is_empty() {
        *field = fallback.to_string();
    }
}
