//! Prompt assembly for chapters, pages and canons.

use crate::contracts::{canon_output_contract, chapter_output_contract, page_output_contract};
use crate::layers::{act_layer, global_layer, local_chapter_layer, local_page_layer, volume_layer};
use crate::policy::{StoryPosition, canonical_names_block, continuity_policy, outline_block};
use crate::request::{CanonRequest, ChapterRequest, PageRequest};
use fablewright_core::StoryCanon;
use fablewright_prose::{ProseValidation, QualityCheck, parse_characters};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Most pages ever carried verbatim in the local layer.
pub const MAX_CONTINUITY_PAGES: usize = 17;

/// A system prompt and user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct AssembledPrompt {
    /// Role, house style and name rules
    system: String,
    /// Context layers, task and output format
    user: String,
}

/// Numbers the assembler writes into prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerSettings {
    /// Prior pages carried verbatim, capped at 17
    pub continuity_pages: usize,
    /// Smallest allowed page
    pub page_min_words: usize,
    /// Largest allowed page
    pub page_max_words: usize,
    /// Chapter length when the chapter sets no target
    pub default_chapter_words: u32,
}

impl Default for AssemblerSettings {
    fn default() -> Self {
        Self {
            continuity_pages: MAX_CONTINUITY_PAGES,
            page_min_words: 600,
            page_max_words: 1200,
            default_chapter_words: 3000,
        }
    }
}

/// Builds layered prompts from canon, memory and continuity.
///
/// # Examples
///
/// ```
/// use fablewright_context::{ChapterRequest, ContextAssembler};
///
/// let assembler = ContextAssembler::default();
/// let prompt = assembler.build_chapter_prompt(&ChapterRequest::default());
///
/// assert!(prompt.user().contains("\"stateDelta\""));
/// assert!(prompt.user().contains("not the end of the story"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    settings: AssemblerSettings,
}

fn section(title: &str, body: String) -> Option<String> {
    let body = body.trim();
    (!body.is_empty()).then(|| format!("=== {} ===\n{}", title, body))
}

fn join(sections: Vec<Option<String>>) -> String {
    sections.into_iter().flatten().collect::<Vec<_>>().join("\n\n")
}

impl ContextAssembler {
    /// Create an assembler; the continuity window is capped at 17 pages.
    pub fn new(mut settings: AssemblerSettings) -> Self {
        settings.continuity_pages = settings.continuity_pages.clamp(1, MAX_CONTINUITY_PAGES);
        Self { settings }
    }

    /// The active settings.
    pub fn settings(&self) -> &AssemblerSettings {
        &self.settings
    }

    /// Role, house style and canonical names.
    pub fn system_prompt(&self, canon: &StoryCanon) -> String {
        let meta = &canon.metadata;
        let mut voice = String::from("You are the novelist co-writing a long-form serialized novel.");
        if !meta.pov.trim().is_empty() {
            voice.push_str(&format!(" Write in {}.", meta.pov.trim()));
        }
        if !meta.tone.trim().is_empty() {
            voice.push_str(&format!(" The tone is {}.", meta.tone.trim()));
        }
        let authority = if canon.locked {
            "The story canon is locked and authoritative: treat every fact in it as true and never contradict it."
        } else {
            "Treat the story canon as authoritative and never contradict it."
        };
        join(vec![
            Some(voice),
            Some(authority.to_string()),
            Some(
                "HOUSE STYLE:\n\
                 - Write in scene: play events out moment by moment instead of summarising them.\n\
                 - Keep paragraphs to four sentences or fewer; give each line of dialogue its own paragraph.\n\
                 - Ground every scene in sensory detail, the viewpoint character's thoughts, and physical movement.\n\
                 - Never open on waking up, sunrises, alarm clocks or \"another day\".\n\
                 - Keep exposition light; reveal history through action and dialogue.\n\
                 - Stay inside the story: never mention the story bible, canon, outlines, rules, beats or any other planning vocabulary."
                    .to_string(),
            ),
            section("NAMES", canonical_names_block(&canon.characters)),
            Some("Respond with JSON only, exactly in the requested format.".to_string()),
        ])
    }

    /// Prompt for a whole chapter.
    #[instrument(skip(self, request), fields(volume = request.volume.volume_number, chapter = request.chapter.chapter_number))]
    pub fn build_chapter_prompt(&self, request: &ChapterRequest) -> AssembledPrompt {
        let chapter = &request.chapter;
        let position = StoryPosition {
            volume_number: request.volume.volume_number,
            total_volumes: request.total_volumes,
            chapter_number: chapter.chapter_number,
            chapters_in_volume: request.volume.target_chapter_count,
            page_number: None,
            pages_in_chapter: None,
        };

        let mut task = format!(
            "Write chapter {}{} of volume {}",
            chapter.chapter_number,
            chapter
                .title
                .as_deref()
                .map(|t| format!(" \"{}\"", t))
                .unwrap_or_default(),
            request.volume.volume_number
        );
        if chapter.global_chapter_number > 0 {
            task.push_str(&format!(
                " (chapter {} of the book)",
                chapter.global_chapter_number
            ));
        }
        task.push_str(&format!(
            ". Aim for about {} words.",
            chapter
                .target_word_count
                .unwrap_or(self.settings.default_chapter_words)
        ));

        let user = join(vec![
            section("STORY CANON", global_layer(&request.canon)),
            section(
                "VOLUME",
                volume_layer(&request.volume, request.volume_memory.as_ref()),
            ),
            section(
                "ACT",
                act_layer(request.act.as_ref(), request.act_memory.as_ref()),
            ),
            section(
                "PREVIOUS CHAPTER",
                local_chapter_layer(request.previous_chapter.as_ref()),
            ),
            section(
                "TASK",
                join(vec![
                    Some(task),
                    section(
                        "OUTLINES",
                        outline_block(chapter.binding_outline(), request.volume.outline.as_deref()),
                    ),
                    Some(continuity_policy(&position)),
                    instructions(request.instructions.as_deref()),
                ]),
            ),
            section("OUTPUT FORMAT", chapter_output_contract().to_string()),
        ]);

        let prompt = AssembledPrompt {
            system: self.system_prompt(&request.canon),
            user,
        };
        debug!(
            system_len = prompt.system.len(),
            user_len = prompt.user.len(),
            "Assembled chapter prompt"
        );
        prompt
    }

    /// Prompt for one page, carrying recent pages verbatim.
    #[instrument(skip(self, request), fields(chapter = request.chapter.chapter_number, page = request.page_number))]
    pub fn build_page_prompt(&self, request: &PageRequest) -> AssembledPrompt {
        let chapter = &request.chapter;
        let position = StoryPosition {
            volume_number: request.volume.volume_number,
            total_volumes: request.total_volumes,
            chapter_number: chapter.chapter_number,
            chapters_in_volume: request.volume.target_chapter_count,
            page_number: Some(request.page_number),
            pages_in_chapter: chapter.target_page_count,
        };
        let task = format!(
            "Write page {} of chapter {} in volume {}. The page must be between {} and {} words \
             and cover one or two micro-beats, advancing the chapter outline in order.",
            request.page_number,
            chapter.chapter_number,
            request.volume.volume_number,
            self.settings.page_min_words,
            self.settings.page_max_words
        );

        let user = join(vec![
            section("STORY CANON", global_layer(&request.canon)),
            section(
                "VOLUME",
                volume_layer(&request.volume, request.volume_memory.as_ref()),
            ),
            section(
                "ACT",
                act_layer(request.act.as_ref(), request.act_memory.as_ref()),
            ),
            section(
                "CONTINUITY",
                local_page_layer(
                    &request.prior_pages,
                    self.settings.continuity_pages,
                    request.previous_chapter.as_ref(),
                ),
            ),
            section(
                "TASK",
                join(vec![
                    Some(task),
                    section(
                        "OUTLINES",
                        outline_block(chapter.binding_outline(), request.volume.outline.as_deref()),
                    ),
                    Some(continuity_policy(&position)),
                    instructions(request.instructions.as_deref()),
                ]),
            ),
            section("OUTPUT FORMAT", page_output_contract().to_string()),
        ]);

        let prompt = AssembledPrompt {
            system: self.system_prompt(&request.canon),
            user,
        };
        debug!(
            prior_pages = request.prior_pages.len(),
            user_len = prompt.user.len(),
            "Assembled page prompt"
        );
        prompt
    }

    /// Prompt for a story canon built from a premise and a free-text roster.
    #[instrument(skip(self, request))]
    pub fn build_canon_prompt(&self, request: &CanonRequest) -> AssembledPrompt {
        let roster = parse_characters(&request.characters);
        let roster_section = if roster.is_empty() {
            request.characters.trim().to_string()
        } else {
            format!(
                "Include every one of these characters with exactly these names:\n{}",
                canonical_names_block(&roster)
            )
        };

        let mut brief = String::new();
        for (label, value) in [
            ("Premise", &request.premise),
            ("Genre", &request.genre),
            ("Tone", &request.tone),
            ("Point of view", &request.pov),
            ("Target length", &request.target_length),
        ] {
            if !value.trim().is_empty() {
                brief.push_str(&format!("{}: {}\n", label, value.trim()));
            }
        }

        let user = join(vec![
            section("BRIEF", brief),
            section("CHARACTERS", roster_section),
            section("NOTES", request.notes.clone().unwrap_or_default()),
            section(
                "TASK",
                "Build the complete story bible. Every character needs a full name of at least two \
                 words. List at least three themes, concrete world rules, and hard constraints the \
                 story must never break."
                    .to_string(),
            ),
            section("OUTPUT FORMAT", canon_output_contract().to_string()),
        ]);

        AssembledPrompt {
            system: "You are a story architect designing the story bible for a long-form serialized \
                     novel. Be specific and internally consistent. Respond with JSON only."
                .to_string(),
            user,
        }
    }

    /// Text appended to the original prompt after a rejected draft.
    ///
    /// Names each failed check with an instruction for fixing it.
    pub fn corrective_block(&self, validation: &ProseValidation, next_attempt: u32) -> String {
        let mut checks: Vec<QualityCheck> = Vec::new();
        for check in &validation.failed_checks {
            if !checks.contains(check) {
                checks.push(*check);
            }
        }
        let mut out = format!(
            "=== REVISION REQUIRED (attempt {}) ===\nThe previous draft scored {}/100 and was rejected. \
             Write a new draft of the same chapter that fixes every problem below.\n",
            next_attempt, validation.score
        );
        for check in checks {
            out.push_str(&format!("- {}: {}\n", check, check.corrective_instruction()));
        }
        if !validation.issues.is_empty() {
            out.push_str("Problems found:\n");
            for issue in &validation.issues {
                out.push_str(&format!("- {}\n", issue));
            }
        }
        out.trim_end().to_string()
    }

    /// Text appended after a response that could not be parsed.
    pub fn malformed_output_block(&self, reason: &str, next_attempt: u32) -> String {
        format!(
            "=== REVISION REQUIRED (attempt {}) ===\nThe previous response could not be read as JSON ({}). \
             Respond with exactly one valid JSON object in the requested format, with every quote \
             and newline inside strings escaped.",
            next_attempt, reason
        )
    }
}

fn instructions(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("Author's direction: {}", t))
}
