//! Paragraph discipline for generated prose.

use crate::sentences::{count_sentences, split_paragraphs, split_sentences};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, instrument};

static DIALOGUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"\n]*"|“[^”\n]*”"#).expect("Valid dialogue regex"));

/// Sentences per narration paragraph and per dialogue paragraph.
const SENTENCES_PER_PARAGRAPH: usize = 4;
/// Narration that may share a paragraph with dialogue.
const MAX_ATTRIBUTION_CHARS: usize = 20;
/// Sentences above which a paragraph is oversized.
const MAX_PARAGRAPH_SENTENCES: usize = 5;
/// A single paragraph longer than this is a wall of text.
const WALL_OF_TEXT_CHARS: usize = 1000;

/// Reflows raw model output into short paragraphs with isolated dialogue.
///
/// Formatting is idempotent and never produces a paragraph of more than
/// five sentences.
///
/// # Examples
///
/// ```
/// use fablewright_prose::ProseFormatter;
///
/// let formatted = ProseFormatter.format("\"Hello,\" she said. \"I missed you.\" He looked away.");
/// assert_eq!(
///     formatted,
///     "\"Hello,\" she said.\n\n\"I missed you.\"\n\nHe looked away."
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProseFormatter;

impl ProseFormatter {
    /// Format text, joining paragraphs with blank lines.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn format(&self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        let paragraphs: Vec<String> = normalized
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .flat_map(|line| format_line(&line))
            .collect();
        debug!(paragraphs = paragraphs.len(), "Formatted prose");
        paragraphs.join("\n\n")
    }
}

enum Segment<'a> {
    Dialogue(&'a str),
    Narration(&'a str),
}

fn segments(line: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in DIALOGUE.find_iter(line) {
        if m.start() > last {
            out.push(Segment::Narration(&line[last..m.start()]));
        }
        out.push(Segment::Dialogue(m.as_str()));
        last = m.end();
    }
    if last < line.len() {
        out.push(Segment::Narration(&line[last..]));
    }
    out
}

/// A dialogue paragraph still open to an attribution or a continuation.
struct Speech {
    text: String,
    has_attribution: bool,
    awaiting_continuation: bool,
}

fn format_line(line: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut speech: Option<Speech> = None;

    for segment in segments(line) {
        match segment {
            Segment::Dialogue(span) => {
                let mut chunks = split_dialogue(span);
                if let Some(open) = speech.as_mut()
                    && open.awaiting_continuation
                    && chunks.len() == 1
                {
                    let joined = format!("{} {}", open.text, chunks[0]);
                    if count_sentences(&joined) <= SENTENCES_PER_PARAGRAPH {
                        open.text = joined;
                        open.awaiting_continuation = false;
                        continue;
                    }
                }
                paragraphs.extend(speech.take().map(|s| s.text));
                let last = chunks.pop().unwrap_or_default();
                paragraphs.extend(chunks);
                speech = Some(Speech {
                    text: last,
                    has_attribution: false,
                    awaiting_continuation: false,
                });
            }
            Segment::Narration(text) => {
                let sentences = split_sentences(text);
                let mut rest = &sentences[..];
                if let (Some(open), Some(first)) = (speech.as_mut(), sentences.first())
                    && !open.has_attribution
                    && is_attribution(first)
                {
                    open.text = format!("{} {}", open.text, first);
                    open.has_attribution = true;
                    open.awaiting_continuation = sentences.len() == 1 && first.ends_with(',');
                    rest = &sentences[1..];
                }
                if rest.is_empty() {
                    continue;
                }
                paragraphs.extend(speech.take().map(|s| s.text));
                paragraphs.extend(
                    rest.chunks(SENTENCES_PER_PARAGRAPH)
                        .map(|group| group.join(" ")),
                );
            }
        }
    }

    paragraphs.extend(speech.map(|s| s.text));
    paragraphs
}

/// A short lowercase tag such as `she said.` that belongs with its dialogue.
fn is_attribution(sentence: &str) -> bool {
    sentence.chars().next().is_some_and(char::is_lowercase)
        && sentence.chars().count() <= MAX_ATTRIBUTION_CHARS
}

/// Split a quoted span into quoted chunks of at most four sentences.
fn split_dialogue(span: &str) -> Vec<String> {
    let mut chars = span.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return vec![span.to_string()];
    };
    let inner = chars.as_str();
    let sentences = split_sentences(inner);
    if sentences.len() <= SENTENCES_PER_PARAGRAPH {
        return vec![span.to_string()];
    }
    sentences
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|group| format!("{}{}{}", open, group.join(" "), close))
        .collect()
}

/// A paragraph-discipline rule the text breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "rule")]
pub enum FormattingViolation {
    /// The whole text is one long paragraph
    WallOfText {
        /// Characters in that paragraph
        chars: usize,
    },
    /// A paragraph has more than five sentences
    OversizedParagraph {
        /// Zero-based paragraph index
        index: usize,
        /// Sentences found
        sentences: usize,
    },
    /// Dialogue shares a paragraph with substantial narration
    MixedDialogueNarrative {
        /// Zero-based paragraph index
        index: usize,
        /// Characters of narration outside the quotes
        narration_chars: usize,
    },
}

/// Result of [`validate_formatting`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingReport {
    /// True when no rule is broken
    pub is_valid: bool,
    /// Broken rules, in paragraph order
    pub violations: Vec<FormattingViolation>,
}

/// Check paragraph discipline without changing the text.
///
/// Diagnostic only; nothing in the pipeline blocks on it.
pub fn validate_formatting(text: &str) -> FormattingReport {
    let paragraphs = split_paragraphs(text);
    let mut violations = Vec::new();

    if let [only] = paragraphs.as_slice() {
        let chars = only.chars().count();
        if chars > WALL_OF_TEXT_CHARS {
            violations.push(FormattingViolation::WallOfText { chars });
        }
    }

    for (index, paragraph) in paragraphs.iter().enumerate() {
        let sentences = count_sentences(paragraph);
        if sentences > MAX_PARAGRAPH_SENTENCES {
            violations.push(FormattingViolation::OversizedParagraph { index, sentences });
        }
        if DIALOGUE.is_match(paragraph) {
            let narration_chars = DIALOGUE
                .split(paragraph)
                .map(|part| part.trim().chars().count())
                .sum::<usize>();
            if narration_chars > MAX_ATTRIBUTION_CHARS {
                violations.push(FormattingViolation::MixedDialogueNarrative {
                    index,
                    narration_chars,
                });
            }
        }
    }

    FormattingReport {
        is_valid: violations.is_empty(),
        violations,
    }
}
