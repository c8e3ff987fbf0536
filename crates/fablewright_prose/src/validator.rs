//! Deterministic prose quality gate.
//!
//! The validator scores text out of 100 against the house style: no
//! references to the generation scaffolding, no clichéd openings, short
//! paragraphs, scenes rather than summaries, and enough sensory detail,
//! interiority and movement to stay grounded.

use crate::ValidatorConfig;
use crate::patterns::{
    CANON_LEAKAGE, CLICHE_OPENINGS, EXPOSITION, INTERIORITY, MOVEMENT, SENSORY, SYNOPSIS_STYLE,
    WeightedPattern, compile,
};
use crate::sentences::{count_sentences, split_paragraphs};
use fablewright_core::count_words;
use fablewright_error::{ConfigError, ConfigErrorKind, FablewrightResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

static OPENINGS: LazyLock<Vec<WeightedPattern>> = LazyLock::new(|| compile(CLICHE_OPENINGS));

/// The individual checks, in the order they run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum QualityCheck {
    /// No text at all
    Empty,
    /// Prose mentions the story bible or pipeline vocabulary
    CanonLeakage,
    /// First paragraph opens on a cliché
    Opening,
    /// Paragraphs carry too many sentences
    ParagraphRhythm,
    /// Too few paragraph breaks for the length
    ParagraphDensity,
    /// Summarising instead of dramatising
    SynopsisStyle,
    /// Too little sensory detail
    SensoryDetail,
    /// Too little access to thought and feeling
    Interiority,
    /// Too little physical movement
    Movement,
    /// Too much encyclopaedic exposition
    ExpositionDensity,
}

impl QualityCheck {
    /// Instruction given to the model when this check fails.
    pub fn corrective_instruction(&self) -> &'static str {
        match self {
            QualityCheck::Empty => "Return the full prose in the content field; it was empty.",
            QualityCheck::CanonLeakage => {
                "Stay inside the story. Never mention the story bible, canon, outlines, rules or any planning vocabulary in the prose."
            }
            QualityCheck::Opening => {
                "Open in the middle of a scene with a character acting or speaking. No waking up, sunrises, alarms or 'another day'."
            }
            QualityCheck::ParagraphRhythm => {
                "Keep paragraphs to at most four sentences and never exceed eight."
            }
            QualityCheck::ParagraphDensity => {
                "Break the text into more paragraphs; start a new one for each speaker, action beat or shift in focus."
            }
            QualityCheck::SynopsisStyle => {
                "Dramatise instead of summarising: play events out moment by moment, without time skips like 'eventually' or 'after a while'."
            }
            QualityCheck::SensoryDetail => {
                "Ground each scene in concrete sensory detail: sound, smell, texture, temperature, light."
            }
            QualityCheck::Interiority => {
                "Let the point-of-view character's thoughts and feelings show through the action."
            }
            QualityCheck::Movement => {
                "Keep bodies moving: characters should act, gesture and change position during the scene."
            }
            QualityCheck::ExpositionDensity => {
                "Cut background exposition; reveal history only through what characters do and say."
            }
        }
    }
}

/// Verdict for a piece of prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProseValidation {
    /// Score at or above the pass mark
    pub is_valid: bool,
    /// Score from 0 to 100
    pub score: u32,
    /// Problems that cost points and count toward regeneration
    pub issues: Vec<String>,
    /// Softer problems
    pub warnings: Vec<String>,
    /// Whether the text should be generated again
    pub should_regenerate: bool,
    /// Why regeneration was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regeneration_reason: Option<String>,
    /// Checks that deducted points
    pub failed_checks: Vec<QualityCheck>,
}

/// Result of [`validate_opening`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningCheck {
    /// False when the opening matches a cliché
    pub is_valid: bool,
    /// The cliché found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Check the first paragraph against the bank of clichéd openings.
///
/// # Examples
///
/// ```
/// use fablewright_prose::validate_opening;
///
/// let check = validate_opening("I woke up and stretched.");
/// assert!(!check.is_valid);
/// assert!(check.reason.unwrap().contains("waking up"));
/// ```
pub fn validate_opening(text: &str) -> OpeningCheck {
    let Some(first) = split_paragraphs(text).into_iter().next() else {
        return OpeningCheck {
            is_valid: true,
            reason: None,
        };
    };
    let hits: Vec<&str> = OPENINGS
        .iter()
        .filter(|p| p.regex.is_match(first))
        .map(|p| p.label.as_str())
        .collect();
    if hits.is_empty() {
        OpeningCheck {
            is_valid: true,
            reason: None,
        }
    } else {
        OpeningCheck {
            is_valid: false,
            reason: Some(format!("Opening relies on a cliché: {}", hits.join(", "))),
        }
    }
}

/// Sentence distribution over paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RhythmReport {
    /// Paragraphs found
    pub paragraph_count: usize,
    /// Mean sentences per paragraph
    pub average_sentences: f64,
    /// Largest paragraph, in sentences
    pub max_sentences: usize,
    /// Sentence count of every paragraph
    pub sentences_per_paragraph: Vec<usize>,
}

impl RhythmReport {
    /// Indices of paragraphs with more than `limit` sentences.
    pub fn paragraphs_over(&self, limit: usize) -> Vec<usize> {
        self.sentences_per_paragraph
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > limit)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Count sentences in each paragraph.
pub fn analyze_paragraph_rhythm(text: &str) -> RhythmReport {
    let sentences_per_paragraph: Vec<usize> = split_paragraphs(text)
        .into_iter()
        .map(count_sentences)
        .collect();
    let paragraph_count = sentences_per_paragraph.len();
    let total: usize = sentences_per_paragraph.iter().sum();
    let average_sentences = if paragraph_count == 0 {
        0.0
    } else {
        total as f64 / paragraph_count as f64
    };
    RhythmReport {
        paragraph_count,
        average_sentences,
        max_sentences: sentences_per_paragraph.iter().copied().max().unwrap_or(0),
        sentences_per_paragraph,
    }
}

/// Paragraph breaks relative to length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityReport {
    /// Characters in the text
    pub chars: usize,
    /// Breaks between paragraphs
    pub paragraph_breaks: usize,
    /// Breaks expected for the length
    pub expected_breaks: usize,
}

impl DensityReport {
    /// Whether there are fewer breaks than expected.
    pub fn is_sparse(&self) -> bool {
        self.paragraph_breaks < self.expected_breaks
    }
}

/// Compare paragraph breaks to one per `chars_per_break` characters.
pub fn analyze_paragraph_density(text: &str, chars_per_break: usize) -> DensityReport {
    let chars = text.trim().chars().count();
    DensityReport {
        chars,
        paragraph_breaks: split_paragraphs(text).len().saturating_sub(1),
        expected_breaks: chars / chars_per_break.max(1),
    }
}

/// Scores prose and decides whether to regenerate it.
///
/// # Examples
///
/// ```
/// use fablewright_prose::{ProseValidator, QualityCheck};
///
/// let validator = ProseValidator::default();
/// let verdict = validator.validate("According to the story bible, dragons cannot fly.");
///
/// assert_eq!(verdict.score, 0);
/// assert!(verdict.should_regenerate);
/// assert_eq!(verdict.failed_checks, vec![QualityCheck::CanonLeakage]);
/// ```
#[derive(Debug, Clone)]
pub struct ProseValidator {
    config: ValidatorConfig,
    leakage: Vec<WeightedPattern>,
    synopsis: Vec<WeightedPattern>,
    sensory: Vec<WeightedPattern>,
    interiority: Vec<WeightedPattern>,
    movement: Vec<WeightedPattern>,
    exposition: Vec<WeightedPattern>,
}

impl Default for ProseValidator {
    fn default() -> Self {
        Self::with_tables(ValidatorConfig::default(), Vec::new())
    }
}

/// Running tally while the checks execute.
struct Tally {
    score: i64,
    issues: Vec<String>,
    warnings: Vec<String>,
    failed_checks: Vec<QualityCheck>,
}

impl Tally {
    fn issue(&mut self, check: QualityCheck, penalty: u32, message: String) {
        self.score -= i64::from(penalty);
        self.issues.push(message);
        self.failed_checks.push(check);
    }

    fn warning(&mut self, check: QualityCheck, penalty: u32, message: String) {
        self.score -= i64::from(penalty);
        self.warnings.push(message);
        self.failed_checks.push(check);
    }
}

impl ProseValidator {
    /// Create a validator, compiling any extra leakage patterns.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if an extra pattern is not a valid regex.
    pub fn new(config: ValidatorConfig) -> FablewrightResult<Self> {
        let mut extra = Vec::new();
        for pattern in &config.extra_leakage_patterns {
            let regex = Regex::new(&format!("(?i){}", pattern)).map_err(|e| {
                ConfigError::new(ConfigErrorKind::InvalidValue {
                    key: "validator.extra_leakage_patterns".to_string(),
                    reason: format!("invalid regex '{}': {}", pattern, e),
                })
            })?;
            extra.push(WeightedPattern {
                label: pattern.clone(),
                regex,
                weight: 1,
            });
        }
        Ok(Self::with_tables(config, extra))
    }

    fn with_tables(config: ValidatorConfig, extra_leakage: Vec<WeightedPattern>) -> Self {
        let mut leakage = compile(CANON_LEAKAGE);
        leakage.extend(extra_leakage);
        Self {
            config,
            leakage,
            synopsis: compile(SYNOPSIS_STYLE),
            sensory: compile(SENSORY),
            interiority: compile(INTERIORITY),
            movement: compile(MOVEMENT),
            exposition: compile(EXPOSITION),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Labels of the leakage patterns found in `text`.
    pub fn detect_canon_leakage(&self, text: &str) -> Vec<String> {
        self.leakage
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.label.clone())
            .collect()
    }

    /// Synopsis sub-score from 0 to 100.
    pub fn synopsis_score(&self, text: &str) -> u32 {
        let hits: u32 = self.synopsis.iter().map(|p| p.weighted_count(text)).sum();
        let long_paragraphs = split_paragraphs(text)
            .into_iter()
            .filter(|p| p.chars().count() > self.config.long_paragraph_chars)
            .count() as u32;
        (hits * 5 + long_paragraphs * 10).min(100)
    }

    /// Run every check and produce a verdict.
    #[instrument(skip(self, text), fields(word_count = count_words(text)))]
    pub fn validate(&self, text: &str) -> ProseValidation {
        let config = &self.config;

        if text.trim().is_empty() {
            return rejected(QualityCheck::Empty, "Prose is empty".to_string());
        }

        let leaks = self.detect_canon_leakage(text);
        if !leaks.is_empty() {
            warn!(patterns = ?leaks, "Canon leakage detected");
            return rejected(
                QualityCheck::CanonLeakage,
                format!(
                    "Canon leakage: prose refers to its own story bible or planning ({})",
                    leaks.join(", ")
                ),
            );
        }

        let mut tally = Tally {
            score: 100,
            issues: Vec::new(),
            warnings: Vec::new(),
            failed_checks: Vec::new(),
        };

        let opening = validate_opening(text);
        if let Some(reason) = opening.reason {
            tally.issue(QualityCheck::Opening, config.opening_penalty, reason);
        }

        let rhythm = analyze_paragraph_rhythm(text);
        if rhythm.average_sentences > config.max_average_sentences {
            tally.issue(
                QualityCheck::ParagraphRhythm,
                config.average_sentences_penalty,
                format!(
                    "Paragraphs average {:.1} sentences (limit {})",
                    rhythm.average_sentences, config.max_average_sentences
                ),
            );
        }
        let oversized = rhythm.paragraphs_over(config.max_paragraph_sentences);
        if !oversized.is_empty() {
            tally.issue(
                QualityCheck::ParagraphRhythm,
                config.oversized_paragraph_penalty,
                format!(
                    "{} paragraph(s) exceed {} sentences",
                    oversized.len(),
                    config.max_paragraph_sentences
                ),
            );
        }

        let density = analyze_paragraph_density(text, config.chars_per_break);
        if density.is_sparse() {
            tally.issue(
                QualityCheck::ParagraphDensity,
                config.density_penalty,
                format!(
                    "Only {} paragraph breaks for {} characters (expected at least {})",
                    density.paragraph_breaks, density.chars, density.expected_breaks
                ),
            );
        }

        let synopsis = self.synopsis_score(text);
        if synopsis > config.synopsis_issue_threshold {
            tally.issue(
                QualityCheck::SynopsisStyle,
                config.synopsis_issue_penalty,
                format!("Synopsis-style writing (score {})", synopsis),
            );
        } else if synopsis > config.synopsis_warning_threshold {
            tally.warning(
                QualityCheck::SynopsisStyle,
                config.synopsis_warning_penalty,
                format!("Some synopsis-style writing (score {})", synopsis),
            );
        }

        let words = count_words(text);
        let sensory = per_hundred_words(&self.sensory, text, words);
        if sensory <= config.sensory_threshold {
            tally.issue(
                QualityCheck::SensoryDetail,
                config.sensory_penalty,
                format!("Too little sensory detail ({:.2} per 100 words)", sensory),
            );
        }
        let interiority = per_hundred_words(&self.interiority, text, words);
        if interiority <= config.interiority_threshold {
            tally.warning(
                QualityCheck::Interiority,
                config.interiority_penalty,
                format!("Little interiority ({:.2} per 100 words)", interiority),
            );
        }
        let movement = per_hundred_words(&self.movement, text, words);
        if movement <= config.movement_threshold {
            tally.issue(
                QualityCheck::Movement,
                config.movement_penalty,
                format!("Too little physical movement ({:.2} per 100 words)", movement),
            );
        }

        let exposition: usize = self.exposition.iter().map(|p| p.count(text)).sum();
        if exposition > config.max_exposition_matches {
            tally.issue(
                QualityCheck::ExpositionDensity,
                config.exposition_penalty,
                format!("Heavy exposition ({} phrases)", exposition),
            );
        }

        let score = tally.score.clamp(0, 100) as u32;
        let is_valid = score >= config.pass_score;
        let should_regenerate = !is_valid || tally.issues.len() > config.max_issues;
        let regeneration_reason = should_regenerate.then(|| {
            if is_valid {
                format!("{} issues: {}", tally.issues.len(), tally.issues.join("; "))
            } else {
                format!(
                    "Score {} is below {}: {}",
                    score,
                    config.pass_score,
                    tally.issues.join("; ")
                )
            }
        });

        debug!(
            score,
            issues = tally.issues.len(),
            warnings = tally.warnings.len(),
            should_regenerate,
            "Prose validated"
        );

        ProseValidation {
            is_valid,
            score,
            issues: tally.issues,
            warnings: tally.warnings,
            should_regenerate,
            regeneration_reason,
            failed_checks: tally.failed_checks,
        }
    }
}

fn rejected(check: QualityCheck, message: String) -> ProseValidation {
    ProseValidation {
        is_valid: false,
        score: 0,
        issues: vec![message.clone()],
        warnings: Vec::new(),
        should_regenerate: true,
        regeneration_reason: Some(message),
        failed_checks: vec![check],
    }
}

fn per_hundred_words(table: &[WeightedPattern], text: &str, words: usize) -> f64 {
    if words == 0 {
        return 0.0;
    }
    let hits: u32 = table.iter().map(|p| p.weighted_count(text)).sum();
    f64::from(hits) * 100.0 / words as f64
}
