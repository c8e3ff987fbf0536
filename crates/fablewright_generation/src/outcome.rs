//! Results handed back to callers.

use crate::state::TerminalState;
use fablewright_core::{StateDelta, StoryCanon};
use fablewright_error::CanonError;
use fablewright_prose::ProseValidation;
use serde::{Deserialize, Serialize};

/// The chapter chosen by the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResult {
    /// Formatted chapter prose
    pub content: String,
    /// Model-written summary
    pub summary: String,
    /// Story state changes reported by the model
    pub state_delta: StateDelta,
    /// Words in `content`
    pub word_count: usize,
    /// Validation of the chosen attempt
    pub prose_validation: ProseValidation,
}

/// What happened to a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttemptOutcome {
    /// Passed validation
    Accepted,
    /// Parsed but asked for regeneration
    Rejected,
    /// Could not be parsed
    Malformed,
    /// The completion service failed after its retry
    ProviderFailed,
}

/// Log entry for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt: u32,
    /// How it ended
    pub outcome: AttemptOutcome,
    /// Quality score, when the attempt parsed
    pub score: Option<u32>,
    /// Whether its JSON needed repair
    pub repaired: bool,
    /// Regeneration or parse failure reason
    pub reason: Option<String>,
}

impl AttemptRecord {
    pub(crate) fn scored(attempt: u32, validation: &ProseValidation, repaired: bool) -> Self {
        Self {
            attempt,
            outcome: if validation.should_regenerate {
                AttemptOutcome::Rejected
            } else {
                AttemptOutcome::Accepted
            },
            score: Some(validation.score),
            repaired,
            reason: validation.regeneration_reason.clone(),
        }
    }

    pub(crate) fn malformed(attempt: u32, reason: &str) -> Self {
        Self {
            attempt,
            outcome: AttemptOutcome::Malformed,
            score: None,
            repaired: false,
            reason: Some(reason.to_string()),
        }
    }

    pub(crate) fn provider_failed(attempt: u32, reason: &str) -> Self {
        Self {
            outcome: AttemptOutcome::ProviderFailed,
            ..Self::malformed(attempt, reason)
        }
    }
}

/// A finished chapter request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterOutcome {
    /// The chosen chapter
    pub result: ChapterResult,
    /// Whether it was accepted or kept as best-of-exhausted
    pub status: TerminalState,
    /// Every attempt, in order
    pub attempts: Vec<AttemptRecord>,
}

impl ChapterOutcome {
    /// Number of completion calls that produced an attempt.
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}

/// A generated page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Formatted page prose
    pub content: String,
    /// Outline beats the page covered
    pub beat_coverage: Vec<String>,
    /// Where the scene is heading at the page break
    pub narrative_momentum: String,
    /// Words in `content`
    pub word_count: usize,
}

/// A generated canon with its structural problems.
///
/// Problems are reported, not fatal: the author reviews the canon before
/// locking it.
#[derive(Debug, Clone)]
pub struct CanonOutcome {
    /// The parsed canon, never locked
    pub canon: StoryCanon,
    /// Structural problems found
    pub issues: Vec<CanonError>,
}

impl CanonOutcome {
    /// Whether the canon passed every structural check.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Problems rendered as messages.
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(|issue| issue.kind().to_string()).collect()
    }
}
