//! States of the generate, validate and regenerate loop.

use crate::drafts::ChapterDraft;
use serde::{Deserialize, Serialize};

/// How a generation request ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TerminalState {
    /// An attempt passed validation
    Accepted,
    /// Attempts ran out; the best draft was kept
    Exhausted,
}

/// One step of the chapter loop.
///
/// Transitions:
///
/// - `Drafting` calls the model. A parseable draft moves to `Validating`;
///   unparseable output moves to `RegenerationRequested` with a format
///   correction, or to `Terminal(Exhausted)` on the final attempt. A
///   provider failure ends in `Terminal(Exhausted)` once a draft has been
///   scored, and is an error otherwise.
/// - `Validating` formats and scores the draft. Passing drafts end in
///   `Terminal(Accepted)`; others request regeneration while attempts remain.
/// - `RegenerationRequested` moves to the next `Drafting` attempt carrying
///   the corrective text.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    /// Waiting on the completion service
    Drafting {
        /// 1-based attempt number
        attempt: u32,
        /// Correction appended to the prompt for this attempt
        corrective: Option<String>,
    },
    /// A parsed draft waiting to be formatted and scored
    Validating {
        /// Attempt that produced the draft
        attempt: u32,
        /// The parsed draft
        draft: ChapterDraft,
        /// Whether the JSON needed repair
        repaired: bool,
    },
    /// The last attempt failed; another is allowed
    RegenerationRequested {
        /// Attempt that failed
        attempt: u32,
        /// Correction for the next attempt
        corrective: String,
    },
    /// The loop has finished
    Terminal(TerminalState),
}

impl GenerationState {
    /// Initial state of every request.
    pub fn start() -> Self {
        GenerationState::Drafting {
            attempt: 1,
            corrective: None,
        }
    }

    /// Whether the loop has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Terminal(_))
    }
}
