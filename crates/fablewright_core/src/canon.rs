//! The story canon (story bible).

use crate::CharacterProfile;
use fablewright_error::{CanonError, CanonErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Genre, tone and shape of the book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonMetadata {
    /// Genre label, e.g. "romantic fantasy"
    pub genre: String,
    /// Overall tone
    pub tone: String,
    /// Point of view, e.g. "third person limited"
    pub pov: String,
    /// Target length description, e.g. "3 volumes"
    pub target_length: String,
}

/// A faction or organised group in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faction {
    /// Faction name
    pub name: String,
    /// Goals, methods, allegiances
    #[serde(default)]
    pub description: String,
}

/// An entry on the canonical timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// When the event happens, in-world
    pub when: String,
    /// What happens
    pub event: String,
}

/// The authoritative world, character and rule specification for a book.
///
/// Once `locked` is set, generation treats it as authoritative and must never
/// contradict it. The canon is read-only input to every generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryCanon {
    /// Premise and overall vision
    pub whitepaper: String,
    /// Canonical character roster
    pub characters: Vec<CharacterProfile>,
    /// Settings and world description
    pub settings: String,
    /// Rules of how the world works
    pub world_rules: Vec<String>,
    /// Technology or magic systems and their limits
    pub tech_magic_rules: Vec<String>,
    /// Constraints that must never be violated
    pub hard_constraints: Vec<String>,
    /// Guidelines followed on a best-effort basis
    pub soft_guidelines: Vec<String>,
    /// Thematic through-lines
    pub themes: Vec<String>,
    /// Factions and groups
    pub factions: Vec<Faction>,
    /// Canonical timeline
    pub timeline: Vec<TimelineEvent>,
    /// Genre, tone, POV, target length
    pub metadata: CanonMetadata,
    /// Whether the canon is final
    pub locked: bool,
}

impl StoryCanon {
    /// Look up a character by full or short name.
    pub fn character(&self, name: &str) -> Option<&CharacterProfile> {
        self.characters.iter().find(|c| c.answers_to(name))
    }

    /// Run the structural checks on a canon.
    ///
    /// Problems are returned rather than raised: an imperfect canon the user
    /// can edit is preferable to blocking generation.
    ///
    /// # Examples
    ///
    /// ```
    /// use fablewright_core::StoryCanon;
    /// use fablewright_error::CanonErrorKind;
    ///
    /// let canon = StoryCanon::default();
    /// let issues = canon.validate(&["Kate Clauzure"]);
    /// assert!(issues.iter().any(|e| e.kind == CanonErrorKind::NoThemes));
    /// ```
    #[instrument(skip(self), fields(characters = self.characters.len(), themes = self.themes.len()))]
    pub fn validate(&self, required_characters: &[&str]) -> Vec<CanonError> {
        let mut issues = Vec::new();

        if self.whitepaper.trim().is_empty() {
            issues.push(CanonError::new(CanonErrorKind::EmptyWhitepaper));
        }
        if self.characters.is_empty() {
            issues.push(CanonError::new(CanonErrorKind::NoCharacters));
        }
        if self.themes.iter().all(|t| t.trim().is_empty()) {
            issues.push(CanonError::new(CanonErrorKind::NoThemes));
        }
        for required in required_characters {
            if self.character(required).is_none() {
                issues.push(CanonError::new(CanonErrorKind::MissingCharacter(
                    required.to_string(),
                )));
            }
        }

        debug!(issue_count = issues.len(), "Canon validated");
        issues
    }
}
