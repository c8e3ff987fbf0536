//! Act-level narrative metadata.
//!
//! Acts are labels on chapters, not containers; this metadata travels with
//! each generation request.

use serde::{Deserialize, Serialize};

/// What the current stretch of story is for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NarrativePurpose {
    /// Establish people, place and want
    #[default]
    Setup,
    /// Complications accumulate
    RisingTension,
    /// Something breaks between characters or plans
    Fracture,
    /// The decisive pressure point
    Crisis,
    /// Consequences settle
    Resolution,
    /// Earlier promises pay off
    Payoff,
}

impl NarrativePurpose {
    /// Writing guidance for this purpose.
    pub fn guidance(&self) -> &'static str {
        match self {
            NarrativePurpose::Setup => {
                "Ground the reader in character, place and desire; plant questions rather than answer them."
            }
            NarrativePurpose::RisingTension => {
                "Escalate complications; every scene should leave the characters worse off or more exposed."
            }
            NarrativePurpose::Fracture => {
                "Break something: trust, a plan, a relationship. Let the damage be visible and specific."
            }
            NarrativePurpose::Crisis => {
                "Put the characters at the point of decision under maximum pressure; no easy exits."
            }
            NarrativePurpose::Resolution => {
                "Let consequences land and emotions settle, without closing threads the outline keeps open."
            }
            NarrativePurpose::Payoff => {
                "Deliver on earlier setups and promises in concrete, dramatized moments."
            }
        }
    }
}

/// Speed of the storytelling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Pacing {
    /// Linger in moments, dense detail
    Slow,
    /// Balanced scene and summary
    #[default]
    Medium,
    /// Short scenes, quick cuts
    Fast,
}

/// Act-level context for a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActContext {
    /// Narrative purpose of the act
    #[serde(default)]
    pub purpose: NarrativePurpose,
    /// Pacing of the act
    #[serde(default)]
    pub pacing: Pacing,
    /// Emotional pressure, 1 to 10
    #[serde(default = "default_pressure")]
    pub emotional_pressure: u8,
    /// Free-text act tag carried by the chapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_tag: Option<String>,
}

fn default_pressure() -> u8 {
    5
}

impl Default for ActContext {
    fn default() -> Self {
        Self {
            purpose: NarrativePurpose::default(),
            pacing: Pacing::default(),
            emotional_pressure: default_pressure(),
            act_tag: None,
        }
    }
}

impl ActContext {
    /// Create an act context, clamping pressure into 1..=10.
    ///
    /// # Examples
    ///
    /// ```
    /// use fablewright_core::{ActContext, NarrativePurpose, Pacing};
    ///
    /// let act = ActContext::new(NarrativePurpose::Crisis, Pacing::Fast, 14);
    /// assert_eq!(act.emotional_pressure, 10);
    /// assert_eq!(act.purpose.to_string(), "crisis");
    /// ```
    pub fn new(purpose: NarrativePurpose, pacing: Pacing, emotional_pressure: u8) -> Self {
        Self {
            purpose,
            pacing,
            emotional_pressure: emotional_pressure.clamp(1, 10),
            act_tag: None,
        }
    }

    /// Attach the chapter's act tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.act_tag = Some(tag.into());
        self
    }

    /// Pressure clamped into the valid range.
    pub fn pressure(&self) -> u8 {
        self.emotional_pressure.clamp(1, 10)
    }
}
