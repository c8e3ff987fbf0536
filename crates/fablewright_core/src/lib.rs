//! Story data model for the Fablewright prose generation pipeline.
//!
//! Canon, volumes, chapters and pages form a strict containment tree owned by
//! the book. Memory records are derived caches that feed later prompts; the
//! generated chapters and pages remain the source of truth.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod act;
mod canon;
mod chapter;
mod character;
mod memory;
mod page;
mod request;
mod telemetry;
mod text;
mod volume;

pub use act::{ActContext, NarrativePurpose, Pacing};
pub use canon::{CanonMetadata, Faction, StoryCanon, TimelineEvent};
pub use chapter::{Chapter, ChapterStats, StateDelta};
pub use character::CharacterProfile;
pub use memory::{ActMemory, VolumeMemory};
pub use page::{ChapterPages, Page};
pub use request::{CompletionRequest, CompletionRequestBuilder};
pub use telemetry::init_tracing;
pub use text::count_words;
pub use volume::Volume;
