//! Generate, validate and regenerate loop for Fablewright.
//!
//! [`GenerationOrchestrator`] drives each request through an explicit state
//! machine:
//!
//! ```text
//! Drafting -> Validating -> Terminal(Accepted)
//!                        -> RegenerationRequested -> Drafting ...
//!                        -> Terminal(Exhausted)
//! ```
//!
//! Chapters get up to three sequential attempts and always return the best
//! parseable draft. Pages get one attempt and must land inside the word band.
//! The completion service is injected; nothing here holds global state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod drafts;
mod extraction;
mod loader;
mod memory_store;
mod orchestrator;
mod outcome;
mod service;
mod state;

pub use config::{FablewrightConfig, GenerationSettings};
pub use drafts::{ChapterDraft, PageDraft};
pub use extraction::{ParseOutcome, extract_json, parse_with_repair, repair_json};
pub use loader::{load_chapter_request, load_page_request};
pub use memory_store::InMemoryStore;
pub use orchestrator::GenerationOrchestrator;
pub use outcome::{
    AttemptOutcome, AttemptRecord, CanonOutcome, ChapterOutcome, ChapterResult, PageResult,
};
pub use service::complete_with_retry;
pub use state::{GenerationState, TerminalState};
