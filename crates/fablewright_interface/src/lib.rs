//! Boundary traits for the Fablewright prose generation pipeline.
//!
//! The generation core talks to three collaborators it does not own:
//! a text-completion service, a read-only canon store, and a write-only
//! persistence sink. Each is injected explicitly; nothing here holds
//! process-wide state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod completion;
mod settings;
mod store;

pub use completion::TextCompletionService;
pub use settings::ProviderSettings;
pub use store::{AcceptedChapter, AcceptedPage, CanonStore, PersistenceSink, QualitySummary};
