//! Fablewright - prose generation and validation for long-form fiction
//!
//! Fablewright turns a locked story canon, running story memory and the text
//! of recent pages into new chapters and pages, then formats and scores the
//! prose and regenerates weak drafts.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fablewright::{FablewrightConfig, GenerationOrchestrator, build_service, load_document};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FablewrightConfig::load()?;
//!     let service = build_service(&config.provider)?;
//!     let orchestrator = GenerationOrchestrator::new(service, &config)?;
//!
//!     let request = load_document("chapter.json")?;
//!     let outcome = orchestrator.generate_chapter(&request).await?;
//!     println!("{}", outcome.result.content);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `fablewright_error` - Error types
//! - `fablewright_core` - Canon, volume, chapter, page and memory records
//! - `fablewright_interface` - Completion service and store contracts
//! - `fablewright_prose` - Formatter, validator and roster parser
//! - `fablewright_context` - Layered prompt assembly
//! - `fablewright_generation` - Generate, validate and regenerate loop
//! - `fablewright_models` - Provider clients
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod documents;

pub use documents::{load_document, read_text};

pub use fablewright_context::*;
pub use fablewright_core::*;
pub use fablewright_error::*;
pub use fablewright_generation::*;
pub use fablewright_interface::*;
pub use fablewright_models::*;
pub use fablewright_prose::*;
