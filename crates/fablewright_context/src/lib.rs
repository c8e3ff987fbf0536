//! Layered prompt assembly for the Fablewright prose generation pipeline.
//!
//! A generation prompt is built from four layers over read-only story state:
//!
//! 1. **Global**: the story canon
//! 2. **Volume**: the volume's arc and its running memory
//! 3. **Act**: narrative purpose, pacing, pressure and act memory
//! 4. **Local**: the previous chapter, or the literal text of recent pages
//!
//! On top of the layers the assembler states the policies the model must
//! follow: canonical names, binding outlines, and when an ending is allowed.
//! Nothing here calls a completion service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod contracts;
mod layers;
mod policy;
mod request;

pub use assembler::{AssembledPrompt, AssemblerSettings, ContextAssembler};
pub use contracts::{canon_output_contract, chapter_output_contract, page_output_contract};
pub use layers::{act_layer, global_layer, local_chapter_layer, local_page_layer, volume_layer};
pub use policy::{StoryPosition, canonical_names_block, continuity_policy, outline_block};
pub use request::{CanonRequest, ChapterRequest, PageRequest};
