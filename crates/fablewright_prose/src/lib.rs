//! Prose handling for the Fablewright generation pipeline.
//!
//! - [`parse_characters`] turns a free-text roster into canonical profiles
//! - [`ProseFormatter`] reflows raw model output into disciplined paragraphs
//! - [`ProseValidator`] scores prose against the house style and decides
//!   whether it should be regenerated
//!
//! All three are pure: no I/O, no shared state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod characters;
mod config;
mod format;
mod patterns;
mod sentences;
mod validator;

pub use characters::parse_characters;
pub use config::ValidatorConfig;
pub use format::{FormattingReport, FormattingViolation, ProseFormatter, validate_formatting};
pub use patterns::{PatternSpec, WeightedPattern};
pub use sentences::{count_sentences, split_paragraphs, split_sentences};
pub use validator::{
    DensityReport, OpeningCheck, ProseValidation, ProseValidator, QualityCheck, RhythmReport,
    analyze_paragraph_density, analyze_paragraph_rhythm, validate_opening,
};
