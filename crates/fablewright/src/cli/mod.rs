//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fablewright binary.

mod commands;
mod generate;
mod prose;

pub use commands::{Cli, Commands, OutputFormat, PromptCommands};
pub use generate::{generate_canon, generate_chapter, generate_page, print_prompt};
pub use prose::{check_prose, format_prose, list_characters};
