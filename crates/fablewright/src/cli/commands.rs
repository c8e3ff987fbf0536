//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fablewright - prose generation and validation for long-form fiction
#[derive(Parser, Debug)]
#[command(name = "fablewright")]
#[command(about = "Generate, format and validate novel prose with a language model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file, replacing the bundled and user defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reflow prose into one-idea paragraphs
    Format {
        /// Prose file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Report paragraph-discipline violations instead of reformatting
        #[arg(long)]
        report: bool,
    },

    /// Score prose against the quality rubric
    Check {
        /// Prose file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Format the prose before scoring, as the pipeline does
        #[arg(long)]
        formatted: bool,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Parse a free-text character roster
    Characters {
        /// Roster file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Print an assembled prompt without calling a model
    #[command(subcommand)]
    Prompt(PromptCommands),

    /// Generate a chapter from a request file
    Chapter {
        /// Chapter request, JSON or TOML
        request: PathBuf,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate a page from a request file
    Page {
        /// Page request, JSON or TOML
        request: PathBuf,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate a story canon from a request file
    Canon {
        /// Canon request, JSON or TOML
        request: PathBuf,
    },
}

/// Prompt preview subcommands
#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// Prompt for a chapter request
    Chapter {
        /// Chapter request, JSON or TOML
        request: PathBuf,
    },

    /// Prompt for a page request
    Page {
        /// Page request, JSON or TOML
        request: PathBuf,
    },

    /// Prompt for a canon request
    Canon {
        /// Canon request, JSON or TOML
        request: PathBuf,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["fablewright", "format"]).unwrap();
        match cli.command {
            Commands::Format { input, report } => {
                assert_eq!(input, PathBuf::from("-"));
                assert!(!report);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fablewright",
            "check",
            "scene.txt",
            "--format",
            "json",
            "-v",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Check {
                format: OutputFormat::Json,
                formatted: false,
                ..
            }
        ));
    }

    #[test]
    fn test_prompt_subcommand() {
        let cli = Cli::try_parse_from(["fablewright", "prompt", "page", "page.toml"]).unwrap();
        match cli.command {
            Commands::Prompt(PromptCommands::Page { request }) => {
                assert_eq!(request, PathBuf::from("page.toml"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_generation_requires_request_file() {
        assert!(Cli::try_parse_from(["fablewright", "chapter"]).is_err());
        assert!(Cli::try_parse_from(["fablewright", "canon"]).is_err());
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        assert!(
            Cli::try_parse_from(["fablewright", "page", "p.json", "--format", "yaml"]).is_err()
        );
    }
}
