//! Fablewright CLI binary.
//!
//! This binary provides command-line access to Fablewright's functionality:
//! - Format and score prose offline
//! - Preview assembled prompts
//! - Generate canons, chapters and pages with a configured provider

use clap::Parser;
use fablewright::FablewrightConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, check_prose, format_prose, generate_canon, generate_chapter, generate_page,
        list_characters, print_prompt,
    };

    // API keys may live in a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    fablewright::init_tracing(cli.verbose).map_err(|e| e as Box<dyn std::error::Error>)?;

    let config = match &cli.config {
        Some(path) => FablewrightConfig::from_file(path)?,
        None => FablewrightConfig::load()?,
    };

    match cli.command {
        Commands::Format { input, report } => {
            format_prose(&input, report)?;
        }

        Commands::Check {
            input,
            formatted,
            format,
        } => {
            check_prose(&config, &input, formatted, format)?;
        }

        Commands::Characters { input } => {
            list_characters(&input)?;
        }

        Commands::Prompt(prompt_cmd) => {
            print_prompt(&config, prompt_cmd)?;
        }

        Commands::Chapter { request, format } => {
            generate_chapter(&config, &request, format).await?;
        }

        Commands::Page { request, format } => {
            generate_page(&config, &request, format).await?;
        }

        Commands::Canon { request } => {
            generate_canon(&config, &request).await?;
        }
    }

    Ok(())
}
