//! Offline prose commands: format, check and character parsing.

use super::OutputFormat;
use fablewright::{
    FablewrightConfig, FablewrightResult, JsonError, ProseFormatter, ProseValidator,
    parse_characters, read_text, validate_formatting,
};
use std::path::Path;
use tracing::{info, instrument};

/// Reformat prose, or report its paragraph violations.
#[instrument(skip_all, fields(input = %input.display(), report = report))]
pub fn format_prose(input: &Path, report: bool) -> FablewrightResult<()> {
    let text = read_text(input)?;

    if report {
        let report = validate_formatting(&text);
        info!(
            violations = report.violations.len(),
            "Checked paragraph discipline"
        );
        println!("{}", to_json(&report)?);
    } else {
        println!("{}", ProseFormatter.format(&text));
    }

    Ok(())
}

/// Score prose with the configured rubric and report paragraph discipline.
#[instrument(skip_all, fields(input = %input.display(), formatted = formatted))]
pub fn check_prose(
    config: &FablewrightConfig,
    input: &Path,
    formatted: bool,
    format: OutputFormat,
) -> FablewrightResult<()> {
    let mut text = read_text(input)?;
    if formatted {
        text = ProseFormatter.format(&text);
    }

    let validator = ProseValidator::new(config.validator.clone())?;
    let validation = validator.validate(&text);
    let formatting = validate_formatting(&text);
    info!(score = validation.score, valid = validation.is_valid, "Scored prose");

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "formatting": formatting,
                "proseValidation": validation,
            });
            println!("{}", to_json(&report)?);
        }
        OutputFormat::Human => {
            for violation in &formatting.violations {
                println!("format: {:?}", violation);
            }
            let verdict = if validation.is_valid { "PASS" } else { "FAIL" };
            println!("{} {}/100", verdict, validation.score);
            for issue in &validation.issues {
                println!("  issue: {}", issue);
            }
            for warning in &validation.warnings {
                println!("  warning: {}", warning);
            }
            if let Some(reason) = &validation.regeneration_reason {
                println!("  regenerate: {}", reason);
            }
        }
    }

    Ok(())
}

/// Parse a roster and print the profiles as JSON.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn list_characters(input: &Path) -> FablewrightResult<()> {
    let text = read_text(input)?;
    let characters = parse_characters(&text);
    info!(count = characters.len(), "Parsed character roster");
    println!("{}", to_json(&characters)?);
    Ok(())
}

pub(super) fn to_json<T: serde::Serialize>(value: &T) -> FablewrightResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()).into())
}
