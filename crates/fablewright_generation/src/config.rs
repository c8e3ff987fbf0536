//! Layered configuration for the generation pipeline.
//!
//! Sources, lowest precedence first:
//! 1. Defaults bundled from `fablewright.toml` at the workspace root
//! 2. `~/.config/fablewright/fablewright.toml`
//! 3. `./fablewright.toml`
//!
//! Missing user files are skipped; every field also has a serde default, so
//! a partial table is enough.

use config::{Config, File, FileFormat};
use fablewright_context::AssemblerSettings;
use fablewright_error::{ConfigError, ConfigErrorKind, FablewrightError, FablewrightResult};
use fablewright_interface::ProviderSettings;
use fablewright_prose::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Limits and sampling settings for the generation loop.
///
/// # Example
///
/// ```toml
/// [generation]
/// max_attempts = 3
/// request_timeout_secs = 60
/// page_min_words = 600
/// page_max_words = 1200
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chapter attempts before settling for the best draft
    pub max_attempts: u32,
    /// Per-call timeout for the completion service
    pub request_timeout_secs: u64,
    /// Extra tries after a transient provider failure
    pub provider_retries: usize,
    /// Pause before a provider retry
    pub retry_backoff_ms: u64,
    /// Output ceiling for chapter calls
    pub chapter_max_tokens: u32,
    /// Output ceiling for page calls
    pub page_max_tokens: u32,
    /// Output ceiling for canon calls
    pub canon_max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Smallest allowed page
    pub page_min_words: usize,
    /// Largest allowed page
    pub page_max_words: usize,
    /// Prior pages carried verbatim into a page prompt
    pub continuity_pages: usize,
    /// Chapter length when a chapter sets no target
    pub default_chapter_words: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_timeout_secs: 60,
            provider_retries: 1,
            retry_backoff_ms: 500,
            chapter_max_tokens: 8192,
            page_max_tokens: 3000,
            canon_max_tokens: 6000,
            temperature: 0.8,
            page_min_words: 600,
            page_max_words: 1200,
            continuity_pages: 17,
            default_chapter_words: 3000,
        }
    }
}

impl GenerationSettings {
    /// Per-call timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pause between provider retries as a duration.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Complete Fablewright configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FablewrightConfig {
    /// Generation loop settings
    pub generation: GenerationSettings,
    /// Prose quality rubric
    pub validator: ValidatorConfig,
    /// Completion provider selection
    pub provider: ProviderSettings,
}

fn read_error(e: config::ConfigError) -> FablewrightError {
    ConfigError::new(ConfigErrorKind::Read(e.to_string())).into()
}

fn parse_error(e: config::ConfigError) -> FablewrightError {
    ConfigError::new(ConfigErrorKind::Parse(e.to_string())).into()
}

fn invalid(key: &str, reason: impl Into<String>) -> FablewrightError {
    ConfigError::new(ConfigErrorKind::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    })
    .into()
}

impl FablewrightConfig {
    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds
    /// inconsistent values.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> FablewrightResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(read_error)?
            .try_deserialize()
            .map_err(parse_error)?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is malformed or holds inconsistent
    /// values.
    #[instrument]
    pub fn load() -> FablewrightResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../fablewright.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fablewright/fablewright.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("fablewright").required(false));

        let config: Self = builder
            .build()
            .map_err(read_error)?
            .try_deserialize()
            .map_err(parse_error)?;

        config.validate()?;
        debug!(
            provider = %config.provider.name,
            model = %config.provider.model,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> FablewrightResult<()> {
        let generation = &self.generation;
        if generation.max_attempts == 0 {
            return Err(invalid("generation.max_attempts", "must be at least 1"));
        }
        if generation.request_timeout_secs == 0 {
            return Err(invalid("generation.request_timeout_secs", "must be at least 1"));
        }
        if generation.page_min_words > generation.page_max_words {
            return Err(invalid(
                "generation.page_min_words",
                format!(
                    "{} exceeds page_max_words {}",
                    generation.page_min_words, generation.page_max_words
                ),
            ));
        }
        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(invalid("generation.temperature", "must be between 0.0 and 2.0"));
        }
        Ok(())
    }

    /// Settings for the prompt assembler.
    pub fn assembler_settings(&self) -> AssemblerSettings {
        AssemblerSettings {
            continuity_pages: self.generation.continuity_pages,
            page_min_words: self.generation.page_min_words,
            page_max_words: self.generation.page_max_words,
            default_chapter_words: self.generation.default_chapter_words,
        }
    }
}
