//! Reading request documents and prose from disk.

use fablewright_error::{ConfigError, ConfigErrorKind, FablewrightResult, JsonError};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, instrument};

/// Read text from a file, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns a read error if the file or stdin cannot be read.
pub fn read_text(path: impl AsRef<Path>) -> FablewrightResult<String> {
    let path = path.as_ref();
    let result = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    };
    result.map_err(|e| {
        ConfigError::new(ConfigErrorKind::Read(format!("{}: {}", path.display(), e))).into()
    })
}

/// Load a JSON or TOML document, chosen by file extension.
///
/// Files ending in `.toml` are parsed as TOML; everything else as JSON.
/// Request documents use camelCase keys in both formats.
///
/// # Errors
///
/// Returns a read error for unreadable files and a parse error naming the
/// file for malformed ones.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_document<T>(path: impl AsRef<Path>) -> FablewrightResult<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();
    let text = read_text(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    debug!(is_toml, bytes = text.len(), "Parsing document");

    if is_toml {
        toml::from_str(&text).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Parse(format!("{}: {}", path.display(), e))).into()
        })
    } else {
        serde_json::from_str(&text)
            .map_err(|e| JsonError::new(format!("{}: {}", path.display(), e)).into())
    }
}
