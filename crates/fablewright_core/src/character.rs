//! Canonical character records.

use serde::{Deserialize, Serialize};

/// A character as the canon names them.
///
/// The first mention in prose uses `full_name`; later mentions use
/// `short_name`.
///
/// # Examples
///
/// ```
/// use fablewright_core::CharacterProfile;
///
/// let kate = CharacterProfile::new("Kate Andrea Clauzure", None, Some("protagonist"));
/// assert_eq!(kate.short_name, "Kate");
/// assert!(kate.answers_to("kate andrea clauzure"));
/// ```
///
/// A missing or blank `shortName` in JSON falls back the same way:
///
/// ```
/// use fablewright_core::CharacterProfile;
///
/// let tomas: CharacterProfile = serde_json::from_str(r#"{"fullName": "Tomas Reyes"}"#).unwrap();
/// assert_eq!(tomas.short_name, "Tomas");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProfileRecord")]
pub struct CharacterProfile {
    /// Full canonical name, at least two words
    pub full_name: String,
    /// Nickname or first name used after the first mention
    pub short_name: String,
    /// Free-text role or description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Wire shape of a profile, before the short name is filled in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRecord {
    full_name: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<ProfileRecord> for CharacterProfile {
    fn from(record: ProfileRecord) -> Self {
        Self::new(
            record.full_name,
            record.short_name.as_deref(),
            record.description.as_deref(),
        )
    }
}

impl CharacterProfile {
    /// Build a profile, defaulting the short name to the first name token.
    pub fn new(full_name: impl Into<String>, nickname: Option<&str>, description: Option<&str>) -> Self {
        let full_name = full_name.into();
        let short_name = nickname
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                full_name
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Self {
            full_name,
            short_name,
            description,
        }
    }

    /// Whether `name` matches the full or short name, ignoring case.
    pub fn answers_to(&self, name: &str) -> bool {
        let name = name.trim();
        self.full_name.eq_ignore_ascii_case(name) || self.short_name.eq_ignore_ascii_case(name)
    }
}
