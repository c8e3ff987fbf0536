//! Free-text character roster parsing.

use fablewright_core::CharacterProfile;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+").expect("Valid bullet regex"));

static WITH_NICKNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^():–—\n]+?)\s*\((?P<nick>[^)]*)\)\s*(?:(?:[–—:]|-)\s*(?P<desc>.*))?$")
        .expect("Valid nickname regex")
});

static DASHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^():–—\n]+?)\s*(?:[–—]|\s-\s)\s*(?P<desc>.+)$")
        .expect("Valid dashed regex")
});

static COLON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^():\n]+?)\s*:\s*(?P<desc>.+)$").expect("Valid colon regex")
});

const MAX_FALLBACK_WORDS: usize = 4;

/// Parse a roster with one character per line.
///
/// Accepted line shapes:
/// - `Name – description`
/// - `Name (nickname) – description`
/// - `Name: description`
/// - a bare capitalised name
///
/// A candidate is kept only when its name has at least two words; duplicates
/// (by full name, ignoring case) are dropped.
///
/// # Examples
///
/// ```
/// use fablewright_prose::parse_characters;
///
/// let roster = parse_characters("Kate Andrea Clauzure – protagonist\nKate");
/// assert_eq!(roster.len(), 1);
/// assert_eq!(roster[0].full_name, "Kate Andrea Clauzure");
/// assert_eq!(roster[0].short_name, "Kate");
/// assert_eq!(roster[0].description.as_deref(), Some("protagonist"));
/// ```
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_characters(text: &str) -> Vec<CharacterProfile> {
    let mut profiles: Vec<CharacterProfile> = Vec::new();

    for raw_line in text.lines() {
        let line = BULLET.replace(raw_line, "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(profile) = parse_line(line) else {
            debug!(line, "Skipping roster line");
            continue;
        };
        if profiles
            .iter()
            .any(|p| p.full_name.eq_ignore_ascii_case(&profile.full_name))
        {
            continue;
        }
        profiles.push(profile);
    }

    debug!(count = profiles.len(), "Parsed character roster");
    profiles
}

fn parse_line(line: &str) -> Option<CharacterProfile> {
    if let Some(caps) = WITH_NICKNAME.captures(line) {
        let name = clean_name(&caps["name"]);
        let nick = clean_name(&caps["nick"]);
        let desc = caps.name("desc").map(|m| m.as_str());
        return full_name(&name)
            .map(|name| CharacterProfile::new(name, Some(nick.as_str()), desc));
    }
    for pattern in [&*DASHED, &*COLON] {
        if let Some(caps) = pattern.captures(line) {
            let name = clean_name(&caps["name"]);
            let desc = caps.name("desc").map(|m| m.as_str());
            return full_name(&name).map(|name| CharacterProfile::new(name, None, desc));
        }
    }
    fallback_name(line).map(|name| CharacterProfile::new(name, None, None))
}

fn clean_name(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '*' | '_')).collect();
    stripped
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn full_name(name: &str) -> Option<String> {
    (name.split_whitespace().count() >= 2).then(|| name.to_string())
}

/// Leading capitalised words, up to four, when at least two are present.
fn fallback_name(line: &str) -> Option<String> {
    let cleaned = clean_name(line);
    if !cleaned.chars().next().is_some_and(char::is_uppercase) {
        return None;
    }
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .take_while(|w| w.chars().next().is_some_and(char::is_uppercase))
        .take(MAX_FALLBACK_WORDS)
        .map(|w| w.trim_end_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    if words.len() < 2 {
        return None;
    }
    Some(words.join(" "))
}
