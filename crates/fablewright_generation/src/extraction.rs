//! Pulling JSON out of model responses.
//!
//! Models wrap their JSON in markdown fences, prepend chatter, or emit raw
//! newlines inside string literals. Extraction finds the JSON value; repair
//! fixes the mechanical mistakes; anything still unparseable is fatal for the
//! attempt.

use fablewright_error::{FablewrightResult, MalformedOutputError};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// How a response turned into a value, if it did.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    /// Parsed as extracted
    Parsed(T),
    /// Parsed only after mechanical repair
    Repaired(T),
    /// Unparseable even after repair
    Fatal(String),
}

impl<T> ParseOutcome<T> {
    /// The parsed value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            ParseOutcome::Parsed(value) | ParseOutcome::Repaired(value) => Some(value),
            ParseOutcome::Fatal(_) => None,
        }
    }

    /// Whether repair was needed.
    pub fn was_repaired(&self) -> bool {
        matches!(self, ParseOutcome::Repaired(_))
    }
}

/// Extract a JSON value from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. A ```json fenced block (an unclosed fence runs to the end)
/// 2. Whichever of `{ ... }` or `[ ... ]` opens first, matched with a
///    string-aware balanced scan
///
/// # Errors
///
/// Returns [`MalformedOutputError`] when no JSON value is present.
///
/// # Examples
///
/// ```
/// use fablewright_generation::extract_json;
///
/// let response = "Here is the chapter:\n```json\n{\"content\": \"Rain.\"}\n```";
/// assert_eq!(extract_json(response).unwrap(), "{\"content\": \"Rain.\"}");
/// ```
pub fn extract_json(response: &str) -> FablewrightResult<String> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    let order = match (bracket_pos, brace_pos) {
        (Some(b_pos), Some(c_pos)) if b_pos < c_pos => [('[', ']'), ('{', '}')],
        (Some(_), None) => [('[', ']'), ('{', '}')],
        _ => [('{', '}'), ('[', ']')],
    };

    for (open, close) in order {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    error!(
        response_length = response.len(),
        "No JSON found in model response"
    );

    Err(MalformedOutputError::new(
        format!("no JSON value found in response of {} bytes", response.len()),
        response,
    )
    .into())
}

/// Content of the first fenced block for `language`, or of any fenced block.
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        if let Some(end) = response[content_start..].find("```") {
            return Some(response[content_start..content_start + end].trim().to_string());
        }
        // Unclosed fence: the response was probably truncated
        return Some(response[content_start..].trim().to_string());
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);

        if let Some(end) = response[skip_to..].find("```") {
            return Some(response[skip_to..skip_to + end].trim().to_string());
        }
        return Some(response[skip_to..].trim().to_string());
    }

    None
}

/// Text from the first `open` to its matching `close`.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + ch.len_utf8() + i].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Fix the mechanical JSON mistakes models make.
///
/// - Raw newlines, tabs and other control characters inside strings are escaped
/// - Trailing commas before `}` or `]` are dropped
///
/// Text outside strings is otherwise left alone.
///
/// # Examples
///
/// ```
/// use fablewright_generation::repair_json;
///
/// let broken = "{\"content\": \"Line one.\nLine two.\",}";
/// assert_eq!(repair_json(broken), "{\"content\": \"Line one.\\nLine two.\"}");
/// ```
pub fn repair_json(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut repaired = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &ch) in chars.iter().enumerate() {
        if in_string {
            if escape_next {
                escape_next = false;
                repaired.push(ch);
                continue;
            }
            match ch {
                '\\' => {
                    escape_next = true;
                    repaired.push(ch);
                }
                '"' => {
                    in_string = false;
                    repaired.push(ch);
                }
                '\n' => repaired.push_str("\\n"),
                '\r' => repaired.push_str("\\r"),
                '\t' => repaired.push_str("\\t"),
                c if (c as u32) < 0x20 => repaired.push_str(&format!("\\u{:04x}", c as u32)),
                c => repaired.push(c),
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                repaired.push(ch);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    repaired.push(ch);
                }
            }
            c => repaired.push(c),
        }
    }

    repaired
}

/// Extract, parse and if necessary repair a model response.
///
/// # Examples
///
/// ```
/// use fablewright_generation::{ParseOutcome, PageDraft, parse_with_repair};
///
/// let raw = "{\"content\": \"She ran.\nHe followed.\", \"beatCoverage\": []}";
/// match parse_with_repair::<PageDraft>(raw) {
///     ParseOutcome::Repaired(draft) => assert!(draft.content.contains('\n')),
///     other => panic!("unexpected outcome: {:?}", other),
/// }
/// ```
pub fn parse_with_repair<T>(response: &str) -> ParseOutcome<T>
where
    T: DeserializeOwned,
{
    let candidate = match extract_json(response) {
        Ok(candidate) => candidate,
        Err(e) => return ParseOutcome::Fatal(e.to_string()),
    };

    let first_error = match serde_json::from_str::<T>(&candidate) {
        Ok(value) => return ParseOutcome::Parsed(value),
        Err(e) => e,
    };

    let repaired = repair_json(&candidate);
    match serde_json::from_str::<T>(&repaired) {
        Ok(value) => {
            debug!(error = %first_error, "Response parsed after repair");
            ParseOutcome::Repaired(value)
        }
        Err(e) => {
            let preview: String = candidate.chars().take(100).collect();
            error!(
                error = %e,
                json_preview = %preview,
                "JSON parsing failed after repair"
            );
            ParseOutcome::Fatal(format!("invalid JSON: {} (after repair: {})", first_error, e))
        }
    }
}
