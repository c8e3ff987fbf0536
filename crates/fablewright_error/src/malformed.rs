//! Unparseable model output.

/// The completion text could not be turned into the expected JSON shape,
/// even after mechanical repair.
///
/// # Examples
///
/// ```
/// use fablewright_error::MalformedOutputError;
///
/// let err = MalformedOutputError::new("expected `content` field", "{\"summary\": \"...\"}");
/// assert!(err.to_string().contains("content"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Malformed Output: {} (excerpt: {:?}) at line {} in {}", message, excerpt, line, file)]
pub struct MalformedOutputError {
    /// What went wrong while parsing
    pub message: String,
    /// The first characters of the offending text
    pub excerpt: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl MalformedOutputError {
    /// Length of the excerpt kept from the offending text.
    pub const EXCERPT_CHARS: usize = 120;

    /// Create a new error, keeping a short excerpt of the raw text.
    #[track_caller]
    pub fn new(message: impl Into<String>, raw: &str) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            excerpt: raw.chars().take(Self::EXCERPT_CHARS).collect(),
            line: location.line(),
            file: location.file(),
        }
    }
}
