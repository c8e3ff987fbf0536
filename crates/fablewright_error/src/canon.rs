//! Story canon structural problems.

/// Structural checks a story canon can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CanonErrorKind {
    /// A character the user asked for is absent from the roster
    #[display("Required character '{}' is missing from the roster", _0)]
    MissingCharacter(String),
    /// The canon lists no themes
    #[display("Canon defines no themes")]
    NoThemes,
    /// The roster is empty
    #[display("Canon defines no characters")]
    NoCharacters,
    /// The whitepaper text is blank
    #[display("Canon whitepaper is empty")]
    EmptyWhitepaper,
    /// Generation was requested against a canon that is not locked
    #[display("Canon is not locked")]
    Unlocked,
}

/// Canon validation error with location tracking.
///
/// Canon problems are reported and logged, but generation proceeds with the
/// imperfect canon.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Canon Error: {} at line {} in {}", kind, line, file)]
pub struct CanonError {
    /// The specific error condition
    pub kind: CanonErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CanonError {
    /// Create a new CanonError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CanonErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CanonErrorKind {
        &self.kind
    }
}
