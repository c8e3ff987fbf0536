//! Generation loop failures.

/// Conditions that end a generation request without a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Every attempt failed to yield parseable content
    #[display("All {} generation attempts failed: {}", attempts, reason)]
    AttemptsExhausted {
        /// Attempts made
        attempts: u32,
        /// Failure of the final attempt
        reason: String,
    },
    /// A completion request could not be assembled
    #[display("Failed to build completion request: {}", _0)]
    RequestBuild(String),
}

/// Generation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
