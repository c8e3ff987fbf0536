//! Page word-band violations.

/// A generated page fell outside the hard word band.
///
/// This is never retried: it signals a structural prompt problem.
///
/// # Examples
///
/// ```
/// use fablewright_error::WordCountError;
///
/// let err = WordCountError::new(1500, 600, 1200);
/// assert!(err.is_too_long());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "Word Count Violation: page has {} words, allowed range is {}-{} (line {} in {})",
    word_count,
    min,
    max,
    line,
    file
)]
pub struct WordCountError {
    /// Words counted in the generated page
    pub word_count: usize,
    /// Inclusive lower bound
    pub min: usize,
    /// Inclusive upper bound
    pub max: usize,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl WordCountError {
    /// Create a new violation record at the caller's location.
    #[track_caller]
    pub fn new(word_count: usize, min: usize, max: usize) -> Self {
        let location = std::panic::Location::caller();
        Self {
            word_count,
            min,
            max,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the page overshot the ceiling.
    pub fn is_too_long(&self) -> bool {
        self.word_count > self.max
    }
}
