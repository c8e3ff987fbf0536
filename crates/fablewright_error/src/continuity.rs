//! Page ordering and locking violations.

/// Ways a page operation can break chapter continuity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ContinuityErrorKind {
    /// A later page exists, so this one is locked
    #[display("Page {} is locked because page {} exists", page_number, later_page)]
    PageLocked {
        /// Page that was targeted
        page_number: u32,
        /// Last page currently in the chapter
        later_page: u32,
    },
    /// No page with this number
    #[display("Page {} does not exist", _0)]
    PageNotFound(u32),
    /// A page was appended out of sequence
    #[display("Expected page {}, got page {}", expected, actual)]
    PageOutOfOrder {
        /// Next page number the chapter accepts
        expected: u32,
        /// Page number that was supplied
        actual: u32,
    },
}

/// Continuity error with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Continuity Error: {} at line {} in {}", kind, line, file)]
pub struct ContinuityError {
    /// The specific error condition
    pub kind: ContinuityErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ContinuityError {
    /// Create a new ContinuityError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContinuityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ContinuityErrorKind {
        &self.kind
    }
}
