//! Completion service failures and their retry classification.

/// Conditions under which the text-completion service failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Network failure before a response arrived
    #[display("Completion service unreachable: {}", _0)]
    Unreachable(String),
    /// No response within the request deadline
    #[display("Completion service timed out after {} seconds", _0)]
    Timeout(u64),
    /// Response arrived but carried no text
    #[display("Completion service returned an empty response")]
    EmptyResponse,
    /// Service answered with a non-success status
    #[display("Completion service returned HTTP {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
    /// Credential environment variable missing
    #[display("API key environment variable {} is not set", _0)]
    MissingApiKey(String),
    /// Response body did not match the provider's schema
    #[display("Invalid provider response: {}", _0)]
    InvalidResponse(String),
}

impl ProviderErrorKind {
    /// Whether a single retry may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderErrorKind::Unreachable(_)
            | ProviderErrorKind::Timeout(_)
            | ProviderErrorKind::EmptyResponse => true,
            ProviderErrorKind::Api { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504 | 529)
            }
            ProviderErrorKind::MissingApiKey(_) | ProviderErrorKind::InvalidResponse(_) => false,
        }
    }
}

/// Completion service error with source location tracking.
///
/// # Examples
///
/// ```
/// use fablewright_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Timeout(60));
/// assert!(err.is_retryable());
///
/// let err = ProviderError::new(ProviderErrorKind::MissingApiKey("ANTHROPIC_API_KEY".into()));
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Errors that know whether retrying the failed call is worthwhile.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
