//! Top-level error wrapper types.

use crate::{
    CanonError, ConfigError, ContinuityError, GenerationError, JsonError, MalformedOutputError,
    ProviderError, StoreError, WordCountError,
};

/// Every error family the pipeline can surface.
///
/// # Examples
///
/// ```
/// use fablewright_error::{FablewrightError, WordCountError};
///
/// let err: FablewrightError = WordCountError::new(412, 600, 1200).into();
/// assert!(format!("{}", err).contains("412"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FablewrightErrorKind {
    /// Completion service unreachable, timed out, or returned nothing
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Response could not be parsed into the expected JSON shape
    #[from(MalformedOutputError)]
    MalformedOutput(MalformedOutputError),
    /// Generated page fell outside the allowed word band
    #[from(WordCountError)]
    WordCount(WordCountError),
    /// Story canon failed a structural check
    #[from(CanonError)]
    Canon(CanonError),
    /// Page ordering or locking rule violated
    #[from(ContinuityError)]
    Continuity(ContinuityError),
    /// Canon store lookup failed
    #[from(StoreError)]
    Store(StoreError),
    /// Generation loop could not produce a result
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Configuration could not be loaded
    #[from(ConfigError)]
    Config(ConfigError),
    /// Serialization of a result failed
    #[from(JsonError)]
    Json(JsonError),
}

/// Fablewright error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fablewright_error::{FablewrightErrorKind, FablewrightResult, StoreError, StoreErrorKind};
///
/// fn lookup() -> FablewrightResult<()> {
///     Err(StoreError::new(StoreErrorKind::NotFound("volume 2".to_string())))?
/// }
///
/// let err = lookup().unwrap_err();
/// assert!(matches!(err.kind(), FablewrightErrorKind::Store(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fablewright Error: {}", _0)]
pub struct FablewrightError(Box<FablewrightErrorKind>);

impl FablewrightError {
    /// Create a new error from a kind.
    pub fn new(kind: FablewrightErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FablewrightErrorKind {
        &self.0
    }

    /// Whether the underlying failure is a transient provider problem.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self.kind(), FablewrightErrorKind::Provider(_))
    }
}

impl<T> From<T> for FablewrightError
where
    T: Into<FablewrightErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fablewright operations.
pub type FablewrightResult<T> = std::result::Result<T, FablewrightError>;
