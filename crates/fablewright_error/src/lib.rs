//! Error types for the Fablewright prose generation pipeline.
//!
//! Every failure family follows the same shape:
//! - a `*ErrorKind` enum naming the specific condition
//! - a `*Error` struct wrapping the kind together with the source location
//!   where it was raised (captured through `#[track_caller]`)
//!
//! All families convert into [`FablewrightError`], so fallible operations
//! across the workspace return [`FablewrightResult`].
//!
//! # Examples
//!
//! ```
//! use fablewright_error::{FablewrightResult, ProviderError, ProviderErrorKind};
//!
//! fn call_model() -> FablewrightResult<String> {
//!     Err(ProviderError::new(ProviderErrorKind::EmptyResponse))?
//! }
//!
//! let err = call_model().unwrap_err();
//! assert!(err.to_string().contains("empty"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod canon;
mod config;
mod continuity;
mod error;
mod generation;
mod json;
mod malformed;
mod provider;
mod store;
mod word_count;

pub use canon::{CanonError, CanonErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use continuity::{ContinuityError, ContinuityErrorKind};
pub use error::{FablewrightError, FablewrightErrorKind, FablewrightResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use malformed::MalformedOutputError;
pub use provider::{ProviderError, ProviderErrorKind, RetryableError};
pub use store::{StoreError, StoreErrorKind};
pub use word_count::WordCountError;
