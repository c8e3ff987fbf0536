//! Test utilities for the generation loop.
//!
//! This module provides a scripted completion service and story fixtures.

pub mod fixtures;
pub mod mock_service;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_service::{MockBehavior, MockCompletionService, MockResponse};
