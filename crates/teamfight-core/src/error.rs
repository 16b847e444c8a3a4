//! Common error types for teamfight.
//!
//! This module provides shared error types that are used across multiple crates.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur while interpreting request payloads.
#[derive(Debug, Error)]
pub enum CoreError {
    /// None of the recognized partition-key shapes matched the item.
    #[error("no valid partition key found")]
    NoKeyFound,

    /// The payload was not a JSON object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}
