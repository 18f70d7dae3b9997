//! Common error types for Swatch

use thiserror::Error;
use uuid::Uuid;

/// Common result type for Swatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Swatch crates
///
/// Every failure is a typed outcome. An empty search result is a success,
/// never one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable weighting rows or spectral curve
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Invalid input (non-finite Lab component, mixed weighting tables, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The reference color has no resolvable Lab value from any source
    #[error("Reference color {0} has no usable color data")]
    ReferenceUnavailable(Uuid),

    /// Standards (weighting tables) are required but not loaded yet
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Two selected tags are in an ancestor/descendant relationship
    #[error("Tag conflict: {first} and {second} are in an ancestor/descendant relationship")]
    ConflictDetected { first: Uuid, second: Uuid },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
