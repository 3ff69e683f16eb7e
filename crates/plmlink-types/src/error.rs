//! Error types for catalog decoding in plmlink-types.

use thiserror::Error;

/// Errors that can occur when decoding a PLM catalog document.
///
/// This error type is transport-agnostic; HTTP-level failures belong in
/// plmlink-core.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The catalog response was not the expected JSON array of nodes.
    #[error("Invalid catalog document: {0}")]
    InvalidDocument(String),
}

/// Result type alias using plmlink-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
