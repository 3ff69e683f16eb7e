//! Error types for plmlink-core.
//!
//! One poll either succeeds, hits its timeout, or fails with one of the
//! variants below. None of them is retried inside the connector; the
//! caller owns the retry cadence.
//!
//! | Error | Surface | Recovery |
//! |-------|---------|----------|
//! | [`Error::Auth`] | token endpoint | next poll re-authenticates |
//! | [`Error::Discovery`] | catalog search | fatal to construction |
//! | [`Error::Configuration`] | resolution / config | fix configuration and restart |
//! | [`Error::Fetch`] | data GET | next poll re-authenticates, window untouched |
//! | [`Error::InvalidDate`] | window bounds | fix configuration and restart |
//!
//! An exhausted time window is NOT an error: it is reported as
//! [`crate::PollOutcome::Exhausted`].

use thiserror::Error;

/// Errors that can occur while constructing or polling a connector.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The token endpoint did not return HTTP success, or the response body
    /// had no usable `token` field.
    #[error("Authentication failed: {message}")]
    Auth {
        /// Description of the failure.
        message: String,
    },

    /// The catalog search failed or its response could not be decoded.
    /// Discovery failures abort connector construction; no partial catalog
    /// is kept.
    #[error("Sensor discovery failed: {message}")]
    Discovery {
        /// Description of the failure.
        message: String,
    },

    /// The connector cannot produce data with the given configuration:
    /// the signal name is not in the catalog, the matched sensor has no
    /// usable property, or a config field failed validation.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The data GET failed for one poll. Window state is unaffected; the
    /// held token is dropped so the next poll authenticates afresh.
    #[error("Fetch from {url} failed: {message}")]
    Fetch {
        /// The fetch URL that failed.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// A window bound did not parse as `yyyy-MM-dd HH:mm:ss`.
    #[error("Invalid date '{input}': expected yyyy-MM-dd HH:mm:ss")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },
}

impl Error {
    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a fetch error for a specific URL.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }
}

/// Result type alias using plmlink-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
