//! Shared error definitions for governance primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the governance core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating governance primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided workflow identifier could not be parsed.
    #[error("invalid workflow id: {source}")]
    InvalidWorkflowId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// The environment label was not recognised.
    #[error("unknown environment `{label}`")]
    UnknownEnvironment {
        /// The offending label string.
        label: String,
    },

    /// The policy tier label was not recognised.
    #[error("unknown policy tier `{label}`")]
    UnknownTier {
        /// The offending label string.
        label: String,
    },

    /// A violation definition failed validation.
    #[error("invalid violation: {reason}")]
    InvalidViolation {
        /// Human-readable reason for rejection.
        reason: String,
    },
}
