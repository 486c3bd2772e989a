//! Error definitions for policy evaluation.

use governance_primitives::PolicyTier;
use thiserror::Error;

/// Result alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors surfaced by the policy catalog and rule evaluator.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The catalog holds no requirement set for the requested tier.
    ///
    /// The built-in catalog covers every tier, so hitting this indicates a
    /// mis-populated registry; callers treat it as fatal misconfiguration.
    #[error("no policy registered for tier {0}")]
    UnknownTier(PolicyTier),

    /// Request failed validation before evaluation.
    #[error("invalid policy request: {0}")]
    InvalidRequest(&'static str),
}
