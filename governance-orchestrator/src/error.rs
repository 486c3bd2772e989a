//! Error definitions for the orchestrator boundary.

use governance_policy::PolicyError;
use thiserror::Error;

/// Result alias for orchestrator operations.
pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Errors surfaced by the governance orchestrator.
///
/// Almost every failure degrades into a fail-closed decision instead of an
/// error; what remains here is misconfiguration the caller must fix.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// The policy catalog holds no entry for the requested tier.
    #[error("policy not found: {source}")]
    PolicyNotFound {
        /// Underlying catalog error.
        #[from]
        source: PolicyError,
    },

    /// The validation request failed structural validation.
    #[error("invalid validation request: {0}")]
    InvalidRequest(&'static str),
}
