//! Error definitions for approval workflows.

use governance_primitives::WorkflowId;
use thiserror::Error;

use crate::workflow::WorkflowState;

/// Result alias for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;

/// Errors surfaced by the approval workflow manager and store.
///
/// State conflicts are ordinary result values here, never panics: an approval
/// UI retrying a resolved workflow is an expected flow.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// No workflow exists with the supplied identifier.
    #[error("workflow {0} not found")]
    NotFound(WorkflowId),

    /// Transition attempted on a workflow that already left the pending state.
    #[error("workflow {id} is {state} and cannot transition again")]
    InvalidState {
        /// Identifier of the workflow whose transition failed.
        id: WorkflowId,
        /// State the workflow was found in.
        state: WorkflowState,
    },

    /// The workflow deadline passed before the transition was attempted.
    #[error("workflow {0} has expired")]
    Expired(WorkflowId),

    /// Request failed validation before reaching the store.
    #[error("invalid approval request: {0}")]
    InvalidRequest(&'static str),

    /// Backing store failure.
    #[error("workflow store failure: {reason}")]
    Store {
        /// Human-readable context provided by the store.
        reason: String,
    },
}

impl ApprovalError {
    /// Convenience helper to construct store errors.
    #[must_use]
    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }
}
