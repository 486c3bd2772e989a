//! Approval workflow records, state machine, and manager.
//!
//! The workflow table is the only shared mutable state in the governance
//! core; all mutation flows through [`WorkflowStore::compare_and_transition`]
//! so that two concurrent resolutions of the same record cannot both succeed.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod manager;
mod store;
mod workflow;

/// Error type and result alias for approval operations.
pub use error::{ApprovalError, ApprovalResult};
/// Manager API: create, approve, reject, list, get.
pub use manager::{ApprovalConfig, ApprovalManager, ListFilter};
/// Injected persistence abstraction and the in-memory implementation.
pub use store::{InMemoryStore, WorkflowStore};
/// Workflow records and states.
pub use workflow::{ApprovalWorkflow, Resolution, WorkflowState};
