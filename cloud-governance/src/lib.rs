//! Governance decision layer facade.
//!
//! Depend on this crate via `cargo add cloud-governance`. It bundles the
//! governance crates behind feature flags so downstream consumers can enable
//! only the components they need.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use governance_primitives as primitives;

/// Policy catalog, validators, and rule evaluation (enabled by `policy`).
#[cfg(feature = "policy")]
pub use governance_policy as policy;

/// Approval workflow state machine (enabled by `approvals`).
#[cfg(feature = "approvals")]
pub use governance_approvals as approvals;

/// Decision engine and verdicts (enabled by `decision`).
#[cfg(feature = "decision")]
pub use governance_decision as decision;

/// Pre-flight/post-flight orchestration facade (enabled by `orchestrator`).
#[cfg(feature = "orchestrator")]
pub use governance_orchestrator as orchestrator;
