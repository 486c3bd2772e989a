//! Decision engine: turns heterogeneous violations into one governance
//! verdict and opens approval workflows where human sign-off is required.

#![warn(missing_docs, clippy::pedantic)]

mod approvers;
mod decision;
mod engine;

/// Pure approver routing tables.
pub use approvers::{approvers_for_environment, approvers_for_severity, required_approvers};
/// Structured decision and verdict types.
pub use decision::{Decision, Verdict};
/// The decision engine and its evaluation context.
pub use engine::{DecisionContext, DecisionEngine};
