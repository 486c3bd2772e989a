//! Core shared types for the cloud governance engine.

#![warn(missing_docs, clippy::pedantic)]

mod environment;
mod error;
mod ids;
mod severity;
mod tier;
mod violation;

/// Deployment environment classification.
pub use environment::Environment;
/// Error type and result alias shared across the governance crates.
pub use error::{Error, Result};
/// Unique identifier for approval workflow records.
pub use ids::WorkflowId;
/// Severity ladder attached to policy violations.
pub use severity::Severity;
/// Ordinal security tier for regulated environments.
pub use tier::PolicyTier;
/// A single unmet policy requirement with remediation text.
pub use violation::Violation;
