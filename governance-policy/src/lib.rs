//! Tiered policy catalog and stateless validators for governance evaluation.
//!
//! Everything in this crate is pure and `Send + Sync`; validators can be
//! shared freely across concurrent callers.

#![warn(missing_docs, clippy::pedantic)]

mod catalog;
mod error;
mod naming;
mod region;
mod rules;
mod tags;

/// Tier-to-requirement registry and requirement types.
pub use catalog::{IdentityRequirements, MinTlsVersion, PolicyCatalog, TierPolicy};
/// Error type and result alias for policy operations.
pub use error::{PolicyError, PolicyResult};
/// Resource-name validation.
pub use naming::{NamingReport, NamingValidator};
/// Region normalization and approval checks.
pub use region::{RegionReport, RegionValidator, CANONICAL_REGIONS};
/// Catalog-driven rule evaluation over request content.
pub use rules::{ContentInspector, KeywordInspector, RuleEvaluator};
/// Mandatory tag checks.
pub use tags::{TagReport, TagValidator, REQUIRED_TAGS};
