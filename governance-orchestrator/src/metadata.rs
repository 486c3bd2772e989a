//! Read-only resource metadata lookups.

use async_trait::async_trait;
use thiserror::Error;

/// Result alias for metadata lookups.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors surfaced by metadata backends.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The backend could not answer the lookup.
    #[error("metadata lookup failed: {reason}")]
    Lookup {
        /// Human-readable context provided by the backend.
        reason: String,
    },
}

impl MetadataError {
    /// Convenience helper to construct lookup errors.
    #[must_use]
    pub fn lookup(reason: impl Into<String>) -> Self {
        Self::Lookup {
            reason: reason.into(),
        }
    }
}

/// Trait implemented by read-only resource metadata backends.
///
/// The orchestrator bounds every call with its configured timeout and treats
/// both errors and timeouts as fail-closed critical findings; implementations
/// never need to retry internally.
#[async_trait]
pub trait ResourceMetadataClient: Send + Sync {
    /// Returns whether the named resource group exists.
    async fn resource_group_exists(&self, name: &str) -> MetadataResult<bool>;

    /// Returns whether the region currently offers the resource type.
    async fn region_available(&self, region: &str, resource_type: &str) -> MetadataResult<bool>;
}
