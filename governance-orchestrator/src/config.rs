//! Runtime configuration for the orchestrator.

use std::time::Duration;

use crate::{GovernanceError, GovernanceResult};

/// Tunables for governance evaluation.
#[derive(Clone, Copy, Debug)]
pub struct GovernanceConfig {
    lookup_timeout: Duration,
    approval_ttl: chrono::Duration,
}

impl GovernanceConfig {
    /// Creates a configuration with the supplied bounds.
    #[must_use]
    pub const fn new(lookup_timeout: Duration, approval_ttl: chrono::Duration) -> Self {
        Self {
            lookup_timeout,
            approval_ttl,
        }
    }

    /// Upper bound on a single resource metadata lookup.
    #[must_use]
    pub const fn lookup_timeout(self) -> Duration {
        self.lookup_timeout
    }

    /// Time-to-live for approval workflows opened by the decision engine.
    #[must_use]
    pub const fn approval_ttl(self) -> chrono::Duration {
        self.approval_ttl
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidRequest`] when either duration is
    /// not positive.
    pub fn validate(self) -> GovernanceResult<()> {
        if self.lookup_timeout.is_zero() {
            return Err(GovernanceError::InvalidRequest(
                "lookup timeout must be greater than zero",
            ));
        }
        if self.approval_ttl <= chrono::Duration::zero() {
            return Err(GovernanceError::InvalidRequest(
                "approval ttl must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            approval_ttl: chrono::Duration::hours(24),
        }
    }
}
