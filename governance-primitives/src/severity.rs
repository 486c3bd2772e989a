//! Violation severity levels.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Severity attached to a policy violation.
///
/// Variants are declared least-severe first so that `Ord` ranks `Critical`
/// highest and `max()` over a violation set yields the dominant severity.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational finding; recorded for review.
    Low,
    /// Policy drift that should be corrected but does not gate provisioning.
    Medium,
    /// Significant gap requiring human sign-off before provisioning.
    High,
    /// Hard violation of a mandatory control; blocks provisioning outright.
    Critical,
}

impl Severity {
    /// Returns `true` when the severity blocks provisioning on its own.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Critical)
    }

    /// Returns `true` when the severity routes the request to human review.
    #[must_use]
    pub const fn requires_review(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    /// Returns the canonical label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_are_totally_ordered() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn max_yields_dominant_severity() {
        let severities = [Severity::Medium, Severity::Critical, Severity::Low];
        assert_eq!(severities.iter().copied().max(), Some(Severity::Critical));
    }

    #[test]
    fn review_and_blocking_flags() {
        assert!(Severity::Critical.is_blocking());
        assert!(!Severity::High.is_blocking());
        assert!(Severity::High.requires_review());
        assert!(!Severity::Medium.requires_review());
    }
}
