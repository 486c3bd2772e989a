//! Region normalization and approval checks.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

/// Canonical region identifiers known to the governance core.
pub const CANONICAL_REGIONS: &[&str] = &[
    "eastus",
    "eastus2",
    "westus",
    "westus2",
    "centralus",
    "usgovvirginia",
    "usgovtexas",
    "usgovarizona",
    "usgoviowa",
];

const MAX_ALTERNATIVES: usize = 5;

/// Result of validating a requested deployment region.
#[derive(Clone, Debug)]
pub struct RegionReport {
    available: bool,
    approved: bool,
    canonical: Option<String>,
    alternatives: Vec<String>,
}

impl RegionReport {
    /// Returns `true` when the input resolved to a known region.
    #[must_use]
    pub fn available(&self) -> bool {
        self.available
    }

    /// Returns `true` when the resolved region is on the approved list.
    #[must_use]
    pub fn approved(&self) -> bool {
        self.approved
    }

    /// Canonical identifier the input resolved to.
    #[must_use]
    pub fn canonical(&self) -> Option<&str> {
        self.canonical.as_deref()
    }

    /// Approved regions offered in place of a rejected one (at most 5).
    #[must_use]
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    /// Returns `true` when the region passed both checks.
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.available && self.approved
    }
}

/// Normalizes free-text region input and checks it against the approved set.
pub struct RegionValidator {
    approved: BTreeSet<String>,
    aliases: BTreeMap<&'static str, &'static str>,
}

impl RegionValidator {
    /// Creates a validator with the supplied approved-region set.
    #[must_use]
    pub fn new<I, S>(approved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases = BTreeMap::from([
            ("virginia", "usgovvirginia"),
            ("govvirginia", "usgovvirginia"),
            ("texas", "usgovtexas"),
            ("govtexas", "usgovtexas"),
            ("arizona", "usgovarizona"),
            ("govarizona", "usgovarizona"),
            ("iowa", "usgoviowa"),
            ("goviowa", "usgoviowa"),
        ]);

        Self {
            approved: approved.into_iter().map(Into::into).collect(),
            aliases,
        }
    }

    /// Creates a validator approving the US Government regions only.
    #[must_use]
    pub fn government() -> Self {
        Self::new(["usgovvirginia", "usgovtexas", "usgovarizona", "usgoviowa"])
    }

    /// Resolves free-text input to a canonical region identifier.
    ///
    /// Input is lower-cased and stripped of separators before lookup, so
    /// `"US Gov Virginia"`, `"usgov-virginia"` and `"virginia"` all resolve
    /// to `"usgovvirginia"`.
    #[must_use]
    pub fn normalize(&self, input: &str) -> Option<String> {
        let compact: String = input
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        if CANONICAL_REGIONS.contains(&compact.as_str()) {
            return Some(compact);
        }

        self.aliases
            .get(compact.as_str())
            .map(|canonical| (*canonical).to_owned())
    }

    /// Validates a requested region for a resource type.
    ///
    /// Per-resource-type availability refinement is the metadata client's
    /// concern; this validator only answers whether the region exists and is
    /// approved for the organization.
    #[must_use]
    pub fn validate(&self, region: &str, resource_type: &str) -> RegionReport {
        let canonical = self.normalize(region);
        let available = canonical.is_some();
        let approved = canonical
            .as_deref()
            .is_some_and(|c| self.approved.contains(c));

        let alternatives = if approved {
            Vec::new()
        } else {
            self.approved
                .iter()
                .take(MAX_ALTERNATIVES)
                .cloned()
                .collect()
        };

        debug!(
            region,
            resource_type,
            available,
            approved,
            "region validation complete"
        );

        RegionReport {
            available,
            approved,
            canonical,
            alternatives,
        }
    }
}

impl Default for RegionValidator {
    fn default() -> Self {
        Self::government()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virginia_normalizes_to_usgovvirginia() {
        let validator = RegionValidator::government();
        assert_eq!(
            validator.normalize("virginia").as_deref(),
            Some("usgovvirginia")
        );

        let report = validator.validate("virginia", "storage-account");
        assert!(report.accepted());
        assert_eq!(report.canonical(), Some("usgovvirginia"));
    }

    #[test]
    fn free_text_separators_are_stripped() {
        let validator = RegionValidator::government();
        assert_eq!(
            validator.normalize("US Gov Virginia").as_deref(),
            Some("usgovvirginia")
        );
        assert_eq!(validator.normalize("east-us").as_deref(), Some("eastus"));
    }

    #[test]
    fn unknown_region_rejected_with_alternatives() {
        let validator = RegionValidator::government();
        let report = validator.validate("us-east-5", "virtual-machine");
        assert!(!report.available());
        assert!(!report.approved());
        assert!(report.alternatives().len() <= 5);
        assert!(!report.alternatives().is_empty());
    }

    #[test]
    fn known_but_unapproved_region_is_rejected() {
        let validator = RegionValidator::government();
        let report = validator.validate("eastus", "storage-account");
        assert!(report.available());
        assert!(!report.approved());
        assert!(report
            .alternatives()
            .contains(&"usgovvirginia".to_owned()));
    }
}
