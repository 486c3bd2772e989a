//! Tier-to-requirement registry for regulated environments.

use std::collections::{BTreeMap, BTreeSet};

use governance_primitives::PolicyTier;
use serde::{Deserialize, Serialize};

use crate::{PolicyError, PolicyResult};

/// Minimum TLS protocol version mandated by a tier.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinTlsVersion {
    /// TLS 1.2.
    Tls12,
    /// TLS 1.3.
    Tls13,
}

impl MinTlsVersion {
    /// Content markers that count as addressing the TLS requirement.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Tls12 => &["tls1_2", "tls1.2", "tls 1.2"],
            Self::Tls13 => &["tls1_3", "tls1.3", "tls 1.3"],
        }
    }
}

/// Identity-control requirements bundled with a tier.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct IdentityRequirements {
    /// Workloads must authenticate with a managed identity.
    pub managed_identity: bool,
    /// Human access requires multi-factor authentication.
    pub mfa: bool,
    /// Administrative access flows through a privileged-access workflow.
    pub privileged_access_workflow: bool,
    /// Interactive sign-in requires hardware-token authentication.
    pub hardware_token: bool,
}

/// Full requirement set for a single policy tier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TierPolicy {
    tier: PolicyTier,
    min_tls: MinTlsVersion,
    min_key_size_bits: u32,
    customer_managed_keys: bool,
    hsm_backed_keys: bool,
    fips_mode: bool,
    public_network_access: bool,
    service_endpoints: bool,
    allowed_regions: BTreeSet<String>,
    mandatory_tags: BTreeSet<String>,
    identity: IdentityRequirements,
}

impl TierPolicy {
    /// Tier this requirement set belongs to.
    #[must_use]
    pub fn tier(&self) -> PolicyTier {
        self.tier
    }

    /// Minimum TLS version for data in transit.
    #[must_use]
    pub fn min_tls(&self) -> MinTlsVersion {
        self.min_tls
    }

    /// Minimum asymmetric key size in bits.
    #[must_use]
    pub fn min_key_size_bits(&self) -> u32 {
        self.min_key_size_bits
    }

    /// Whether customer-managed keys are mandatory.
    #[must_use]
    pub fn customer_managed_keys(&self) -> bool {
        self.customer_managed_keys
    }

    /// Whether key material must be HSM-backed.
    #[must_use]
    pub fn hsm_backed_keys(&self) -> bool {
        self.hsm_backed_keys
    }

    /// Whether FIPS 140-2 validated cryptography is mandatory.
    #[must_use]
    pub fn fips_mode(&self) -> bool {
        self.fips_mode
    }

    /// Whether public network access is permitted at this tier.
    #[must_use]
    pub fn public_network_access(&self) -> bool {
        self.public_network_access
    }

    /// Whether service endpoints are permitted at this tier.
    #[must_use]
    pub fn service_endpoints(&self) -> bool {
        self.service_endpoints
    }

    /// Canonical region identifiers resources may be deployed to.
    #[must_use]
    pub fn allowed_regions(&self) -> &BTreeSet<String> {
        &self.allowed_regions
    }

    /// Tag keys every resource at this tier must carry.
    #[must_use]
    pub fn mandatory_tags(&self) -> &BTreeSet<String> {
        &self.mandatory_tags
    }

    /// Identity-control requirements.
    #[must_use]
    pub fn identity(&self) -> IdentityRequirements {
        self.identity
    }
}

fn regions<const N: usize>(names: [&str; N]) -> BTreeSet<String> {
    names.into_iter().map(str::to_owned).collect()
}

fn tags<const N: usize>(names: [&str; N]) -> BTreeSet<String> {
    names.into_iter().map(str::to_owned).collect()
}

/// Fixed registry mapping each tier to its requirement set.
#[derive(Clone, Debug)]
pub struct PolicyCatalog {
    policies: BTreeMap<PolicyTier, TierPolicy>,
}

impl PolicyCatalog {
    /// Builds the built-in catalog covering every tier.
    #[must_use]
    pub fn builtin() -> Self {
        let mut policies = BTreeMap::new();

        policies.insert(
            PolicyTier::Il2,
            TierPolicy {
                tier: PolicyTier::Il2,
                min_tls: MinTlsVersion::Tls12,
                min_key_size_bits: 2048,
                customer_managed_keys: false,
                hsm_backed_keys: false,
                fips_mode: false,
                public_network_access: true,
                service_endpoints: true,
                allowed_regions: regions([
                    "eastus",
                    "eastus2",
                    "westus",
                    "westus2",
                    "centralus",
                    "usgovvirginia",
                    "usgovtexas",
                    "usgovarizona",
                    "usgoviowa",
                ]),
                mandatory_tags: tags(["environment", "project", "owner", "cost-center"]),
                identity: IdentityRequirements {
                    managed_identity: false,
                    mfa: false,
                    privileged_access_workflow: false,
                    hardware_token: false,
                },
            },
        );

        policies.insert(
            PolicyTier::Il4,
            TierPolicy {
                tier: PolicyTier::Il4,
                min_tls: MinTlsVersion::Tls12,
                min_key_size_bits: 2048,
                customer_managed_keys: false,
                hsm_backed_keys: false,
                fips_mode: true,
                public_network_access: false,
                service_endpoints: true,
                allowed_regions: regions([
                    "usgovvirginia",
                    "usgovtexas",
                    "usgovarizona",
                    "usgoviowa",
                ]),
                mandatory_tags: tags([
                    "environment",
                    "project",
                    "owner",
                    "cost-center",
                    "data-classification",
                ]),
                identity: IdentityRequirements {
                    managed_identity: true,
                    mfa: true,
                    privileged_access_workflow: false,
                    hardware_token: false,
                },
            },
        );

        policies.insert(
            PolicyTier::Il5,
            TierPolicy {
                tier: PolicyTier::Il5,
                min_tls: MinTlsVersion::Tls12,
                min_key_size_bits: 3072,
                customer_managed_keys: true,
                hsm_backed_keys: false,
                fips_mode: true,
                public_network_access: false,
                service_endpoints: false,
                allowed_regions: regions(["usgovvirginia", "usgovtexas", "usgovarizona"]),
                mandatory_tags: tags([
                    "environment",
                    "project",
                    "owner",
                    "cost-center",
                    "data-classification",
                    "impact-level",
                ]),
                identity: IdentityRequirements {
                    managed_identity: true,
                    mfa: true,
                    privileged_access_workflow: true,
                    hardware_token: false,
                },
            },
        );

        policies.insert(
            PolicyTier::Il6,
            TierPolicy {
                tier: PolicyTier::Il6,
                min_tls: MinTlsVersion::Tls13,
                min_key_size_bits: 4096,
                customer_managed_keys: true,
                hsm_backed_keys: true,
                fips_mode: true,
                public_network_access: false,
                service_endpoints: false,
                allowed_regions: regions(["usgovvirginia"]),
                mandatory_tags: tags([
                    "environment",
                    "project",
                    "owner",
                    "cost-center",
                    "data-classification",
                    "impact-level",
                    "mission-owner",
                ]),
                identity: IdentityRequirements {
                    managed_identity: true,
                    mfa: true,
                    privileged_access_workflow: true,
                    hardware_token: true,
                },
            },
        );

        Self { policies }
    }

    /// Looks up the requirement set for a tier.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownTier`] when the registry holds no entry
    /// for the tier.
    pub fn get(&self, tier: PolicyTier) -> PolicyResult<&TierPolicy> {
        self.policies
            .get(&tier)
            .ok_or(PolicyError::UnknownTier(tier))
    }

    /// Iterates over the registered requirement sets in tier order.
    pub fn iter(&self) -> impl Iterator<Item = &TierPolicy> {
        self.policies.values()
    }
}

impl Default for PolicyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_tier() {
        let catalog = PolicyCatalog::builtin();
        for tier in PolicyTier::ALL {
            assert_eq!(catalog.get(tier).unwrap().tier(), tier);
        }
    }

    #[test]
    fn higher_tiers_narrow_regions() {
        let catalog = PolicyCatalog::builtin();
        for window in PolicyTier::ALL.windows(2) {
            let lower = catalog.get(window[0]).unwrap();
            let higher = catalog.get(window[1]).unwrap();
            assert!(
                higher.allowed_regions().is_subset(lower.allowed_regions()),
                "{} regions must be a subset of {}",
                higher.tier(),
                lower.tier()
            );
            assert!(higher.allowed_regions().len() < lower.allowed_regions().len());
        }
    }

    #[test]
    fn higher_tiers_broaden_tags_and_requirements() {
        let catalog = PolicyCatalog::builtin();
        for window in PolicyTier::ALL.windows(2) {
            let lower = catalog.get(window[0]).unwrap();
            let higher = catalog.get(window[1]).unwrap();
            assert!(lower.mandatory_tags().is_subset(higher.mandatory_tags()));
            assert!(higher.min_key_size_bits() >= lower.min_key_size_bits());
            assert!(higher.min_tls() >= lower.min_tls());
        }
    }

    #[test]
    fn il5_requires_fips_and_cmk() {
        let catalog = PolicyCatalog::builtin();
        let policy = catalog.get(PolicyTier::Il5).unwrap();
        assert!(policy.fips_mode());
        assert!(policy.customer_managed_keys());
        assert!(!policy.hsm_backed_keys());
        assert!(!policy.public_network_access());
    }
}
