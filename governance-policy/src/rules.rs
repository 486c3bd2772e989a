//! Catalog-driven rule evaluation over request content.

use std::sync::Arc;

use governance_primitives::{PolicyTier, Severity, Violation};
use tracing::debug;

use crate::catalog::PolicyCatalog;
use crate::region::CANONICAL_REGIONS;
use crate::PolicyResult;

const FIPS_KEYWORDS: &[&str] = &["fips"];
const CMK_KEYWORDS: &[&str] = &["customer-managed", "customermanagedkey", "cmk"];
const HSM_KEYWORDS: &[&str] = &["hsm", "premium"];
const PUBLIC_NETWORK_KEYWORDS: &[&str] = &["publicnetworkaccess", "public_network_access"];
const ENDPOINT_KEYWORDS: &[&str] = &["privateendpoint", "serviceendpoint", "private_endpoint"];
const MANAGED_IDENTITY_KEYWORDS: &[&str] = &["managedidentity", "systemassigned", "userassigned"];
const MFA_KEYWORDS: &[&str] = &["mfa", "multifactor", "multi-factor"];
const PRIVILEGED_ACCESS_KEYWORDS: &[&str] = &["privileged", "pim", "justintime"];
const HARDWARE_TOKEN_KEYWORDS: &[&str] = &["hardwaretoken", "fido2", "piv", "smartcard"];

/// Strategy for deciding whether request content addresses a requirement.
///
/// The default keyword strategy is a deliberately conservative approximation;
/// swapping in a structural template parser only means implementing this
/// trait, the decision engine never changes.
pub trait ContentInspector: Send + Sync {
    /// Returns `true` when the content addresses any of the supplied markers.
    fn addresses(&self, content: &str, keywords: &[&str]) -> bool;
}

/// Case-insensitive substring inspector.
///
/// Known limitation: a substring match cannot tell a requirement satisfied at
/// the wrong scope from one satisfied at the right scope, because the content
/// is never parsed into a resource graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordInspector;

impl ContentInspector for KeywordInspector {
    fn addresses(&self, content: &str, keywords: &[&str]) -> bool {
        let haystack = content.to_ascii_lowercase();
        keywords.iter().any(|keyword| haystack.contains(keyword))
    }
}

/// Evaluates request content against the catalog requirements for a tier.
pub struct RuleEvaluator {
    catalog: PolicyCatalog,
    inspector: Arc<dyn ContentInspector>,
}

impl RuleEvaluator {
    /// Creates an evaluator over the supplied catalog with the default
    /// keyword inspector.
    #[must_use]
    pub fn new(catalog: PolicyCatalog) -> Self {
        Self {
            catalog,
            inspector: Arc::new(KeywordInspector),
        }
    }

    /// Replaces the content-inspection strategy.
    #[must_use]
    pub fn with_inspector(mut self, inspector: Arc<dyn ContentInspector>) -> Self {
        self.inspector = inspector;
        self
    }

    /// Returns the catalog backing this evaluator.
    #[must_use]
    pub fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    /// Returns the active content-inspection strategy.
    #[must_use]
    pub fn inspector(&self) -> &Arc<dyn ContentInspector> {
        &self.inspector
    }

    /// Checks content against every requirement category of the tier and
    /// returns one violation per unmet requirement.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PolicyError::UnknownTier`] when the catalog holds no
    /// entry for the tier.
    pub fn evaluate(&self, content: &str, tier: PolicyTier) -> PolicyResult<Vec<Violation>> {
        let policy = self.catalog.get(tier)?;
        let mut violations = Vec::new();

        if policy.fips_mode() && !self.inspector.addresses(content, FIPS_KEYWORDS) {
            violations.push(Violation::new(
                "ENC-001",
                "FIPS 140-2 validated cryptography",
                Severity::Critical,
                format!("{tier} mandates FIPS 140-2 validated cryptographic modules and the request does not configure them"),
                "Enable FIPS-validated cryptography in the resource configuration",
            ));
        }

        if policy.customer_managed_keys() && !self.inspector.addresses(content, CMK_KEYWORDS) {
            violations.push(Violation::new(
                "ENC-002",
                "Customer-managed keys",
                Severity::High,
                format!("{tier} mandates customer-managed encryption keys and the request does not configure them"),
                "Configure encryption with a customer-managed key",
            ));
        }

        if policy.hsm_backed_keys() && !self.inspector.addresses(content, HSM_KEYWORDS) {
            violations.push(Violation::new(
                "ENC-003",
                "HSM-backed key protection",
                Severity::High,
                format!("{tier} mandates HSM-backed key material and the request does not configure it"),
                "Store key material in an HSM-backed vault",
            ));
        }

        if !self
            .inspector
            .addresses(content, policy.min_tls().keywords())
        {
            violations.push(Violation::new(
                "ENC-004",
                "Minimum TLS version",
                Severity::Medium,
                format!("{tier} mandates a minimum TLS version and the request does not pin one"),
                "Pin the minimum TLS version in the resource configuration",
            ));
        }

        if !policy.public_network_access()
            && !self
                .inspector
                .addresses(content, PUBLIC_NETWORK_KEYWORDS)
        {
            violations.push(Violation::new(
                "NET-001",
                "Public network access disabled",
                Severity::High,
                format!("{tier} forbids public network access and the request does not address the setting"),
                "Disable public network access on the resource",
            ));
        }

        if !policy.service_endpoints() && !self.inspector.addresses(content, ENDPOINT_KEYWORDS) {
            violations.push(Violation::new(
                "NET-002",
                "Private connectivity",
                Severity::Medium,
                format!("{tier} restricts service endpoints and the request does not configure private connectivity"),
                "Route traffic through private endpoints",
            ));
        }

        let identity = policy.identity();
        if identity.managed_identity
            && !self.inspector.addresses(content, MANAGED_IDENTITY_KEYWORDS)
        {
            violations.push(Violation::new(
                "IAM-001",
                "Managed identity",
                Severity::High,
                format!("{tier} mandates managed-identity authentication and the request does not configure it"),
                "Assign a managed identity to the resource",
            ));
        }

        if identity.mfa && !self.inspector.addresses(content, MFA_KEYWORDS) {
            violations.push(Violation::new(
                "IAM-002",
                "Multi-factor authentication",
                Severity::Medium,
                format!("{tier} mandates multi-factor authentication for human access"),
                "Require MFA on the governing access policies",
            ));
        }

        if identity.privileged_access_workflow
            && !self
                .inspector
                .addresses(content, PRIVILEGED_ACCESS_KEYWORDS)
        {
            violations.push(Violation::new(
                "IAM-003",
                "Privileged-access workflow",
                Severity::Medium,
                format!("{tier} mandates privileged-access workflows for administrative operations"),
                "Gate administrative access behind a privileged-access workflow",
            ));
        }

        if identity.hardware_token
            && !self.inspector.addresses(content, HARDWARE_TOKEN_KEYWORDS)
        {
            violations.push(Violation::new(
                "IAM-004",
                "Hardware-token authentication",
                Severity::High,
                format!("{tier} mandates hardware-token authentication for interactive sign-in"),
                "Enforce hardware-token (FIDO2/PIV) authentication",
            ));
        }

        let unreferenced_tags: Vec<&str> = policy
            .mandatory_tags()
            .iter()
            .filter(|tag| !self.inspector.addresses(content, &[tag.as_str()]))
            .map(String::as_str)
            .collect();
        if !unreferenced_tags.is_empty() {
            violations.push(Violation::new(
                "TAG-002",
                "Mandatory tags in template",
                Severity::Medium,
                format!(
                    "{tier} mandates tags not referenced by the request content: {}",
                    unreferenced_tags.join(", ")
                ),
                "Declare the mandatory tags on every resource in the template",
            ));
        }

        let disallowed_regions: Vec<&str> = CANONICAL_REGIONS
            .iter()
            .filter(|region| {
                !policy.allowed_regions().contains(**region)
                    && self.inspector.addresses(content, &[**region])
            })
            .copied()
            .collect();
        if !disallowed_regions.is_empty() {
            violations.push(Violation::new(
                "REG-002",
                "Region outside tier boundary",
                Severity::High,
                format!(
                    "request content references regions outside the {tier} boundary: {}",
                    disallowed_regions.join(", ")
                ),
                "Deploy only to regions approved for the tier",
            ));
        }

        debug!(
            %tier,
            violation_count = violations.len(),
            "rule evaluation complete"
        );

        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> RuleEvaluator {
        RuleEvaluator::new(PolicyCatalog::builtin())
    }

    // Template that addresses every IL5 requirement except FIPS and CMK.
    const IL5_TEMPLATE_NO_FIPS_NO_CMK: &str = r#"{
        "properties": {
            "minimumTlsVersion": "TLS1_2",
            "publicNetworkAccess": "Disabled",
            "privateEndpointConnections": [],
            "identity": { "type": "SystemAssigned" },
            "accessPolicies": "mfa-required; privileged access via PIM"
        },
        "location": "usgovvirginia",
        "tags": {
            "environment": "production",
            "project": "atlas",
            "owner": "platform-team",
            "cost-center": "cc-1042",
            "data-classification": "cui",
            "impact-level": "il5"
        }
    }"#;

    #[test]
    fn il5_without_fips_and_cmk_yields_enc_violations() {
        let violations = evaluator()
            .evaluate(IL5_TEMPLATE_NO_FIPS_NO_CMK, PolicyTier::Il5)
            .unwrap();

        let ids: Vec<&str> = violations.iter().map(Violation::policy_id).collect();
        assert_eq!(ids, ["ENC-001", "ENC-002"]);
        assert_eq!(violations[0].severity(), Severity::Critical);
        assert_eq!(violations[1].severity(), Severity::High);
    }

    #[test]
    fn fully_addressed_template_yields_no_violations() {
        let content = format!(
            "{} fips customer-managed",
            IL5_TEMPLATE_NO_FIPS_NO_CMK
        );
        let violations = evaluator().evaluate(&content, PolicyTier::Il5).unwrap();
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn empty_content_yields_full_requirement_set_for_tier() {
        let violations = evaluator().evaluate("", PolicyTier::Il2).unwrap();
        // IL2 only pins TLS and its mandatory tags; nothing else is mandated.
        let ids: Vec<&str> = violations.iter().map(Violation::policy_id).collect();
        assert_eq!(ids, ["ENC-004", "TAG-002"]);
    }

    #[test]
    fn disallowed_region_reference_is_flagged() {
        let content = format!("{IL5_TEMPLATE_NO_FIPS_NO_CMK} backup site: eastus");
        let violations = evaluator().evaluate(&content, PolicyTier::Il5).unwrap();
        assert!(violations
            .iter()
            .any(|v| v.policy_id() == "REG-002" && v.description().contains("eastus")));
    }

    #[test]
    fn custom_inspector_replaces_keyword_strategy() {
        struct AlwaysSatisfied;

        impl ContentInspector for AlwaysSatisfied {
            fn addresses(&self, _content: &str, _keywords: &[&str]) -> bool {
                true
            }
        }

        let evaluator = evaluator().with_inspector(Arc::new(AlwaysSatisfied));
        let violations = evaluator.evaluate("", PolicyTier::Il6).unwrap();
        assert!(violations.is_empty());
    }
}
