//! Validation request and outcome types.

use std::collections::BTreeMap;

use governance_decision::Decision;
use governance_policy::{NamingReport, RegionReport, TagReport};
use governance_primitives::{Environment, PolicyTier, Violation, WorkflowId};
use serde::{Deserialize, Serialize};

use crate::{GovernanceError, GovernanceResult};

/// A pre-flight request to provision or change a cloud resource.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationRequest {
    resource_type: String,
    name: String,
    resource_group: String,
    region: String,
    environment: Environment,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tier: Option<PolicyTier>,
}

impl ValidationRequest {
    /// Starts building a validation request for the given resource.
    #[must_use]
    pub fn builder(
        resource_type: impl Into<String>,
        name: impl Into<String>,
    ) -> ValidationRequestBuilder {
        ValidationRequestBuilder {
            resource_type: resource_type.into(),
            name: name.into(),
            resource_group: String::new(),
            region: String::new(),
            environment: Environment::Development,
            tags: BTreeMap::new(),
            template: None,
            tier: None,
        }
    }

    /// Resource type being provisioned (e.g. `storage-account`).
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Proposed resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target resource group.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Requested deployment region (free text, normalized during checks).
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Target environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Proposed resource tags.
    #[must_use]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Inline template text accompanying the request, if any.
    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Target policy tier, when the request is tier-governed.
    #[must_use]
    pub fn tier(&self) -> Option<PolicyTier> {
        self.tier
    }

    /// Subject reference used for workflows and audit events.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("{}/{}", self.resource_type, self.name)
    }
}

/// Builder for [`ValidationRequest`].
#[derive(Clone, Debug)]
pub struct ValidationRequestBuilder {
    resource_type: String,
    name: String,
    resource_group: String,
    region: String,
    environment: Environment,
    tags: BTreeMap<String, String>,
    template: Option<String>,
    tier: Option<PolicyTier>,
}

impl ValidationRequestBuilder {
    /// Sets the target resource group.
    #[must_use]
    pub fn resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = resource_group.into();
        self
    }

    /// Sets the requested deployment region.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the target environment.
    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Adds a single tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Replaces the tag map.
    #[must_use]
    pub fn tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags = tags;
        self
    }

    /// Attaches inline template text.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Sets the target policy tier.
    #[must_use]
    pub fn tier(mut self, tier: PolicyTier) -> Self {
        self.tier = Some(tier);
        self
    }

    /// Finalises the request.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidRequest`] when the resource type,
    /// name, or region is blank.
    pub fn build(self) -> GovernanceResult<ValidationRequest> {
        if self.resource_type.trim().is_empty() {
            return Err(GovernanceError::InvalidRequest(
                "resource type cannot be empty",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(GovernanceError::InvalidRequest("name cannot be empty"));
        }
        if self.region.trim().is_empty() {
            return Err(GovernanceError::InvalidRequest("region cannot be empty"));
        }

        Ok(ValidationRequest {
            resource_type: self.resource_type,
            name: self.name,
            resource_group: self.resource_group,
            region: self.region,
            environment: self.environment,
            tags: self.tags,
            template: self.template,
            tier: self.tier,
        })
    }
}

/// Everything produced by one pre-flight evaluation.
#[derive(Clone, Debug)]
pub struct PreFlightOutcome {
    decision: Decision,
    naming: NamingReport,
    region: RegionReport,
    tags: TagReport,
}

impl PreFlightOutcome {
    pub(crate) fn new(
        decision: Decision,
        naming: NamingReport,
        region: RegionReport,
        tags: TagReport,
    ) -> Self {
        Self {
            decision,
            naming,
            region,
            tags,
        }
    }

    /// The aggregate decision.
    #[must_use]
    pub fn decision(&self) -> &Decision {
        &self.decision
    }

    /// Violations that produced the decision.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        self.decision.violations()
    }

    /// Identifier of the approval workflow opened for this evaluation.
    #[must_use]
    pub fn workflow_id(&self) -> Option<WorkflowId> {
        self.decision.workflow_id()
    }

    /// Detailed naming report.
    #[must_use]
    pub fn naming(&self) -> &NamingReport {
        &self.naming
    }

    /// Detailed region report.
    #[must_use]
    pub fn region(&self) -> &RegionReport {
        &self.region
    }

    /// Detailed tag report.
    #[must_use]
    pub fn tags(&self) -> &TagReport {
        &self.tags
    }
}

/// What the provisioning executor reports back after a resource was created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvisionOutcome {
    resource_id: String,
    #[serde(default)]
    applied_tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    configuration: Option<String>,
}

impl ProvisionOutcome {
    /// Creates an outcome for the provisioned resource.
    #[must_use]
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            applied_tags: BTreeMap::new(),
            configuration: None,
        }
    }

    /// Records the tags actually applied to the resource.
    #[must_use]
    pub fn with_applied_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.applied_tags = tags;
        self
    }

    /// Records the configuration actually applied to the resource.
    #[must_use]
    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = Some(configuration.into());
        self
    }

    /// Provider identifier of the created resource.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Tags applied at provisioning time.
    #[must_use]
    pub fn applied_tags(&self) -> &BTreeMap<String, String> {
        &self.applied_tags
    }

    /// Applied configuration text, when the executor captured it.
    #[must_use]
    pub fn configuration(&self) -> Option<&str> {
        self.configuration.as_deref()
    }
}

/// Post-flight compliance summary. Reports remediation need, never blocks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplianceReport {
    compliant: bool,
    findings: Vec<Violation>,
    remediation_required: bool,
}

impl ComplianceReport {
    pub(crate) fn new(findings: Vec<Violation>) -> Self {
        let remediation_required = findings
            .iter()
            .any(|f| f.severity().requires_review());
        Self {
            compliant: findings.is_empty(),
            findings,
            remediation_required,
        }
    }

    /// Returns `true` when no findings were recorded.
    #[must_use]
    pub fn compliant(&self) -> bool {
        self.compliant
    }

    /// Findings recorded against the provisioned resource.
    #[must_use]
    pub fn findings(&self) -> &[Violation] {
        &self.findings
    }

    /// Returns `true` when at least one finding needs active remediation.
    #[must_use]
    pub fn remediation_required(&self) -> bool {
        self.remediation_required
    }
}
