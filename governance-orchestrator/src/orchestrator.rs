//! The governance facade: validators, rule evaluation, decision, audit.

use std::sync::Arc;

use governance_approvals::{ApprovalConfig, ApprovalManager, InMemoryStore, WorkflowStore};
use governance_decision::{DecisionContext, DecisionEngine};
use governance_policy::{
    NamingValidator, PolicyCatalog, PolicyError, RegionValidator, RuleEvaluator, TagValidator,
};
use governance_primitives::{Severity, Violation};
use tracing::{debug, warn};

use crate::audit::{AuditEvent, AuditSink, TracingAuditSink};
use crate::config::GovernanceConfig;
use crate::metadata::ResourceMetadataClient;
use crate::request::{ComplianceReport, PreFlightOutcome, ProvisionOutcome, ValidationRequest};
use crate::{GovernanceError, GovernanceResult};

/// Per-resource-type post-flight baseline: rule id, name, content markers,
/// and remediation text.
const POST_FLIGHT_BASELINES: &[(&str, &str, &str, &[&str], &str)] = &[
    (
        "storage-account",
        "POST-001",
        "HTTPS-only traffic",
        &["supportshttpstrafficonly", "httpsonly", "https"],
        "Enable HTTPS-only traffic on the storage account",
    ),
    (
        "key-vault",
        "POST-002",
        "Soft delete and purge protection",
        &["purgeprotection", "softdelete"],
        "Enable soft delete and purge protection on the vault",
    ),
    (
        "sql-server",
        "POST-003",
        "Server auditing",
        &["auditing"],
        "Enable auditing on the server",
    ),
];

/// Facade sequencing validators, rule evaluation, and the decision engine.
///
/// Validators are pure; the only shared mutable state is the workflow store
/// behind the approval manager, so one orchestrator can serve many
/// concurrent callers.
pub struct GovernanceOrchestrator {
    naming: NamingValidator,
    region: RegionValidator,
    tags: TagValidator,
    rules: RuleEvaluator,
    engine: DecisionEngine,
    store: Arc<dyn WorkflowStore>,
    metadata: Option<Arc<dyn ResourceMetadataClient>>,
    audit: Arc<dyn AuditSink>,
    config: GovernanceConfig,
}

impl GovernanceOrchestrator {
    /// Creates an orchestrator with the built-in catalog, an in-memory
    /// workflow store, a tracing audit sink, and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    /// Creates an orchestrator over the supplied workflow store.
    #[must_use]
    pub fn with_store(store: Arc<dyn WorkflowStore>) -> Self {
        let config = GovernanceConfig::default();
        Self {
            naming: NamingValidator::new(),
            region: RegionValidator::government(),
            tags: TagValidator::new(),
            rules: RuleEvaluator::new(PolicyCatalog::builtin()),
            engine: Self::wire_engine(&store, config),
            store,
            metadata: None,
            audit: Arc::new(TracingAuditSink),
            config,
        }
    }

    fn wire_engine(store: &Arc<dyn WorkflowStore>, config: GovernanceConfig) -> DecisionEngine {
        let approvals = ApprovalManager::new(Arc::clone(store))
            .with_config(ApprovalConfig::new(config.approval_ttl()));
        DecisionEngine::new(Arc::new(approvals))
    }

    /// Replaces the configuration, rewiring the approval manager so new
    /// workflows pick up the configured time-to-live.
    #[must_use]
    pub fn with_config(mut self, config: GovernanceConfig) -> Self {
        self.config = config;
        self.engine = Self::wire_engine(&self.store, config);
        self
    }

    /// Installs a resource metadata client for existence/availability checks.
    #[must_use]
    pub fn with_metadata_client(mut self, client: Arc<dyn ResourceMetadataClient>) -> Self {
        self.metadata = Some(client);
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    /// Replaces the rule evaluator (e.g. to plug in a structural inspector).
    #[must_use]
    pub fn with_rule_evaluator(mut self, rules: RuleEvaluator) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the region validator (e.g. to widen the approved set).
    #[must_use]
    pub fn with_region_validator(mut self, region: RegionValidator) -> Self {
        self.region = region;
        self
    }

    /// Returns the approval manager so approval UIs can resolve workflows.
    #[must_use]
    pub fn approvals(&self) -> &Arc<ApprovalManager> {
        self.engine.approvals()
    }

    /// Runs the full pre-flight check and produces a decision.
    ///
    /// Every degraded path (failed lookups, unexpected evaluator failures)
    /// folds into the violation set and fails closed; the evaluation always
    /// produces a decision with actionable violations.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::PolicyNotFound`] when the catalog holds no
    /// entry for the requested tier, and [`GovernanceError::InvalidRequest`]
    /// when the configuration is unusable. Both are caller misconfiguration,
    /// never evaluation outcomes.
    pub async fn evaluate_preflight(
        &self,
        request: &ValidationRequest,
    ) -> GovernanceResult<PreFlightOutcome> {
        self.config.validate()?;
        let mut violations = Vec::new();

        let naming = self.naming.validate(
            request.resource_type(),
            request.name(),
            request.environment(),
        );
        if !naming.valid() {
            let action = naming.suggestion().map_or_else(
                || "Choose a name that satisfies the resource type rule".to_owned(),
                |suggestion| format!("Rename the resource, e.g. `{suggestion}`"),
            );
            violations.push(Violation::new(
                "NAM-001",
                "Resource naming convention",
                Severity::Medium,
                format!(
                    "proposed name `{}` is invalid: {}",
                    request.name(),
                    naming.errors().join("; ")
                ),
                action,
            ));
        }

        let region = self.region.validate(request.region(), request.resource_type());
        if !region.accepted() {
            let action = if region.alternatives().is_empty() {
                "Deploy to an approved region".to_owned()
            } else {
                format!(
                    "Deploy to an approved region instead: {}",
                    region.alternatives().join(", ")
                )
            };
            violations.push(Violation::new(
                "REG-001",
                "Approved deployment region",
                Severity::High,
                format!("region `{}` is not approved for deployment", request.region()),
                action,
            ));
        }

        let tags = self.tags.validate(request.tags());
        if !tags.valid() {
            violations.push(Violation::new(
                "TAG-001",
                "Mandatory resource tags",
                Severity::Medium,
                format!(
                    "required tags are missing or blank: {}",
                    tags.missing().join(", ")
                ),
                "Add the required tags with non-empty values",
            ));
        }

        if let Some(client) = &self.metadata {
            self.check_metadata(client, request, region.canonical(), &mut violations)
                .await;
        }

        if let Some(tier) = request.tier() {
            let content = request.template().unwrap_or_default();
            match self.rules.evaluate(content, tier) {
                Ok(mut rule_violations) => violations.append(&mut rule_violations),
                Err(err @ PolicyError::UnknownTier(_)) => {
                    return Err(GovernanceError::from(err));
                }
                Err(err) => {
                    warn!(
                        subject = %request.subject(),
                        error = %err,
                        "rule evaluation failed; failing closed"
                    );
                    violations.push(Violation::new(
                        "SYS-001",
                        "Internal evaluation failure",
                        Severity::Critical,
                        format!("rule evaluation failed: {err}"),
                        "Retry; escalate to the governance team if the failure persists",
                    ));
                }
            }
        }

        let context = DecisionContext::new(request.subject(), request.environment());
        let decision = self.engine.decide(violations, &context).await;

        self.audit.record(AuditEvent::new(
            request.subject(),
            request.environment(),
            decision.verdict(),
            decision.violations().len(),
            decision.workflow_id(),
        ));

        debug!(
            subject = %request.subject(),
            verdict = ?decision.verdict(),
            violation_count = decision.violations().len(),
            "pre-flight evaluation complete"
        );

        Ok(PreFlightOutcome::new(decision, naming, region, tags))
    }

    /// Re-checks tagging and the resource-specific security baseline after
    /// provisioning. Reports remediation need; never blocks.
    #[must_use]
    pub fn evaluate_postflight(
        &self,
        request: &ValidationRequest,
        outcome: &ProvisionOutcome,
    ) -> ComplianceReport {
        let mut findings = Vec::new();

        let tags = self.tags.validate(outcome.applied_tags());
        if !tags.valid() {
            findings.push(Violation::new(
                "TAG-001",
                "Mandatory resource tags",
                Severity::Medium,
                format!(
                    "provisioned resource `{}` is missing tags: {}",
                    outcome.resource_id(),
                    tags.missing().join(", ")
                ),
                "Apply the required tags to the provisioned resource",
            ));
        }

        if let Some(configuration) = outcome.configuration() {
            findings.extend(self.baseline_findings(request.resource_type(), configuration));

            if let Some(tier) = request.tier() {
                match self.rules.evaluate(configuration, tier) {
                    Ok(rule_findings) => findings.extend(rule_findings),
                    Err(err) => {
                        // Post-flight never blocks; surface the failure in the log only.
                        warn!(
                            resource_id = outcome.resource_id(),
                            error = %err,
                            "post-flight rule evaluation failed"
                        );
                    }
                }
            }
        }

        let report = ComplianceReport::new(findings);
        debug!(
            resource_id = outcome.resource_id(),
            compliant = report.compliant(),
            remediation_required = report.remediation_required(),
            "post-flight compliance check complete"
        );
        report
    }

    fn baseline_findings(&self, resource_type: &str, configuration: &str) -> Vec<Violation> {
        let inspector = self.rules.inspector();
        POST_FLIGHT_BASELINES
            .iter()
            .filter(|(baseline_type, ..)| baseline_type.eq_ignore_ascii_case(resource_type))
            .filter(|(_, _, _, keywords, _)| !inspector.addresses(configuration, keywords))
            .map(|(_, id, name, _, action)| {
                Violation::new(
                    *id,
                    *name,
                    Severity::Medium,
                    format!("applied configuration does not address {name}"),
                    *action,
                )
            })
            .collect()
    }

    async fn check_metadata(
        &self,
        client: &Arc<dyn ResourceMetadataClient>,
        request: &ValidationRequest,
        canonical_region: Option<&str>,
        violations: &mut Vec<Violation>,
    ) {
        let timeout = self.config.lookup_timeout();

        if !request.resource_group().is_empty() {
            match tokio::time::timeout(
                timeout,
                client.resource_group_exists(request.resource_group()),
            )
            .await
            {
                Ok(Ok(true)) => {}
                Ok(Ok(false)) => violations.push(Violation::new(
                    "RES-001",
                    "Resource group exists",
                    Severity::Medium,
                    format!(
                        "resource group `{}` was not found",
                        request.resource_group()
                    ),
                    "Create the resource group first or correct the reference",
                )),
                Ok(Err(err)) => {
                    violations.push(lookup_failure("resource group lookup", &err.to_string()));
                }
                Err(_) => violations.push(lookup_failure(
                    "resource group lookup",
                    &format!("timed out after {timeout:?}"),
                )),
            }
        }

        if let Some(region) = canonical_region {
            match tokio::time::timeout(
                timeout,
                client.region_available(region, request.resource_type()),
            )
            .await
            {
                Ok(Ok(true)) => {}
                Ok(Ok(false)) => violations.push(Violation::new(
                    "REG-003",
                    "Region offers resource type",
                    Severity::High,
                    format!(
                        "region `{region}` does not currently offer `{}`",
                        request.resource_type()
                    ),
                    "Deploy to a region where the resource type is available",
                )),
                Ok(Err(err)) => {
                    violations.push(lookup_failure(
                        "region availability lookup",
                        &err.to_string(),
                    ));
                }
                Err(_) => violations.push(lookup_failure(
                    "region availability lookup",
                    &format!("timed out after {timeout:?}"),
                )),
            }
        }
    }
}

impl Default for GovernanceOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup_failure(what: &str, detail: &str) -> Violation {
    warn!(what, detail, "metadata lookup failed closed");
    Violation::new(
        "EXT-001",
        "External metadata lookup",
        Severity::Critical,
        format!("{what} failed: {detail}"),
        "Retry when the metadata service is reachable; the request fails closed until then",
    )
}
