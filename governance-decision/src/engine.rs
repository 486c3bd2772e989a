//! Severity-to-verdict decision engine.

use std::sync::Arc;

use governance_approvals::ApprovalManager;
use governance_primitives::{Environment, Severity, Violation};
use tracing::{debug, warn};

use crate::approvers::required_approvers;
use crate::decision::Decision;

/// Context a decision is made in.
#[derive(Clone, Debug)]
pub struct DecisionContext {
    subject: String,
    environment: Environment,
}

impl DecisionContext {
    /// Creates a context for the governed subject.
    #[must_use]
    pub fn new(subject: impl Into<String>, environment: Environment) -> Self {
        Self {
            subject: subject.into(),
            environment,
        }
    }

    /// Reference to the governed subject (resource type and name).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Environment the request targets.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }
}

/// Aggregates violations into one verdict, opening an approval workflow when
/// the verdict requires human sign-off.
pub struct DecisionEngine {
    approvals: Arc<ApprovalManager>,
}

impl DecisionEngine {
    /// Creates an engine that opens workflows through the supplied manager.
    #[must_use]
    pub fn new(approvals: Arc<ApprovalManager>) -> Self {
        Self { approvals }
    }

    /// Returns the approval manager backing this engine.
    #[must_use]
    pub fn approvals(&self) -> &Arc<ApprovalManager> {
        &self.approvals
    }

    /// Decides the verdict for a violation set.
    ///
    /// Precedence: any critical violation denies outright; otherwise a high
    /// violation or a production target escalates to approval; otherwise any
    /// remaining finding is recorded audit-only; a clean set is allowed. The
    /// verdict is computed in full before the workflow side effect runs, so a
    /// workflow is never orphaned from its triggering decision.
    pub async fn decide(&self, violations: Vec<Violation>, context: &DecisionContext) -> Decision {
        let highest = violations.iter().map(Violation::severity).max();

        if highest == Some(Severity::Critical) {
            warn!(
                subject = context.subject(),
                violation_count = violations.len(),
                "critical violation denies request"
            );
            return Decision::deny(violations);
        }

        let escalate =
            highest == Some(Severity::High) || context.environment().is_production();

        if escalate {
            let approvers = required_approvers(highest, context.environment());
            let reason = format!(
                "pre-flight governance requires sign-off for {} targeting {}",
                context.subject(),
                context.environment()
            );

            match self
                .approvals
                .create(
                    context.subject(),
                    reason,
                    violations.clone(),
                    approvers.clone(),
                )
                .await
            {
                Ok(workflow) => {
                    debug!(
                        subject = context.subject(),
                        workflow_id = %workflow.id(),
                        approvers = ?approvers,
                        "escalated to approval workflow"
                    );
                    Decision::requires_approval(violations, approvers)
                        .with_workflow(workflow.id())
                }
                Err(err) => {
                    // Fail closed when the workflow cannot be opened.
                    warn!(
                        subject = context.subject(),
                        error = %err,
                        "workflow creation failed; denying"
                    );
                    let mut violations = violations;
                    violations.push(Violation::new(
                        "SYS-002",
                        "Approval workflow unavailable",
                        Severity::Critical,
                        format!("the approval workflow could not be opened: {err}"),
                        "Retry once the workflow store is reachable",
                    ));
                    Decision::deny(violations)
                }
            }
        } else if violations.is_empty() {
            debug!(subject = context.subject(), "request allowed");
            Decision::allow()
        } else {
            debug!(
                subject = context.subject(),
                violation_count = violations.len(),
                "findings recorded audit-only"
            );
            Decision::audit_only(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Verdict;
    use chrono::Duration;
    use governance_approvals::{ApprovalError, ApprovalResult, ApprovalWorkflow, WorkflowState};
    use governance_approvals::{Resolution, WorkflowStore};
    use governance_primitives::WorkflowId;

    fn violation(id: &str, severity: Severity) -> Violation {
        Violation::new(id, id, severity, "unmet requirement", "remediate")
    }

    fn engine() -> DecisionEngine {
        DecisionEngine::new(Arc::new(ApprovalManager::in_memory()))
    }

    fn context(environment: Environment) -> DecisionContext {
        DecisionContext::new("storage-account/stdata01", environment)
    }

    #[tokio::test]
    async fn critical_violation_denies_regardless_of_others() {
        let violations = vec![
            violation("TAG-001", Severity::Low),
            violation("ENC-001", Severity::Critical),
            violation("NET-001", Severity::High),
        ];

        let decision = engine()
            .decide(violations, &context(Environment::Development))
            .await;
        assert_eq!(decision.verdict(), Verdict::Deny);
        assert_eq!(decision.violations().len(), 3);
        assert!(decision.workflow_id().is_none());
    }

    #[tokio::test]
    async fn critical_dominates_production_escalation() {
        let decision = engine()
            .decide(
                vec![violation("ENC-001", Severity::Critical)],
                &context(Environment::Production),
            )
            .await;
        assert_eq!(decision.verdict(), Verdict::Deny);
    }

    #[tokio::test]
    async fn high_violation_escalates_with_workflow() {
        let engine = engine();
        let decision = engine
            .decide(
                vec![violation("NET-001", Severity::High)],
                &context(Environment::Development),
            )
            .await;

        assert_eq!(decision.verdict(), Verdict::RequiresApproval);
        assert_eq!(
            decision.required_approvers(),
            ["compliance-review", "security-review"]
        );

        let id = decision.workflow_id().expect("workflow opened");
        let workflow = engine.approvals().get(id).await.unwrap();
        assert_eq!(workflow.state(), WorkflowState::Pending);
        assert_eq!(
            workflow.expires_at() - workflow.created_at(),
            Duration::hours(24)
        );
        assert_eq!(workflow.violations().len(), 1);
    }

    #[tokio::test]
    async fn production_escalates_even_without_violations() {
        let decision = engine()
            .decide(Vec::new(), &context(Environment::Production))
            .await;

        assert_eq!(decision.verdict(), Verdict::RequiresApproval);
        assert_eq!(
            decision.required_approvers(),
            ["change-advisory-board", "team-lead"]
        );
        assert!(decision.workflow_id().is_some());
    }

    #[tokio::test]
    async fn medium_findings_are_audit_only() {
        let decision = engine()
            .decide(
                vec![violation("ENC-004", Severity::Medium)],
                &context(Environment::Development),
            )
            .await;

        assert_eq!(decision.verdict(), Verdict::AuditOnly);
        assert!(decision.permits_provisioning());
    }

    #[tokio::test]
    async fn clean_request_is_allowed() {
        let decision = engine()
            .decide(Vec::new(), &context(Environment::Development))
            .await;
        assert_eq!(decision.verdict(), Verdict::Allow);
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl WorkflowStore for FailingStore {
        async fn insert(&self, _workflow: ApprovalWorkflow) -> ApprovalResult<()> {
            Err(ApprovalError::store("backend offline"))
        }

        async fn get(&self, _id: WorkflowId) -> ApprovalResult<Option<ApprovalWorkflow>> {
            Err(ApprovalError::store("backend offline"))
        }

        async fn list(&self) -> ApprovalResult<Vec<ApprovalWorkflow>> {
            Err(ApprovalError::store("backend offline"))
        }

        async fn compare_and_transition(
            &self,
            _id: WorkflowId,
            _expected: WorkflowState,
            _next: WorkflowState,
            _resolution: Option<Resolution>,
        ) -> ApprovalResult<ApprovalWorkflow> {
            Err(ApprovalError::store("backend offline"))
        }
    }

    #[tokio::test]
    async fn store_failure_degrades_escalation_to_deny() {
        let engine = DecisionEngine::new(Arc::new(ApprovalManager::new(Arc::new(FailingStore))));
        let decision = engine
            .decide(
                vec![violation("NET-001", Severity::High)],
                &context(Environment::Development),
            )
            .await;

        assert_eq!(decision.verdict(), Verdict::Deny);
        assert!(decision
            .violations()
            .iter()
            .any(|v| v.policy_id() == "SYS-002" && v.severity() == Severity::Critical));
    }
}
