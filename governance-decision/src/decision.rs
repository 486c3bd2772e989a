//! Decision types produced by the engine.

use governance_primitives::{Violation, WorkflowId};
use serde::{Deserialize, Serialize};

/// Aggregate verdict for a governed request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No findings; provisioning may proceed.
    Allow,
    /// At least one critical violation; provisioning must not proceed.
    Deny,
    /// Human sign-off is required before provisioning.
    RequiresApproval,
    /// Non-blocking findings recorded for later review; provisioning may
    /// proceed.
    AuditOnly,
}

/// Structured decision emitted by the decision engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decision {
    verdict: Verdict,
    violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    required_approvers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workflow_id: Option<WorkflowId>,
}

impl Decision {
    /// Returns an allow decision with no findings.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            verdict: Verdict::Allow,
            violations: Vec::new(),
            required_approvers: Vec::new(),
            workflow_id: None,
        }
    }

    /// Returns a deny decision carrying the blocking violations.
    #[must_use]
    pub fn deny(violations: Vec<Violation>) -> Self {
        Self {
            verdict: Verdict::Deny,
            violations,
            required_approvers: Vec::new(),
            workflow_id: None,
        }
    }

    /// Returns an audit-only decision carrying the recorded findings.
    #[must_use]
    pub fn audit_only(violations: Vec<Violation>) -> Self {
        Self {
            verdict: Verdict::AuditOnly,
            violations,
            required_approvers: Vec::new(),
            workflow_id: None,
        }
    }

    /// Returns a requires-approval decision with the approver groups that
    /// must sign off.
    #[must_use]
    pub fn requires_approval(violations: Vec<Violation>, approvers: Vec<String>) -> Self {
        Self {
            verdict: Verdict::RequiresApproval,
            violations,
            required_approvers: approvers,
            workflow_id: None,
        }
    }

    /// Attaches the approval workflow opened for this decision.
    #[must_use]
    pub fn with_workflow(mut self, id: WorkflowId) -> Self {
        self.workflow_id = Some(id);
        self
    }

    /// Returns the verdict.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Violations that produced the verdict.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Approver groups required for an escalated decision.
    #[must_use]
    pub fn required_approvers(&self) -> &[String] {
        &self.required_approvers
    }

    /// Identifier of the approval workflow opened for this decision.
    #[must_use]
    pub fn workflow_id(&self) -> Option<WorkflowId> {
        self.workflow_id
    }

    /// Returns `true` when the decision allows the request outright.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.verdict == Verdict::Allow
    }

    /// Returns `true` when the decision blocks the request.
    #[must_use]
    pub fn is_deny(&self) -> bool {
        self.verdict == Verdict::Deny
    }

    /// Returns `true` when human sign-off is required.
    #[must_use]
    pub fn is_requires_approval(&self) -> bool {
        self.verdict == Verdict::RequiresApproval
    }

    /// Returns `true` when a provisioning executor may proceed, which it does
    /// only on allow and audit-only verdicts.
    #[must_use]
    pub fn permits_provisioning(&self) -> bool {
        matches!(self.verdict, Verdict::Allow | Verdict::AuditOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governance_primitives::Severity;

    #[test]
    fn verdict_helpers_work() {
        assert!(Decision::allow().is_allow());
        assert!(Decision::allow().permits_provisioning());

        let deny = Decision::deny(vec![Violation::new(
            "ENC-001",
            "FIPS",
            Severity::Critical,
            "missing",
            "enable",
        )]);
        assert!(deny.is_deny());
        assert!(!deny.permits_provisioning());

        let audit = Decision::audit_only(Vec::new());
        assert!(audit.permits_provisioning());
    }

    #[test]
    fn workflow_attachment_round_trips() {
        let id = WorkflowId::random();
        let decision =
            Decision::requires_approval(Vec::new(), vec!["team-lead".into()]).with_workflow(id);

        assert!(decision.is_requires_approval());
        assert_eq!(decision.workflow_id(), Some(id));
        assert_eq!(decision.required_approvers(), ["team-lead"]);
    }
}
