//! Policy violation records.

use serde::{Deserialize, Serialize};

use crate::Severity;

/// A single unmet policy requirement.
///
/// Violations are immutable value objects produced by validators and the rule
/// evaluator; the decision engine only ever reads them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    policy_id: String,
    name: String,
    severity: Severity,
    description: String,
    recommended_action: String,
}

impl Violation {
    /// Creates a new violation record.
    #[must_use]
    pub fn new(
        policy_id: impl Into<String>,
        name: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        recommended_action: impl Into<String>,
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            name: name.into(),
            severity,
            description: description.into(),
            recommended_action: recommended_action.into(),
        }
    }

    /// Stable identifier of the violated policy rule (e.g. `ENC-001`).
    #[must_use]
    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    /// Human-friendly rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Severity assigned to the rule.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Explanation of what was found unmet.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Remediation guidance for the requester.
    #[must_use]
    pub fn recommended_action(&self) -> &str {
        &self.recommended_action
    }
}
