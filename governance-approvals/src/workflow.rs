//! Approval workflow records and states.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use governance_primitives::{Violation, WorkflowId};
use serde::{Deserialize, Serialize};

/// States an approval workflow can occupy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Awaiting a human decision.
    Pending,
    /// Signed off; the gated request may proceed.
    Approved,
    /// Declined; the gated request must not proceed.
    Rejected,
    /// The deadline passed without a decision.
    Expired,
}

impl WorkflowState {
    /// Returns `true` while the workflow still accepts a decision.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` once the workflow can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Expired)
    }

    /// Returns the canonical label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

impl Display for WorkflowState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata recorded when a workflow leaves the pending state through a
/// human decision.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    actor: String,
    resolved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Resolution {
    /// Creates a resolution stamped with the current time.
    #[must_use]
    pub fn new(actor: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            actor: actor.into(),
            resolved_at: Utc::now(),
            comment,
        }
    }

    /// Identity of the person who resolved the workflow.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// When the resolution was recorded.
    #[must_use]
    pub fn resolved_at(&self) -> DateTime<Utc> {
        self.resolved_at
    }

    /// Optional free-text comment supplied by the resolver.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// A time-bounded human-sign-off record gating a governance decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalWorkflow {
    id: WorkflowId,
    subject: String,
    reason: String,
    state: WorkflowState,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    approvers: Vec<String>,
    violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resolution: Option<Resolution>,
}

impl ApprovalWorkflow {
    /// Opens a new pending workflow. The expiry is fixed here and never
    /// changes for the lifetime of the record.
    #[must_use]
    pub(crate) fn open(
        subject: impl Into<String>,
        reason: impl Into<String>,
        violations: Vec<Violation>,
        approvers: Vec<String>,
        ttl: Duration,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: WorkflowId::random(),
            subject: subject.into(),
            reason: reason.into(),
            state: WorkflowState::Pending,
            created_at,
            expires_at: created_at + ttl,
            approvers,
            violations,
            resolution: None,
        }
    }

    /// Unique workflow identifier.
    #[must_use]
    pub fn id(&self) -> WorkflowId {
        self.id
    }

    /// Reference to the governed subject (resource type and name).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Why the workflow was opened.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// When the workflow was opened.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Deadline after which the workflow can no longer be resolved.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Approver groups required to sign off.
    #[must_use]
    pub fn approvers(&self) -> &[String] {
        &self.approvers
    }

    /// Violations that triggered the workflow.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Resolution metadata, present once a human decided the workflow.
    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// Returns `true` when the workflow is still pending but its deadline has
    /// passed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.state.is_pending() && now >= self.expires_at
    }

    pub(crate) fn apply_transition(&mut self, next: WorkflowState, resolution: Option<Resolution>) {
        self.state = next;
        if resolution.is_some() {
            self.resolution = resolution;
        }
    }
}
