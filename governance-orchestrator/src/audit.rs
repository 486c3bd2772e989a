//! Fire-and-forget audit sink for governance decisions.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use governance_decision::Verdict;
use governance_primitives::{Environment, WorkflowId};
use serde::Serialize;
use tracing::{info, warn};

/// One decision, as recorded for the audit trail.
#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    subject: String,
    environment: Environment,
    verdict: Verdict,
    violation_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    workflow_id: Option<WorkflowId>,
    occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        environment: Environment,
        verdict: Verdict,
        violation_count: usize,
        workflow_id: Option<WorkflowId>,
    ) -> Self {
        Self {
            subject: subject.into(),
            environment,
            verdict,
            violation_count,
            workflow_id,
            occurred_at: Utc::now(),
        }
    }

    /// Subject the decision was made for.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Verdict that was recorded.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Number of violations behind the verdict.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violation_count
    }

    /// Workflow opened for the decision, if any.
    #[must_use]
    pub fn workflow_id(&self) -> Option<WorkflowId> {
        self.workflow_id
    }
}

/// Write-only sink receiving one event per evaluation. Implementations must
/// not block the decision path; delivery is fire-and-forget.
pub trait AuditSink: Send + Sync {
    /// Records the supplied event.
    fn record(&self, event: AuditEvent);
}

/// Sink that logs audit events through the tracing system.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_else(|_| String::new());
        match event.verdict() {
            Verdict::Allow | Verdict::AuditOnly => {
                info!(subject = event.subject(), payload = %payload, "governance decision");
            }
            Verdict::Deny | Verdict::RequiresApproval => {
                warn!(subject = event.subject(), payload = %payload, "governance decision");
            }
        }
    }
}

/// Sink used in tests to capture emitted events.
#[derive(Debug, Default)]
pub struct CollectingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl CollectingAuditSink {
    /// Creates a new collecting sink behind an `Arc`.
    #[must_use]
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::default())
    }

    /// Returns and clears the collected events.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex has been poisoned by a previous panic.
    #[must_use]
    pub fn drain(&self) -> Vec<AuditEvent> {
        let mut guard = self.events.lock().expect("audit sink poisoned");
        guard.drain(..).collect()
    }
}

impl AuditSink for CollectingAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().expect("audit sink poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_captures_events() {
        let sink = CollectingAuditSink::new();
        sink.record(AuditEvent::new(
            "storage-account/stdata01",
            Environment::Development,
            Verdict::Allow,
            0,
            None,
        ));

        let events = sink.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].verdict(), Verdict::Allow);
        assert!(sink.drain().is_empty());
    }
}
