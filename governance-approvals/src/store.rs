//! Injected persistence abstraction for workflow records.

use std::collections::HashMap;

use async_trait::async_trait;
use governance_primitives::WorkflowId;
use tokio::sync::RwLock;

use crate::workflow::{ApprovalWorkflow, Resolution, WorkflowState};
use crate::{ApprovalError, ApprovalResult};

/// Trait implemented by workflow persistence backends.
///
/// Durable cross-restart persistence is an external concern; the contract
/// only requires atomic insert/read/compare-and-transition semantics within
/// one process.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Inserts a freshly opened workflow record.
    async fn insert(&self, workflow: ApprovalWorkflow) -> ApprovalResult<()>;

    /// Returns the record for the identifier, if one exists.
    async fn get(&self, id: WorkflowId) -> ApprovalResult<Option<ApprovalWorkflow>>;

    /// Returns every stored record, in no particular order.
    async fn list(&self) -> ApprovalResult<Vec<ApprovalWorkflow>>;

    /// Atomically moves the record from `expected` to `next`, recording the
    /// resolution when one is supplied.
    ///
    /// The state check and the mutation happen under one writer; of two
    /// concurrent transitions on the same record, exactly one observes
    /// `expected` and wins.
    async fn compare_and_transition(
        &self,
        id: WorkflowId,
        expected: WorkflowState,
        next: WorkflowState,
        resolution: Option<Resolution>,
    ) -> ApprovalResult<ApprovalWorkflow>;
}

/// Process-local store backed by a single writer lock over a hash map.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<WorkflowId, ApprovalWorkflow>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowStore for InMemoryStore {
    async fn insert(&self, workflow: ApprovalWorkflow) -> ApprovalResult<()> {
        let mut guard = self.records.write().await;
        guard.insert(workflow.id(), workflow);
        Ok(())
    }

    async fn get(&self, id: WorkflowId) -> ApprovalResult<Option<ApprovalWorkflow>> {
        let guard = self.records.read().await;
        Ok(guard.get(&id).cloned())
    }

    async fn list(&self) -> ApprovalResult<Vec<ApprovalWorkflow>> {
        let guard = self.records.read().await;
        Ok(guard.values().cloned().collect())
    }

    async fn compare_and_transition(
        &self,
        id: WorkflowId,
        expected: WorkflowState,
        next: WorkflowState,
        resolution: Option<Resolution>,
    ) -> ApprovalResult<ApprovalWorkflow> {
        let mut guard = self.records.write().await;
        let record = guard.get_mut(&id).ok_or(ApprovalError::NotFound(id))?;

        if record.state() != expected {
            return Err(ApprovalError::InvalidState {
                id,
                state: record.state(),
            });
        }

        record.apply_transition(next, resolution);
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn workflow() -> ApprovalWorkflow {
        ApprovalWorkflow::open(
            "storage-account/stdevdata01",
            "test",
            Vec::new(),
            vec!["team-lead".into()],
            Duration::hours(24),
        )
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let store = InMemoryStore::new();
        let record = workflow();
        let id = record.id();

        store.insert(record).await.unwrap();
        let fetched = store.get(id).await.unwrap().expect("stored");
        assert_eq!(fetched.id(), id);
        assert!(fetched.state().is_pending());
    }

    #[tokio::test]
    async fn transition_requires_expected_state() {
        let store = InMemoryStore::new();
        let record = workflow();
        let id = record.id();
        store.insert(record).await.unwrap();

        store
            .compare_and_transition(
                id,
                WorkflowState::Pending,
                WorkflowState::Approved,
                Some(Resolution::new("alex", None)),
            )
            .await
            .unwrap();

        let err = store
            .compare_and_transition(id, WorkflowState::Pending, WorkflowState::Rejected, None)
            .await
            .expect_err("already approved");
        assert!(matches!(
            err,
            ApprovalError::InvalidState {
                state: WorkflowState::Approved,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn transition_on_missing_record_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .compare_and_transition(
                WorkflowId::random(),
                WorkflowState::Pending,
                WorkflowState::Expired,
                None,
            )
            .await
            .expect_err("missing");
        assert!(matches!(err, ApprovalError::NotFound(_)));
    }
}
