//! Approval workflow manager.

use std::sync::Arc;

use chrono::{Duration, Utc};
use governance_primitives::{Violation, WorkflowId};
use tracing::{debug, info, warn};

use crate::store::{InMemoryStore, WorkflowStore};
use crate::workflow::{ApprovalWorkflow, Resolution, WorkflowState};
use crate::{ApprovalError, ApprovalResult};

/// Configuration for workflow lifetimes.
#[derive(Clone, Copy, Debug)]
pub struct ApprovalConfig {
    ttl: Duration,
}

impl ApprovalConfig {
    /// Creates a configuration with the supplied time-to-live.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Returns the configured time-to-live.
    #[must_use]
    pub const fn ttl(self) -> Duration {
        self.ttl
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidRequest`] when the time-to-live is not
    /// positive.
    pub fn validate(self) -> ApprovalResult<()> {
        if self.ttl <= Duration::zero() {
            return Err(ApprovalError::InvalidRequest(
                "workflow ttl must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(24),
        }
    }
}

/// Filter applied when listing pending workflows.
#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    subject_contains: Option<String>,
    limit: Option<usize>,
}

impl ListFilter {
    /// Matches every pending workflow.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restricts results to workflows whose subject contains the fragment.
    #[must_use]
    pub fn subject_contains(mut self, fragment: impl Into<String>) -> Self {
        self.subject_contains = Some(fragment.into());
        self
    }

    /// Caps the number of returned workflows.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, workflow: &ApprovalWorkflow) -> bool {
        self.subject_contains
            .as_deref()
            .is_none_or(|fragment| workflow.subject().contains(fragment))
    }
}

/// Owns workflow records and their state transitions.
///
/// Records stay in the injected store for the process lifetime; transitions
/// out of pending happen exactly once per record, first writer wins.
pub struct ApprovalManager {
    store: Arc<dyn WorkflowStore>,
    config: ApprovalConfig,
}

impl ApprovalManager {
    /// Creates a manager over the supplied store with the default 24 hour
    /// time-to-live.
    #[must_use]
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self {
            store,
            config: ApprovalConfig::default(),
        }
    }

    /// Creates a manager backed by the in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Replaces the lifetime configuration.
    #[must_use]
    pub fn with_config(mut self, config: ApprovalConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens a pending workflow for the supplied subject.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidRequest`] when the subject is blank or
    /// no approvers were supplied, and propagates store failures.
    pub async fn create(
        &self,
        subject: impl Into<String>,
        reason: impl Into<String>,
        violations: Vec<Violation>,
        approvers: Vec<String>,
    ) -> ApprovalResult<ApprovalWorkflow> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ApprovalError::InvalidRequest("subject cannot be empty"));
        }
        if approvers.is_empty() {
            return Err(ApprovalError::InvalidRequest(
                "at least one approver is required",
            ));
        }
        self.config.validate()?;

        let workflow =
            ApprovalWorkflow::open(subject, reason, violations, approvers, self.config.ttl());
        self.store.insert(workflow.clone()).await?;

        info!(
            workflow_id = %workflow.id(),
            subject = workflow.subject(),
            expires_at = %workflow.expires_at(),
            "approval workflow opened"
        );
        Ok(workflow)
    }

    /// Approves a pending workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for unknown identifiers,
    /// [`ApprovalError::Expired`] when the deadline passed (flipping the
    /// record to expired as a side effect), and
    /// [`ApprovalError::InvalidState`] when the workflow already resolved.
    pub async fn approve(
        &self,
        id: WorkflowId,
        actor: impl Into<String>,
        comment: Option<String>,
    ) -> ApprovalResult<ApprovalWorkflow> {
        let actor = actor.into();
        self.check_resolvable(id).await?;

        let updated = self
            .store
            .compare_and_transition(
                id,
                WorkflowState::Pending,
                WorkflowState::Approved,
                Some(Resolution::new(actor.clone(), comment)),
            )
            .await?;

        info!(workflow_id = %id, actor, "workflow approved");
        Ok(updated)
    }

    /// Rejects a pending workflow with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Same contract as [`ApprovalManager::approve`].
    pub async fn reject(
        &self,
        id: WorkflowId,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> ApprovalResult<ApprovalWorkflow> {
        let actor = actor.into();
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ApprovalError::InvalidRequest(
                "a rejection reason is required",
            ));
        }
        self.check_resolvable(id).await?;

        let updated = self
            .store
            .compare_and_transition(
                id,
                WorkflowState::Pending,
                WorkflowState::Rejected,
                Some(Resolution::new(actor.clone(), Some(reason))),
            )
            .await?;

        info!(workflow_id = %id, actor, "workflow rejected");
        Ok(updated)
    }

    /// Returns the workflow, lazily flipping it to expired when its deadline
    /// has passed.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::NotFound`] for unknown identifiers and
    /// propagates store failures.
    pub async fn get(&self, id: WorkflowId) -> ApprovalResult<ApprovalWorkflow> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(ApprovalError::NotFound(id))?;

        if !record.is_expired_at(Utc::now()) {
            return Ok(record);
        }

        match self.expire(id).await {
            Ok(expired) => Ok(expired),
            // Lost the race to a concurrent resolution; re-read the winner.
            Err(ApprovalError::InvalidState { .. }) => self
                .store
                .get(id)
                .await?
                .ok_or(ApprovalError::NotFound(id)),
            Err(err) => Err(err),
        }
    }

    /// Lists pending, unexpired workflows, most recently created first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self, filter: &ListFilter) -> ApprovalResult<Vec<ApprovalWorkflow>> {
        let now = Utc::now();
        let mut pending: Vec<ApprovalWorkflow> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|w| w.state().is_pending() && w.expires_at() > now)
            .filter(|w| filter.matches(w))
            .collect();

        pending.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        if let Some(limit) = filter.limit {
            pending.truncate(limit);
        }

        debug!(count = pending.len(), "listed pending workflows");
        Ok(pending)
    }

    /// Fails with [`ApprovalError::Expired`] or
    /// [`ApprovalError::InvalidState`] when the workflow cannot be resolved,
    /// flipping past-deadline records to expired on the way.
    async fn check_resolvable(&self, id: WorkflowId) -> ApprovalResult<()> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(ApprovalError::NotFound(id))?;

        if record.state().is_terminal() {
            return Err(ApprovalError::InvalidState {
                id,
                state: record.state(),
            });
        }

        if record.is_expired_at(Utc::now()) {
            self.expire(id).await?;
            warn!(workflow_id = %id, "resolution attempted after expiry");
            return Err(ApprovalError::Expired(id));
        }

        Ok(())
    }

    async fn expire(&self, id: WorkflowId) -> ApprovalResult<ApprovalWorkflow> {
        let expired = self
            .store
            .compare_and_transition(id, WorkflowState::Pending, WorkflowState::Expired, None)
            .await?;
        info!(workflow_id = %id, "workflow expired");
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governance_primitives::Severity;

    fn manager() -> ApprovalManager {
        ApprovalManager::in_memory()
    }

    fn expired_manager() -> ApprovalManager {
        ApprovalManager::in_memory().with_config(ApprovalConfig::new(Duration::milliseconds(1)))
    }

    async fn wait_past_deadline() {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    fn violation() -> Violation {
        Violation::new(
            "NET-001",
            "Public network access disabled",
            Severity::High,
            "public network access is not addressed",
            "disable public network access",
        )
    }

    async fn open(manager: &ApprovalManager) -> ApprovalWorkflow {
        manager
            .create(
                "key-vault/kv-prod-core",
                "production deployment requires sign-off",
                vec![violation()],
                vec!["security-review".into(), "compliance-review".into()],
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn created_workflow_has_24h_expiry_by_default() {
        let workflow = open(&manager()).await;
        assert_eq!(
            workflow.expires_at() - workflow.created_at(),
            Duration::hours(24)
        );
        assert!(workflow.state().is_pending());
    }

    #[tokio::test]
    async fn create_requires_subject_and_approvers() {
        let manager = manager();
        let err = manager
            .create("  ", "reason", Vec::new(), vec!["team-lead".into()])
            .await
            .expect_err("blank subject");
        assert!(matches!(err, ApprovalError::InvalidRequest(_)));

        let err = manager
            .create("subject", "reason", Vec::new(), Vec::new())
            .await
            .expect_err("no approvers");
        assert!(matches!(err, ApprovalError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn approve_resolves_pending_workflow() {
        let manager = manager();
        let workflow = open(&manager).await;

        let approved = manager
            .approve(workflow.id(), "alex", Some("looks good".into()))
            .await
            .unwrap();

        assert_eq!(approved.state(), WorkflowState::Approved);
        let resolution = approved.resolution().expect("resolution");
        assert_eq!(resolution.actor(), "alex");
        assert_eq!(resolution.comment(), Some("looks good"));
    }

    #[tokio::test]
    async fn resolving_terminal_workflow_is_invalid_state() {
        let manager = manager();
        let workflow = open(&manager).await;
        manager.approve(workflow.id(), "alex", None).await.unwrap();

        let err = manager
            .reject(workflow.id(), "sam", "changed my mind")
            .await
            .expect_err("already approved");
        assert!(matches!(
            err,
            ApprovalError::InvalidState {
                state: WorkflowState::Approved,
                ..
            }
        ));

        // The record did not move.
        let fetched = manager.get(workflow.id()).await.unwrap();
        assert_eq!(fetched.state(), WorkflowState::Approved);
    }

    #[tokio::test]
    async fn approve_after_expiry_flips_then_fails() {
        let manager = expired_manager();
        let workflow = open(&manager).await;
        wait_past_deadline().await;

        let err = manager
            .approve(workflow.id(), "alex", None)
            .await
            .expect_err("expired");
        assert!(matches!(err, ApprovalError::Expired(_)));

        let fetched = manager.get(workflow.id()).await.unwrap();
        assert_eq!(fetched.state(), WorkflowState::Expired);

        // A second attempt sees the terminal state, not another expiry.
        let err = manager
            .approve(workflow.id(), "alex", None)
            .await
            .expect_err("terminal");
        assert!(matches!(
            err,
            ApprovalError::InvalidState {
                state: WorkflowState::Expired,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn get_lazily_expires_past_deadline_records() {
        let manager = expired_manager();
        let workflow = open(&manager).await;
        wait_past_deadline().await;

        let fetched = manager.get(workflow.id()).await.unwrap();
        assert_eq!(fetched.state(), WorkflowState::Expired);
    }

    #[tokio::test]
    async fn list_returns_recent_pending_first() {
        let manager = manager();
        let first = open(&manager).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = open(&manager).await;

        let listed = manager.list(&ListFilter::any()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id(), second.id());
        assert_eq!(listed[1].id(), first.id());

        let limited = manager.list(&ListFilter::any().limit(1)).await.unwrap();
        assert_eq!(limited.len(), 1);

        let filtered = manager
            .list(&ListFilter::any().subject_contains("kv-prod"))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[tokio::test]
    async fn expired_workflows_are_not_listed() {
        let manager = expired_manager();
        open(&manager).await;
        wait_past_deadline().await;

        let listed = manager.list(&ListFilter::any()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn concurrent_approvals_have_single_winner() {
        let manager = Arc::new(manager());
        let workflow = open(&manager).await;
        let id = workflow.id();

        let first = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.approve(id, "alex", None).await })
        };
        let second = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.approve(id, "sam", None).await })
        };

        let (first, second) = tokio::join!(first, second);
        let outcomes = [first.unwrap(), second.unwrap()];
        let winners = outcomes.iter().filter(|o| o.is_ok()).count();

        assert_eq!(winners, 1, "exactly one approval must win: {outcomes:?}");
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, Err(ApprovalError::InvalidState { .. }))));

        let fetched = manager.get(id).await.unwrap();
        assert_eq!(fetched.state(), WorkflowState::Approved);
    }
}
