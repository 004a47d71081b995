use std::sync::Arc;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::TrainerSession;
use crate::config::PlanConfig;
use crate::errors::PlanError;
use crate::models::{
    muscle_groups, CatalogFilter, CatalogPage, Exercise, WorkoutAssignment, WorkoutPlanEditor,
};
use crate::store::{StoreError, WorkoutPlanStore};

/// Loads editors and commits them as the student's complete plan.
#[derive(Clone)]
pub struct WorkoutPlanService {
    store: Arc<dyn WorkoutPlanStore>,
    config: PlanConfig,
}

impl WorkoutPlanService {
    pub fn new(store: Arc<dyn WorkoutPlanStore>, config: PlanConfig) -> Self {
        Self { store, config }
    }

    /// Exercise catalog ordered by muscle group then name, filtered locally.
    pub async fn catalog(
        &self,
        _session: &TrainerSession,
        filter: &CatalogFilter,
    ) -> Result<CatalogPage, PlanError> {
        let catalog = self.load_catalog().await?;
        let muscle_groups = muscle_groups(&catalog);
        let exercises = catalog.into_iter().filter(|e| filter.matches(e)).collect();

        Ok(CatalogPage {
            exercises,
            muscle_groups,
        })
    }

    /// Opens an editor for `student_id` with the catalog loaded once for the session.
    #[tracing::instrument(skip(self, session), fields(owner = %session.user_id))]
    pub async fn open_editor(
        &self,
        session: &TrainerSession,
        student_id: Uuid,
    ) -> Result<WorkoutPlanEditor, PlanError> {
        let catalog = self.load_catalog().await?;
        debug!(exercises = catalog.len(), "editor opened");
        Ok(WorkoutPlanEditor::new(student_id, catalog))
    }

    pub async fn current_plan(
        &self,
        session: &TrainerSession,
        student_id: Uuid,
    ) -> Result<Vec<WorkoutAssignment>, PlanError> {
        let plan = self
            .store
            .list_assignments(session.user_id, student_id)
            .await?;
        Ok(plan)
    }

    /// Replaces the student's plan with the editor's drafts.
    ///
    /// Nothing reaches the store when the editor is closed, empty or holds an invalid
    /// draft. Transient store failures are retried with the same idempotency key, so a
    /// write that landed before its response was lost is replayed rather than repeated.
    /// On success the editor is `Committed` and the stored plan is returned; on failure
    /// the editor keeps its drafts.
    #[tracing::instrument(
        skip(self, session, editor),
        fields(owner = %session.user_id, student_id = %editor.student_id())
    )]
    pub async fn commit(
        &self,
        session: &TrainerSession,
        editor: &mut WorkoutPlanEditor,
        idempotency_key: Option<Uuid>,
    ) -> Result<Vec<WorkoutAssignment>, PlanError> {
        let rows = editor.submission(self.config.weekly_sessions)?;
        let student_id = editor.student_id();
        let key = idempotency_key.unwrap_or_else(Uuid::new_v4);
        let max_attempts = self.config.commit_max_attempts.max(1);

        let mut attempt = 0;
        loop {
            attempt += 1;

            let outcome = match timeout(
                self.config.commit_timeout,
                self.store
                    .replace_plan(session.user_id, student_id, key, &rows),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout),
            };

            match outcome {
                Ok(plan) => {
                    editor.mark_committed();
                    info!(assignments = plan.len(), attempt, "workout plan replaced");
                    return Ok(plan);
                }
                Err(StoreError::NotFound) => {
                    return Err(PlanError::StudentNotFound(student_id));
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let backoff = self.config.commit_backoff * attempt;
                    warn!(attempt, ?backoff, "plan commit failed, retrying: {}", err);
                    sleep(backoff).await;
                }
                Err(err) => {
                    error!(attempt, "plan commit failed: {}", err);
                    return Err(PlanError::CommitFailed {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }

    async fn load_catalog(&self) -> Result<Vec<Exercise>, PlanError> {
        self.store.list_exercises().await.map_err(|err| {
            error!("failed to load exercise catalog: {}", err);
            PlanError::CatalogUnavailable(err)
        })
    }
}
