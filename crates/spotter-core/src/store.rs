//! The `PlanStore` trait -- the editor's seam to the plan repository.
//!
//! `PgPlanStore` is the production implementation over a PostgreSQL pool.
//! Tests substitute their own implementation to inject failures (the
//! reorder-rollback path is only reachable that way).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use spotter_db::RepoError;
use spotter_db::models::{ExerciseDefinition, ExercisePatch, PlanTree, Workout, WorkoutPlan};
use spotter_db::queries::{exercises, plans, workout_exercises, workouts};

/// Repository operations the plan editor drives.
///
/// Object-safe so alternative backends (or mocks) can be boxed behind it.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Composed read of a client's active plan tree, or `None`.
    async fn get_active_plan(&self, client_id: Uuid) -> Result<Option<PlanTree>, RepoError>;

    /// Create a new active plan with the default title.
    async fn create_plan(&self, client_id: Uuid) -> Result<WorkoutPlan, RepoError>;

    /// Delete a plan and, via cascade, its days and exercises.
    async fn delete_plan(&self, plan_id: Uuid) -> Result<(), RepoError>;

    /// Append a day. The name must be valid per the repository contract.
    async fn create_workout(&self, plan_id: Uuid, name: &str) -> Result<Workout, RepoError>;

    /// Rename a day; blank names are a no-op returning `false`.
    async fn rename_workout(&self, workout_id: Uuid, name: &str) -> Result<bool, RepoError>;

    /// Delete a day and its exercises.
    async fn delete_workout(&self, workout_id: Uuid) -> Result<(), RepoError>;

    /// The full exercise catalog for the picker.
    async fn list_definitions(&self) -> Result<Vec<ExerciseDefinition>, RepoError>;

    /// Bulk-append catalog exercises to a day.
    async fn add_exercises(
        &self,
        workout_id: Uuid,
        definition_ids: &[Uuid],
    ) -> Result<(), RepoError>;

    /// Patch an exercise's prescription fields.
    async fn update_exercise_fields(
        &self,
        id: Uuid,
        patch: &ExercisePatch,
    ) -> Result<(), RepoError>;

    /// Delete one exercise from its day.
    async fn delete_exercise(&self, id: Uuid) -> Result<(), RepoError>;

    /// Apply a full dense reordering as one logical operation.
    async fn reorder_exercises(&self, items: &[(Uuid, i32)]) -> Result<(), RepoError>;
}

/// PostgreSQL-backed [`PlanStore`] delegating to the query modules.
#[derive(Debug, Clone)]
pub struct PgPlanStore {
    pool: PgPool,
}

impl PgPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn get_active_plan(&self, client_id: Uuid) -> Result<Option<PlanTree>, RepoError> {
        plans::get_active_plan_by_uuid(&self.pool, client_id).await
    }

    async fn create_plan(&self, client_id: Uuid) -> Result<WorkoutPlan, RepoError> {
        plans::insert_plan(&self.pool, client_id).await
    }

    async fn delete_plan(&self, plan_id: Uuid) -> Result<(), RepoError> {
        plans::delete_plan(&self.pool, plan_id).await
    }

    async fn create_workout(&self, plan_id: Uuid, name: &str) -> Result<Workout, RepoError> {
        workouts::insert_workout(&self.pool, plan_id, name).await
    }

    async fn rename_workout(&self, workout_id: Uuid, name: &str) -> Result<bool, RepoError> {
        workouts::rename_workout(&self.pool, workout_id, name).await
    }

    async fn delete_workout(&self, workout_id: Uuid) -> Result<(), RepoError> {
        workouts::delete_workout(&self.pool, workout_id).await
    }

    async fn list_definitions(&self) -> Result<Vec<ExerciseDefinition>, RepoError> {
        exercises::list_exercise_definitions(&self.pool).await
    }

    async fn add_exercises(
        &self,
        workout_id: Uuid,
        definition_ids: &[Uuid],
    ) -> Result<(), RepoError> {
        workout_exercises::add_exercises_to_workout(&self.pool, workout_id, definition_ids)
            .await
            .map(|_| ())
    }

    async fn update_exercise_fields(
        &self,
        id: Uuid,
        patch: &ExercisePatch,
    ) -> Result<(), RepoError> {
        workout_exercises::update_exercise_fields(&self.pool, id, patch).await
    }

    async fn delete_exercise(&self, id: Uuid) -> Result<(), RepoError> {
        workout_exercises::delete_workout_exercise(&self.pool, id).await
    }

    async fn reorder_exercises(&self, items: &[(Uuid, i32)]) -> Result<(), RepoError> {
        workout_exercises::reorder_exercises(&self.pool, items).await
    }
}

// Compile-time assertion: PlanStore must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanStore) {}
};
