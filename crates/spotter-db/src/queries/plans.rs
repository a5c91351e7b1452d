//! Database query functions for the `workout_plans` table, including the
//! composed active-plan tree read.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{RepoError, Result};
use crate::models::{ExerciseWithDefinition, PlanTree, Workout, WorkoutPlan, WorkoutWithExercises};

/// Validate a client id as it arrives from the presentation layer.
///
/// Rejects empty strings, the literal `"undefined"` placeholder, and
/// anything that does not parse as a UUID -- all before any store call.
pub fn parse_client_id(raw: &str) -> Result<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "undefined" {
        return Err(RepoError::InvalidArgument(raw.to_owned()));
    }
    Uuid::parse_str(raw).map_err(|_| RepoError::InvalidArgument(raw.to_owned()))
}

/// Fetch a client's active plan with nested days and exercises.
///
/// Returns `None` when the client has no active plan (not an error).
/// Days come back sorted by `(created_at, id)` ascending; within each day,
/// exercises sorted by `position` ascending. Each exercise carries its
/// definition's current name for two-source display-name resolution.
pub async fn get_active_plan(pool: &PgPool, client_id: &str) -> Result<Option<PlanTree>> {
    let client_id = parse_client_id(client_id)?;
    get_active_plan_by_uuid(pool, client_id).await
}

/// Same as [`get_active_plan`] for an already-validated client id.
pub async fn get_active_plan_by_uuid(pool: &PgPool, client_id: Uuid) -> Result<Option<PlanTree>> {
    let plan = sqlx::query_as::<_, WorkoutPlan>(
        "SELECT * FROM workout_plans WHERE client_id = $1 AND is_active",
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    let Some(plan) = plan else {
        return Ok(None);
    };

    let workouts = sqlx::query_as::<_, Workout>(
        "SELECT * FROM workouts WHERE workout_plan_id = $1 \
         ORDER BY created_at ASC, id ASC",
    )
    .bind(plan.id)
    .fetch_all(pool)
    .await?;

    let workout_ids: Vec<Uuid> = workouts.iter().map(|w| w.id).collect();

    let exercises = sqlx::query_as::<_, ExerciseWithDefinition>(
        "SELECT we.*, ed.name AS definition_name \
         FROM workout_exercises we \
         LEFT JOIN exercise_definitions ed ON ed.id = we.exercise_definition_id \
         WHERE we.workout_id = ANY($1) \
         ORDER BY we.position ASC",
    )
    .bind(&workout_ids)
    .fetch_all(pool)
    .await?;

    // Group exercises under their day, preserving the per-day position sort.
    let mut by_workout: HashMap<Uuid, Vec<ExerciseWithDefinition>> = HashMap::new();
    for entry in exercises {
        by_workout
            .entry(entry.exercise.workout_id)
            .or_default()
            .push(entry);
    }

    let workouts = workouts
        .into_iter()
        .map(|workout| {
            let exercises = by_workout.remove(&workout.id).unwrap_or_default();
            WorkoutWithExercises { workout, exercises }
        })
        .collect();

    debug!(client = %client_id, plan = %plan.id, "loaded active plan tree");

    Ok(Some(PlanTree { plan, workouts }))
}

/// Insert a new active plan for a client with the default title.
///
/// The store enforces at most one active plan per client; a second insert
/// surfaces as a constraint violation ([`RepoError::Store`]).
pub async fn insert_plan(pool: &PgPool, client_id: Uuid) -> Result<WorkoutPlan> {
    let plan = sqlx::query_as::<_, WorkoutPlan>(
        "INSERT INTO workout_plans (client_id) VALUES ($1) RETURNING *",
    )
    .bind(client_id)
    .fetch_one(pool)
    .await?;

    Ok(plan)
}

/// Delete a plan. Cascades to its workouts and their exercises.
pub async fn delete_plan(pool: &PgPool, plan_id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM workout_plans WHERE id = $1")
        .bind(plan_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("plan {plan_id}")));
    }

    Ok(())
}
