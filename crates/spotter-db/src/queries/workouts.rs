//! Database query functions for the `workouts` (training day) table.

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{RepoError, Result};
use crate::models::Workout;

/// Minimum length of a day name, after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// Append a new day to a plan. The name must be at least
/// [`MIN_NAME_LEN`] characters after trimming. Days carry no order
/// column; insertion order is display order.
pub async fn insert_workout(pool: &PgPool, plan_id: Uuid, name: &str) -> Result<Workout> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(RepoError::Validation(format!(
            "day name must be at least {MIN_NAME_LEN} characters"
        )));
    }

    let workout = sqlx::query_as::<_, Workout>(
        "INSERT INTO workouts (workout_plan_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(plan_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(workout)
}

/// Rename a day. A blank name after trimming is treated as a cancelled
/// edit: no store call is made and `false` is returned. Returns `true`
/// when the update was applied.
pub async fn rename_workout(pool: &PgPool, workout_id: Uuid, name: &str) -> Result<bool> {
    let name = name.trim();
    if name.is_empty() {
        debug!(workout = %workout_id, "blank rename treated as cancel");
        return Ok(false);
    }

    let result = sqlx::query("UPDATE workouts SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(workout_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("workout {workout_id}")));
    }

    Ok(true)
}

/// Delete a day. Cascades to its exercises at the store level.
pub async fn delete_workout(pool: &PgPool, workout_id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
        .bind(workout_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("workout {workout_id}")));
    }

    Ok(())
}
