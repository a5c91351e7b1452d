//! Database query functions for the `workout_exercises` table.
//!
//! Everything here preserves the dense-position invariant: for a workout
//! with N exercises, positions are exactly `{1..N}` after every successful
//! mutation. Appends extend the sequence, deletes close the gap, and
//! reorders apply a full permutation in a single statement.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::error::{RepoError, Result};
use crate::models::{ExercisePatch, WorkoutExercise};

/// Append exercises from the catalog to a day.
///
/// Each id is resolved to its definition; if any id has no matching
/// definition the whole call fails with [`RepoError::NotFound`] and
/// nothing is inserted. New rows get consecutive positions starting at
/// the current maximum plus one, preserving the input list's order.
/// An empty id list is a no-op.
pub async fn add_exercises_to_workout(
    pool: &PgPool,
    workout_id: Uuid,
    definition_ids: &[Uuid],
) -> Result<Vec<WorkoutExercise>> {
    if definition_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = pool.begin().await?;

    // Lock the parent row so concurrent appends to the same day cannot
    // read the same max position. Also validates the day exists.
    let found: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM workouts WHERE id = $1 FOR UPDATE")
            .bind(workout_id)
            .fetch_optional(&mut *tx)
            .await?;
    if found.is_none() {
        return Err(RepoError::NotFound(format!("workout {workout_id}")));
    }

    // Resolve every definition; order of the result set is arbitrary.
    let definitions: Vec<(Uuid, String)> =
        sqlx::query_as("SELECT id, name FROM exercise_definitions WHERE id = ANY($1)")
            .bind(definition_ids)
            .fetch_all(&mut *tx)
            .await?;

    if let Some(missing) = definition_ids
        .iter()
        .find(|id| !definitions.iter().any(|(found, _)| found == *id))
    {
        return Err(RepoError::NotFound(format!("exercise definition {missing}")));
    }

    let max_position: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position), 0) FROM workout_exercises WHERE workout_id = $1",
    )
    .bind(workout_id)
    .fetch_one(&mut *tx)
    .await?;

    let mut inserted = Vec::with_capacity(definition_ids.len());
    for (offset, definition_id) in definition_ids.iter().enumerate() {
        // Every id was verified present above.
        let name = definitions
            .iter()
            .find(|(id, _)| id == definition_id)
            .map(|(_, name)| name.as_str())
            .unwrap_or_default();

        let row = sqlx::query_as::<_, WorkoutExercise>(
            "INSERT INTO workout_exercises (workout_id, exercise_definition_id, name, position) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(workout_id)
        .bind(definition_id)
        .bind(name)
        .bind(max_position + offset as i32 + 1)
        .fetch_one(&mut *tx)
        .await?;

        inserted.push(row);
    }

    tx.commit().await?;

    debug!(
        workout = %workout_id,
        count = inserted.len(),
        "appended exercises"
    );

    Ok(inserted)
}

/// Update only the supplied prescription fields of an exercise.
///
/// A patch with no fields set is a no-op. Fails with
/// [`RepoError::NotFound`] if the exercise does not exist.
pub async fn update_exercise_fields(
    pool: &PgPool,
    id: Uuid,
    patch: &ExercisePatch,
) -> Result<()> {
    if patch.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("UPDATE workout_exercises SET ");

    let mut set = builder.separated(", ");
    if let Some(sets) = &patch.sets {
        set.push("sets = ").push_bind_unseparated(sets);
    }
    if let Some(reps) = &patch.reps {
        set.push("reps = ").push_bind_unseparated(reps);
    }
    if let Some(tempo) = &patch.tempo {
        set.push("tempo = ").push_bind_unseparated(tempo);
    }
    if let Some(rest_period) = &patch.rest_period {
        set.push("rest_period = ").push_bind_unseparated(rest_period);
    }
    if let Some(notes) = &patch.notes {
        set.push("notes = ").push_bind_unseparated(notes);
    }

    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("workout exercise {id}")));
    }

    Ok(())
}

/// Delete an exercise from its day, then close the gap so the remaining
/// positions are dense again.
pub async fn delete_workout_exercise(pool: &PgPool, id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await?;

    let workout_id: Option<Uuid> =
        sqlx::query_scalar("DELETE FROM workout_exercises WHERE id = $1 RETURNING workout_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some(workout_id) = workout_id else {
        return Err(RepoError::NotFound(format!("workout exercise {id}")));
    };

    // Resequence the survivors: 1..N in their current relative order.
    sqlx::query(
        "UPDATE workout_exercises we \
         SET position = v.rn \
         FROM (SELECT id, row_number() OVER (ORDER BY position) AS rn \
               FROM workout_exercises WHERE workout_id = $1) v \
         WHERE we.id = v.id AND we.position <> v.rn",
    )
    .bind(workout_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Apply a full reordering of one workout's exercises.
///
/// `items` must pair every exercise of the affected workout with its new
/// position, and the positions must form a dense permutation of `1..N`;
/// anything else is rejected with [`RepoError::Validation`] before the
/// store is touched. All pairs are applied by one bound-parameter
/// statement, so concurrent readers never observe a partially updated
/// order.
pub async fn reorder_exercises(pool: &PgPool, items: &[(Uuid, i32)]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    validate_dense(items)?;

    let (ids, positions): (Vec<Uuid>, Vec<i32>) = items.iter().copied().unzip();

    let result = sqlx::query(
        "UPDATE workout_exercises AS we \
         SET position = v.position \
         FROM (SELECT unnest($1::uuid[]) AS id, unnest($2::int[]) AS position) v \
         WHERE we.id = v.id",
    )
    .bind(&ids)
    .bind(&positions)
    .execute(pool)
    .await?;

    if result.rows_affected() != items.len() as u64 {
        return Err(RepoError::NotFound(format!(
            "{} of {} exercises in reorder request",
            items.len() as u64 - result.rows_affected(),
            items.len()
        )));
    }

    debug!(count = items.len(), "reordered exercises");
    Ok(())
}

/// Check that `items` carries unique ids and positions forming exactly
/// `{1..N}`.
fn validate_dense(items: &[(Uuid, i32)]) -> Result<()> {
    let mut positions: Vec<i32> = items.iter().map(|(_, p)| *p).collect();
    positions.sort_unstable();
    for (idx, position) in positions.iter().enumerate() {
        if *position != idx as i32 + 1 {
            return Err(RepoError::Validation(format!(
                "positions must form a dense 1..{} sequence",
                items.len()
            )));
        }
    }

    let mut ids: Vec<Uuid> = items.iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != items.len() {
        return Err(RepoError::Validation(
            "duplicate exercise id in reorder request".to_owned(),
        ));
    }

    Ok(())
}
