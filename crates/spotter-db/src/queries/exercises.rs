//! Database query functions for the `exercise_definitions` catalog.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{RepoError, Result};
use crate::models::{ExerciseCategory, ExerciseDefinition};

/// Minimum length of a catalog exercise name, after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// List the full exercise catalog, ordered by name.
pub async fn list_exercise_definitions(pool: &PgPool) -> Result<Vec<ExerciseDefinition>> {
    let definitions = sqlx::query_as::<_, ExerciseDefinition>(
        "SELECT * FROM exercise_definitions ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(definitions)
}

/// Fetch a single definition by id.
pub async fn get_exercise_definition(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ExerciseDefinition>> {
    let definition =
        sqlx::query_as::<_, ExerciseDefinition>("SELECT * FROM exercise_definitions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(definition)
}


/// Insert a new catalog entry. The name must be at least
/// [`MIN_NAME_LEN`] characters after trimming.
pub async fn insert_exercise_definition(
    pool: &PgPool,
    name: &str,
    category: ExerciseCategory,
    description: Option<&str>,
    primary_muscles: &[String],
) -> Result<ExerciseDefinition> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(RepoError::Validation(format!(
            "exercise name must be at least {MIN_NAME_LEN} characters"
        )));
    }

    let definition = sqlx::query_as::<_, ExerciseDefinition>(
        "INSERT INTO exercise_definitions (name, category, description, primary_muscles) \
         VALUES ($1, $2, $3, $4) \
         RETURNING *",
    )
    .bind(name)
    .bind(category)
    .bind(description)
    .bind(primary_muscles)
    .fetch_one(pool)
    .await?;

    Ok(definition)
}

/// Delete a catalog entry. Workout exercises referencing it keep their
/// denormalized name copy; only the definition link goes away.
pub async fn delete_exercise_definition(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM exercise_definitions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("exercise definition {id}")));
    }

    Ok(())
}
