//! Operator CLI handlers for `spotter set` subcommands: the exercises
//! inside one workout day.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use spotter_db::models::ExercisePatch;
use spotter_db::queries::workout_exercises;

use crate::SetCommands;

/// Dispatch a `SetCommands` variant to the appropriate handler.
pub async fn run_set_command(command: SetCommands, pool: &PgPool) -> Result<()> {
    match command {
        SetCommands::Add {
            workout_id,
            definition_ids,
        } => cmd_add(pool, &workout_id, &definition_ids).await,
        SetCommands::Remove { exercise_id } => cmd_remove(pool, &exercise_id).await,
        SetCommands::Params {
            exercise_id,
            sets,
            reps,
            tempo,
            rest,
            notes,
        } => {
            let patch = ExercisePatch {
                sets,
                reps,
                tempo,
                rest_period: rest,
                notes,
            };
            cmd_params(pool, &exercise_id, &patch).await
        }
        SetCommands::Reorder { exercise_ids } => cmd_reorder(pool, &exercise_ids).await,
    }
}

fn parse_uuid(raw: &str, what: &str) -> Result<Uuid> {
    raw.parse()
        .with_context(|| format!("invalid {what}: {raw:?}"))
}

/// Append library exercises to a day, preserving the argument order.
async fn cmd_add(pool: &PgPool, workout_id: &str, definition_ids: &[String]) -> Result<()> {
    let workout_id = parse_uuid(workout_id, "workout ID")?;
    let ids = definition_ids
        .iter()
        .map(|raw| parse_uuid(raw, "definition ID"))
        .collect::<Result<Vec<_>>>()?;

    let added = workout_exercises::add_exercises_to_workout(pool, workout_id, &ids).await?;

    println!("{} exercise(s) added:", added.len());
    for exercise in &added {
        println!("  {}. {} ({})", exercise.position, exercise.name, exercise.id);
    }

    Ok(())
}

/// Remove one exercise; the surviving positions close up.
async fn cmd_remove(pool: &PgPool, exercise_id: &str) -> Result<()> {
    let id = parse_uuid(exercise_id, "exercise ID")?;

    workout_exercises::delete_workout_exercise(pool, id).await?;

    println!("Exercise {exercise_id} removed.");

    Ok(())
}

/// Patch prescription fields. Only the supplied flags are written.
async fn cmd_params(pool: &PgPool, exercise_id: &str, patch: &ExercisePatch) -> Result<()> {
    let id = parse_uuid(exercise_id, "exercise ID")?;

    if patch.is_empty() {
        println!("Nothing to update; pass at least one of --sets/--reps/--tempo/--rest/--notes.");
        return Ok(());
    }

    workout_exercises::update_exercise_fields(pool, id, patch).await?;

    println!("Exercise {exercise_id} updated.");

    Ok(())
}

/// Apply a full permutation: the given IDs become positions 1..N.
///
/// Every exercise of the day must be listed; a partial list is rejected
/// by the repository.
async fn cmd_reorder(pool: &PgPool, exercise_ids: &[String]) -> Result<()> {
    let items = exercise_ids
        .iter()
        .enumerate()
        .map(|(idx, raw)| Ok((parse_uuid(raw, "exercise ID")?, idx as i32 + 1)))
        .collect::<Result<Vec<_>>>()?;

    workout_exercises::reorder_exercises(pool, &items).await?;

    println!("Reordered {} exercise(s).", items.len());

    Ok(())
}
