//! Operator CLI handlers for `spotter day` subcommands.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use spotter_db::queries::{plans, workouts};

use crate::DayCommands;

/// Dispatch a `DayCommands` variant to the appropriate handler.
pub async fn run_day_command(command: DayCommands, pool: &PgPool) -> Result<()> {
    match command {
        DayCommands::Add { client_id, name } => cmd_add(pool, &client_id, &name).await,
        DayCommands::Rename { workout_id, name } => cmd_rename(pool, &workout_id, &name).await,
        DayCommands::Delete { workout_id } => cmd_delete(pool, &workout_id).await,
    }
}

/// Append a day to a client's active plan.
async fn cmd_add(pool: &PgPool, client_id: &str, name: &str) -> Result<()> {
    let tree = plans::get_active_plan(pool, client_id)
        .await?
        .with_context(|| format!("no active plan for client {client_id}"))?;

    let workout = workouts::insert_workout(pool, tree.plan.id, name).await?;

    println!("Day added to plan {}.", tree.plan.id);
    println!();
    println!("  Day ID: {}", workout.id);
    println!("  Name:   {}", workout.name);

    Ok(())
}

/// Rename a day. A blank name is a no-op, matching the inline-edit
/// behavior.
async fn cmd_rename(pool: &PgPool, workout_id: &str, name: &str) -> Result<()> {
    let id: Uuid = workout_id
        .parse()
        .with_context(|| format!("invalid workout ID: {workout_id:?}"))?;

    let renamed = workouts::rename_workout(pool, id, name).await?;

    if renamed {
        println!("Day {workout_id} renamed to {:?}.", name.trim());
    } else {
        println!("Blank name ignored; day {workout_id} unchanged.");
    }

    Ok(())
}

/// Delete a day and all of its exercises.
async fn cmd_delete(pool: &PgPool, workout_id: &str) -> Result<()> {
    let id: Uuid = workout_id
        .parse()
        .with_context(|| format!("invalid workout ID: {workout_id:?}"))?;

    workouts::delete_workout(pool, id).await?;

    println!("Day {workout_id} deleted.");

    Ok(())
}
