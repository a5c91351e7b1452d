//! Operator CLI handlers for `spotter plan` subcommands.
//!
//! Implements:
//! - `spotter plan show <client-id>`   -- print the active plan tree
//! - `spotter plan create <client-id>` -- create an active plan
//! - `spotter plan delete <client-id>` -- delete the active plan

use anyhow::{Context, Result};
use sqlx::PgPool;

use spotter_db::queries::{clients, plans};

use crate::PlanCommands;

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(command: PlanCommands, pool: &PgPool) -> Result<()> {
    match command {
        PlanCommands::Show { client_id } => cmd_show(pool, &client_id).await,
        PlanCommands::Create { client_id } => cmd_create(pool, &client_id).await,
        PlanCommands::Delete { client_id } => cmd_delete(pool, &client_id).await,
    }
}

/// Print a client's active plan as an indented tree.
async fn cmd_show(pool: &PgPool, client_id: &str) -> Result<()> {
    let Some(mut tree) = plans::get_active_plan(pool, client_id).await? else {
        println!("No active plan. Use `spotter plan create {client_id}`.");
        return Ok(());
    };

    spotter_core::editor::sort_tree(&mut tree);

    println!("Plan: {}", tree.plan.title);
    println!("  ID:      {}", tree.plan.id);
    println!("  Client:  {}", tree.plan.client_id);
    println!(
        "  Created: {}",
        tree.plan.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(notes) = &tree.plan.general_notes {
        println!("  Notes:   {notes}");
    }
    println!("  Days:    {}", tree.workouts.len());

    for day in &tree.workouts {
        println!();
        println!("  {} ({})", day.workout.name, day.workout.id);
        if day.exercises.is_empty() {
            println!("    (no exercises)");
            continue;
        }
        for entry in &day.exercises {
            let prescription = [
                entry.exercise.sets.as_deref().map(|v| format!("sets {v}")),
                entry.exercise.reps.as_deref().map(|v| format!("reps {v}")),
                entry.exercise.tempo.as_deref().map(|v| format!("tempo {v}")),
                entry
                    .exercise
                    .rest_period
                    .as_deref()
                    .map(|v| format!("rest {v}")),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

            if prescription.is_empty() {
                println!(
                    "    {}. {} ({})",
                    entry.exercise.position,
                    entry.display_name(),
                    entry.exercise.id,
                );
            } else {
                println!(
                    "    {}. {} ({}) [{prescription}]",
                    entry.exercise.position,
                    entry.display_name(),
                    entry.exercise.id,
                );
            }
            if let Some(notes) = &entry.exercise.notes {
                println!("       notes: {notes}");
            }
        }
    }

    Ok(())
}

/// Create an active plan for a client with the default title.
async fn cmd_create(pool: &PgPool, client_id: &str) -> Result<()> {
    let id = plans::parse_client_id(client_id)?;

    let client = clients::get_client(pool, id)
        .await?
        .with_context(|| format!("no client profile for {client_id}"))?;

    let plan = plans::insert_plan(pool, id).await?;

    println!("Plan created for {}.", client.full_name);
    println!();
    println!("  Plan ID: {}", plan.id);
    println!("  Title:   {}", plan.title);

    Ok(())
}

/// Delete a client's active plan, cascading to its days and exercises.
async fn cmd_delete(pool: &PgPool, client_id: &str) -> Result<()> {
    let tree = plans::get_active_plan(pool, client_id)
        .await?
        .with_context(|| format!("no active plan for client {client_id}"))?;

    plans::delete_plan(pool, tree.plan.id).await?;

    println!(
        "Plan {} deleted ({} day(s) removed).",
        tree.plan.id,
        tree.workouts.len()
    );

    Ok(())
}
