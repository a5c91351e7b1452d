//! Operator CLI handlers for `spotter exercises` subcommands.
//!
//! Implements:
//! - `spotter exercises list`              -- list the exercise library
//! - `spotter exercises add <name> ...`    -- add a library entry
//! - `spotter exercises remove <def-id>`   -- remove a library entry

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use spotter_db::models::ExerciseCategory;
use spotter_db::queries::exercises;

use crate::ExerciseCommands;

/// Dispatch an `ExerciseCommands` variant to the appropriate handler.
pub async fn run_exercise_command(command: ExerciseCommands, pool: &PgPool) -> Result<()> {
    match command {
        ExerciseCommands::List => cmd_list(pool).await,
        ExerciseCommands::Add {
            name,
            category,
            description,
            muscles,
        } => cmd_add(pool, &name, &category, description.as_deref(), muscles.as_deref()).await,
        ExerciseCommands::Remove { definition_id } => cmd_remove(pool, &definition_id).await,
    }
}

/// List the library, alphabetically by name.
async fn cmd_list(pool: &PgPool) -> Result<()> {
    let library = exercises::list_exercise_definitions(pool).await?;

    if library.is_empty() {
        println!("The exercise library is empty. Use `spotter exercises add <name>`.");
        return Ok(());
    }

    let id_w = 36;
    let name_w = library.iter().map(|d| d.name.len()).max().unwrap_or(4).max(4);
    let cat_w = 8;

    println!(
        "{:<id_w$}  {:<name_w$}  {:<cat_w$}  MUSCLES",
        "ID", "NAME", "CATEGORY",
    );
    for def in &library {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<cat_w$}  {}",
            def.id,
            def.name,
            def.category,
            def.primary_muscles.join(", "),
        );
    }

    Ok(())
}

/// Add a library entry and print a summary.
async fn cmd_add(
    pool: &PgPool,
    name: &str,
    category: &str,
    description: Option<&str>,
    muscles: Option<&str>,
) -> Result<()> {
    let category: ExerciseCategory = category
        .parse()
        .with_context(|| format!("invalid category: {category:?}"))?;

    let primary_muscles: Vec<String> = muscles
        .map(|m| {
            m.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let definition =
        exercises::insert_exercise_definition(pool, name, category, description, &primary_muscles)
            .await?;

    println!("Exercise added.");
    println!();
    println!("  ID:       {}", definition.id);
    println!("  Name:     {}", definition.name);
    println!("  Category: {}", definition.category);
    if !definition.primary_muscles.is_empty() {
        println!("  Muscles:  {}", definition.primary_muscles.join(", "));
    }

    Ok(())
}

/// Remove a library entry. Plan exercises referencing it keep their
/// denormalized name.
async fn cmd_remove(pool: &PgPool, definition_id: &str) -> Result<()> {
    let id: Uuid = definition_id
        .parse()
        .with_context(|| format!("invalid definition ID: {definition_id:?}"))?;

    let definition = exercises::get_exercise_definition(pool, id)
        .await?
        .with_context(|| format!("no exercise definition with ID {definition_id}"))?;

    exercises::delete_exercise_definition(pool, id).await?;

    println!("{:?} removed from the library.", definition.name);
    println!("Plan entries that referenced it keep their name.");

    Ok(())
}
