//! Operator CLI handlers for `spotter clients` and `spotter stats`.

use anyhow::Result;
use sqlx::PgPool;

use spotter_db::queries::clients;

use crate::ClientCommands;

/// Dispatch a `ClientCommands` variant to the appropriate handler.
pub async fn run_client_command(command: ClientCommands, pool: &PgPool) -> Result<()> {
    match command {
        ClientCommands::List => cmd_list(pool).await,
    }
}

/// List all clients, ordered by name.
async fn cmd_list(pool: &PgPool) -> Result<()> {
    let roster = clients::list_clients(pool).await?;

    if roster.is_empty() {
        println!("No clients found.");
        return Ok(());
    }

    let id_w = 36;
    let name_w = roster
        .iter()
        .map(|c| c.full_name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!("{:<id_w$}  {:<name_w$}", "ID", "NAME");
    for client in &roster {
        println!("{:<id_w$}  {:<name_w$}", client.id, client.full_name);
    }

    Ok(())
}

/// Print the dashboard headline counts.
pub async fn run_stats(pool: &PgPool) -> Result<()> {
    let stats = clients::dashboard_stats(pool).await?;

    println!("Clients:   {}", stats.client_count);
    println!("Exercises: {}", stats.exercise_count);

    Ok(())
}
