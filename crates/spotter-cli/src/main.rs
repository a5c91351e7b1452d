mod client_cmds;
mod config;
mod day_cmds;
mod exercise_cmds;
mod plan_cmds;
mod set_cmds;

use clap::{Parser, Subcommand};

use spotter_db::pool;

use config::SpotterConfig;

#[derive(Parser)]
#[command(name = "spotter", about = "Trainer admin panel for clients, exercises, and workout plans")]
struct Cli {
    /// Database URL (overrides SPOTTER_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a spotter config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/spotter")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the spotter database (create and migrate)
    DbInit,
    /// Show headline counts (clients, catalog exercises)
    Stats,
    /// Client roster
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Exercise library management
    Exercises {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Workout plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Workout day management
    Day {
        #[command(subcommand)]
        command: DayCommands,
    },
    /// Exercises within a workout day
    Set {
        #[command(subcommand)]
        command: SetCommands,
    },
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// List all clients
    List,
}

#[derive(Subcommand)]
pub enum ExerciseCommands {
    /// List the exercise library
    List,
    /// Add an exercise to the library
    Add {
        /// Exercise name (at least 3 characters)
        name: String,
        /// Category: strength, cardio, mobility, other
        #[arg(long, default_value = "strength")]
        category: String,
        /// Human-readable description
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated primary muscles (e.g. "quads,glutes")
        #[arg(long)]
        muscles: Option<String>,
    },
    /// Remove an exercise from the library
    Remove {
        /// Definition ID to remove
        definition_id: String,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show a client's active plan as a tree
    Show {
        /// Client ID
        client_id: String,
    },
    /// Create an active plan for a client
    Create {
        /// Client ID
        client_id: String,
    },
    /// Delete a client's active plan (and all its days)
    Delete {
        /// Client ID
        client_id: String,
    },
}

#[derive(Subcommand)]
pub enum DayCommands {
    /// Add a workout day to a client's active plan
    Add {
        /// Client ID
        client_id: String,
        /// Day name (at least 3 characters)
        name: String,
    },
    /// Rename a workout day
    Rename {
        /// Workout ID
        workout_id: String,
        /// New name
        name: String,
    },
    /// Delete a workout day and its exercises
    Delete {
        /// Workout ID
        workout_id: String,
    },
}

#[derive(Subcommand)]
pub enum SetCommands {
    /// Append library exercises to a workout day
    Add {
        /// Workout ID
        workout_id: String,
        /// Definition IDs to append, in order
        #[arg(required = true)]
        definition_ids: Vec<String>,
    },
    /// Remove an exercise from its day (surviving positions close up)
    Remove {
        /// Workout exercise ID
        exercise_id: String,
    },
    /// Set prescription fields on an exercise
    Params {
        /// Workout exercise ID
        exercise_id: String,
        #[arg(long)]
        sets: Option<String>,
        #[arg(long)]
        reps: Option<String>,
        #[arg(long)]
        tempo: Option<String>,
        /// Rest period (e.g. "90s")
        #[arg(long)]
        rest: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Reorder a day: list every exercise ID of the day in the new order
    Reorder {
        /// Workout exercise IDs, first to last
        #[arg(required = true)]
        exercise_ids: Vec<String>,
    },
}

/// Execute the `spotter init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `spotter db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `spotter db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = SpotterConfig::resolve(cli_db_url)?;

    println!("Initializing spotter database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    db_pool.close().await;

    println!("spotter db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Stats => {
            let resolved = SpotterConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = client_cmds::run_stats(&db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Clients { command } => {
            let resolved = SpotterConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = client_cmds::run_client_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Exercises { command } => {
            let resolved = SpotterConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = exercise_cmds::run_exercise_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let resolved = SpotterConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_plan_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Day { command } => {
            let resolved = SpotterConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = day_cmds::run_day_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Set { command } => {
            let resolved = SpotterConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = set_cmds::run_set_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test_util {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    /// Serialize tests that mutate process environment variables.
    pub fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
