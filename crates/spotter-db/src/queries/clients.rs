//! Database query functions for the `profiles` table.
//!
//! Profiles are owned by the auth system; from the panel's perspective
//! they are read-only.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ClientProfile, ProfileRole};

/// List all client profiles, ordered by full name.
pub async fn list_clients(pool: &PgPool) -> Result<Vec<ClientProfile>> {
    let clients = sqlx::query_as::<_, ClientProfile>(
        "SELECT id, full_name, avatar_url FROM profiles \
         WHERE role = 'client' \
         ORDER BY full_name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(clients)
}

/// Fetch a single client profile by id.
pub async fn get_client(pool: &PgPool, id: Uuid) -> Result<Option<ClientProfile>> {
    let client = sqlx::query_as::<_, ClientProfile>(
        "SELECT id, full_name, avatar_url FROM profiles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Fetch the role of a profile, if the profile exists.
pub async fn get_role(pool: &PgPool, id: Uuid) -> Result<Option<ProfileRole>> {
    let role: Option<ProfileRole> =
        sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(role)
}

/// Headline counts for the dashboard landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub client_count: i64,
    pub exercise_count: i64,
}

/// Count clients and catalog exercises in one pass.
pub async fn dashboard_stats(pool: &PgPool) -> Result<DashboardStats> {
    let (client_count, exercise_count): (i64, i64) = sqlx::query_as(
        "SELECT \
           (SELECT COUNT(*) FROM profiles WHERE role = 'client'), \
           (SELECT COUNT(*) FROM exercise_definitions)",
    )
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        client_count,
        exercise_count,
    })
}
