//! Trainer gate.
//!
//! Credential verification lives outside this core; what remains is the
//! authorization step of the original login flow: the signed-in identity
//! must have a trainer profile, or access is refused.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use spotter_db::RepoError;
use spotter_db::models::ProfileRole;
use spotter_db::queries::clients;

/// An authenticated identity, as handed over by the session collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: ProfileRole,
}

/// Reasons the trainer gate refuses an identity.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No profile row exists for the signed-in user.
    #[error("no profile found for user {0}")]
    ProfileMissing(Uuid),

    /// The profile exists but is not a trainer.
    #[error("only trainers may access the admin panel")]
    NotATrainer,

    /// The profile lookup itself failed.
    #[error(transparent)]
    Store(#[from] RepoError),
}

/// Check that an identity carries the trainer role.
pub fn require_trainer(identity: &Identity) -> Result<(), AuthError> {
    match identity.role {
        ProfileRole::Trainer => Ok(()),
        ProfileRole::Client => Err(AuthError::NotATrainer),
    }
}

/// Resolve a signed-in user id to an [`Identity`] and enforce the
/// trainer gate against the profile store.
pub async fn authorize_trainer(pool: &PgPool, user_id: Uuid) -> Result<Identity, AuthError> {
    let role = clients::get_role(pool, user_id)
        .await?
        .ok_or(AuthError::ProfileMissing(user_id))?;

    let identity = Identity { id: user_id, role };
    require_trainer(&identity)?;
    Ok(identity)
}
