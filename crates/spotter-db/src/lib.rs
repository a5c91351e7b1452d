//! Database layer for spotter: models, connection pool, embedded
//! migrations, and the plan repository query modules.

pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod queries;

pub use error::RepoError;
