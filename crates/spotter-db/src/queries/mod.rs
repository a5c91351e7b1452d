//! Plan repository: per-table query modules.

pub mod clients;
pub mod exercises;
pub mod plans;
pub mod workout_exercises;
pub mod workouts;
