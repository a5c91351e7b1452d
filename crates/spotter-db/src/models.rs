use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Role of a profile: the trainer operates the panel, clients are managed
/// by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Trainer,
    Client,
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Trainer => "trainer",
            Self::Client => "client",
        };
        f.write_str(s)
    }
}

impl FromStr for ProfileRole {
    type Err = ProfileRoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trainer" => Ok(Self::Trainer),
            "client" => Ok(Self::Client),
            other => Err(ProfileRoleParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ProfileRole`] string.
#[derive(Debug, Clone)]
pub struct ProfileRoleParseError(pub String);

impl fmt::Display for ProfileRoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid profile role: {:?}", self.0)
    }
}

impl std::error::Error for ProfileRoleParseError {}

// ---------------------------------------------------------------------------

/// Catalog category of an exercise definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Mobility,
    Other,
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Strength => "strength",
            Self::Cardio => "cardio",
            Self::Mobility => "mobility",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for ExerciseCategory {
    type Err = ExerciseCategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strength" => Ok(Self::Strength),
            "cardio" => Ok(Self::Cardio),
            "mobility" => Ok(Self::Mobility),
            "other" => Ok(Self::Other),
            other => Err(ExerciseCategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ExerciseCategory`] string.
#[derive(Debug, Clone)]
pub struct ExerciseCategoryParseError(pub String);

impl fmt::Display for ExerciseCategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid exercise category: {:?}", self.0)
    }
}

impl std::error::Error for ExerciseCategoryParseError {}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A client profile, as visible to the trainer. Owned by the auth/profile
/// system; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientProfile {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// A catalog entry describing an exercise in the abstract, reusable across
/// many plans.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseDefinition {
    pub id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    pub description: Option<String>,
    pub primary_muscles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A workout plan -- the active set of training days assigned to one client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub general_notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A workout ("day") -- a named collection of exercises performed in one
/// session. Days have no persisted order column; display order is
/// `(created_at, id)` ascending.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub workout_plan_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One scheduled exercise instance within a day.
///
/// `position` is a dense, 1-based, per-workout sequence: after every
/// successful mutation the positions of a workout's exercises are exactly
/// `{1..N}` with no gaps or duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_definition_id: Option<Uuid>,
    pub name: String,
    pub position: i32,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub tempo: Option<String>,
    pub rest_period: Option<String>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Plan tree (composed read)
// ---------------------------------------------------------------------------

/// A workout exercise joined with its definition's current name, when the
/// definition link is still present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ExerciseWithDefinition {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub exercise: WorkoutExercise,
    pub definition_name: Option<String>,
}

impl ExerciseWithDefinition {
    /// Resolve the display name: the linked definition's name is preferred,
    /// the row's denormalized copy is the fallback.
    pub fn display_name(&self) -> &str {
        self.definition_name.as_deref().unwrap_or(&self.exercise.name)
    }
}

/// A day with its exercises, sorted by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutWithExercises {
    pub workout: Workout,
    pub exercises: Vec<ExerciseWithDefinition>,
}

/// The full plan tree returned by the composed active-plan read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTree {
    pub plan: WorkoutPlan,
    pub workouts: Vec<WorkoutWithExercises>,
}

impl PlanTree {
    /// Find a day by id.
    pub fn workout(&self, id: Uuid) -> Option<&WorkoutWithExercises> {
        self.workouts.iter().find(|w| w.workout.id == id)
    }
}

// ---------------------------------------------------------------------------
// Partial update of prescription fields
// ---------------------------------------------------------------------------

/// A partial update of an exercise's prescription fields. `None` means
/// "leave unchanged"; each field is committed independently by the editor
/// when it is the one that changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePatch {
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub tempo: Option<String>,
    pub rest_period: Option<String>,
    pub notes: Option<String>,
}

impl ExercisePatch {
    /// True when no field is supplied; such a patch is a no-op.
    pub fn is_empty(&self) -> bool {
        self.sets.is_none()
            && self.reps.is_none()
            && self.tempo.is_none()
            && self.rest_period.is_none()
            && self.notes.is_none()
    }

    /// A patch updating a single field.
    pub fn single(field: ExerciseField, value: impl Into<String>) -> Self {
        let mut patch = Self::default();
        let value = value.into();
        match field {
            ExerciseField::Sets => patch.sets = Some(value),
            ExerciseField::Reps => patch.reps = Some(value),
            ExerciseField::Tempo => patch.tempo = Some(value),
            ExerciseField::RestPeriod => patch.rest_period = Some(value),
            ExerciseField::Notes => patch.notes = Some(value),
        }
        patch
    }
}

/// The editable prescription fields of a workout exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseField {
    Sets,
    Reps,
    Tempo,
    RestPeriod,
    Notes,
}

impl fmt::Display for ExerciseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sets => "sets",
            Self::Reps => "reps",
            Self::Tempo => "tempo",
            Self::RestPeriod => "rest_period",
            Self::Notes => "notes",
        };
        f.write_str(s)
    }
}

impl FromStr for ExerciseField {
    type Err = ExerciseFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sets" => Ok(Self::Sets),
            "reps" => Ok(Self::Reps),
            "tempo" => Ok(Self::Tempo),
            "rest_period" => Ok(Self::RestPeriod),
            "notes" => Ok(Self::Notes),
            other => Err(ExerciseFieldParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ExerciseField`] string.
#[derive(Debug, Clone)]
pub struct ExerciseFieldParseError(pub String);

impl fmt::Display for ExerciseFieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid exercise field: {:?}", self.0)
    }
}

impl std::error::Error for ExerciseFieldParseError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
