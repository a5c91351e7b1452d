//! Plan editor state machine.
//!
//! Mediates trainer intent against the plan repository for one client's
//! view. The machine is `Loading` until the first tree arrives, then
//! either `NoPlan` or `Loaded`. `Loaded` carries the plan tree, the
//! selected day, and the transient sub-states (add-day form, two-phase
//! day delete, inline rename, picker).
//!
//! Refresh-after-mutation is the sole synchronization mechanism: every
//! successful mutation reloads the client's tree and publishes a
//! revalidation signal. The one exception to "server state wins" is drag
//! reordering, which applies optimistically and rolls back to the exact
//! pre-drag snapshot when the bulk update fails.

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use spotter_db::RepoError;
use spotter_db::models::{
    ExerciseField, ExercisePatch, PlanTree, WorkoutExercise, WorkoutWithExercises,
};

use crate::order;
use crate::picker::PickerState;
use crate::revalidate::Revalidator;
use crate::store::PlanStore;

/// Errors surfaced by editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The operation is not legal in the current editor state.
    #[error("invalid editor operation: {0}")]
    InvalidOperation(&'static str),

    /// The repository refused or failed the underlying call.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Client-visible editor states.
#[derive(Debug, Clone)]
pub enum EditorState {
    /// Initial load still outstanding.
    Loading,
    /// The client has no active plan.
    NoPlan,
    /// A plan tree is displayed.
    Loaded(LoadedPlan),
}

/// Displayed state while a plan is loaded.
#[derive(Debug, Clone)]
pub struct LoadedPlan {
    pub tree: PlanTree,
    pub selected_workout: Option<Uuid>,
    /// The add-day form is open.
    pub adding_workout: bool,
    /// A day awaiting delete confirmation (two-phase delete).
    pub pending_delete: Option<Uuid>,
    /// A day being renamed inline.
    pub renaming: Option<Uuid>,
    /// The exercise picker, when open.
    pub picker: Option<PickerState>,
}

impl LoadedPlan {
    fn new(tree: PlanTree) -> Self {
        Self {
            tree,
            selected_workout: None,
            adding_workout: false,
            pending_delete: None,
            renaming: None,
            picker: None,
        }
    }

    /// The currently selected day, if any.
    pub fn selected_day(&self) -> Option<&WorkoutWithExercises> {
        self.selected_workout.and_then(|id| self.tree.workout(id))
    }

    fn selected_day_mut(&mut self) -> Option<&mut WorkoutWithExercises> {
        let id = self.selected_workout?;
        self.tree.workouts.iter_mut().find(|w| w.workout.id == id)
    }

    /// Drop sub-state references to days that no longer exist.
    fn reconcile(&mut self) {
        let exists = |id: &Option<Uuid>| {
            id.map(|id| self.tree.workout(id).is_some()).unwrap_or(false)
        };
        if !exists(&self.selected_workout) {
            self.selected_workout = None;
        }
        if !exists(&self.pending_delete) {
            self.pending_delete = None;
        }
        if !exists(&self.renaming) {
            self.renaming = None;
        }
    }
}

/// Sort a fresh tree into display order: days by `(created_at, id)`,
/// exercises by position.
pub fn sort_tree(tree: &mut PlanTree) {
    tree.workouts
        .sort_by_key(|w| (w.workout.created_at, w.workout.id));
    for day in &mut tree.workouts {
        day.exercises.sort_by_key(|e| e.exercise.position);
    }
}

/// The plan editor for one client view.
///
/// Generic over [`PlanStore`] so tests can inject store failures; the
/// production store is [`crate::store::PgPlanStore`].
pub struct PlanEditor<S: PlanStore> {
    store: S,
    client_id: Uuid,
    revalidator: Revalidator,
    state: EditorState,
}

impl<S: PlanStore> PlanEditor<S> {
    /// Create an editor in the `Loading` state. Call [`Self::load`] to
    /// fetch the initial tree.
    pub fn new(store: S, client_id: Uuid, revalidator: Revalidator) -> Self {
        Self {
            store,
            client_id,
            revalidator,
            state: EditorState::Loading,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// The loaded sub-state, when a plan is displayed.
    pub fn loaded(&self) -> Option<&LoadedPlan> {
        match &self.state {
            EditorState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedPlan, EditorError> {
        match &mut self.state {
            EditorState::Loaded(loaded) => Ok(loaded),
            _ => Err(EditorError::InvalidOperation("no plan is loaded")),
        }
    }

    /// Initial load of the client's plan tree.
    pub async fn load(&mut self) -> Result<(), EditorError> {
        self.state = EditorState::Loading;
        let tree = self.store.get_active_plan(self.client_id).await?;
        self.ingest(tree);
        Ok(())
    }

    /// Reload the authoritative tree and reconcile displayed sub-states.
    async fn refresh(&mut self) -> Result<(), EditorError> {
        let tree = self.store.get_active_plan(self.client_id).await?;
        self.ingest(tree);
        Ok(())
    }

    /// Install a fresh tree, sorting it and carrying over the sub-states
    /// that still refer to live days.
    fn ingest(&mut self, tree: Option<PlanTree>) {
        match tree {
            None => self.state = EditorState::NoPlan,
            Some(mut tree) => {
                sort_tree(&mut tree);
                let mut loaded = match std::mem::replace(&mut self.state, EditorState::Loading) {
                    EditorState::Loaded(mut prev) => {
                        prev.tree = tree;
                        prev
                    }
                    _ => LoadedPlan::new(tree),
                };
                loaded.reconcile();
                self.state = EditorState::Loaded(loaded);
            }
        }
    }

    /// Refresh after a successful mutation and publish the staleness
    /// signal for this client.
    async fn converge(&mut self) -> Result<(), EditorError> {
        self.refresh().await?;
        self.revalidator.notify(self.client_id);
        Ok(())
    }

    // -------------------------------------------------------------------
    // Plan
    // -------------------------------------------------------------------

    /// Create a plan for the client. Only available in `NoPlan`.
    pub async fn create_plan(&mut self) -> Result<(), EditorError> {
        match self.state {
            EditorState::NoPlan => {}
            _ => return Err(EditorError::InvalidOperation("a plan already exists")),
        }
        self.store.create_plan(self.client_id).await?;
        self.converge().await
    }

    /// Delete the whole plan; the editor returns to `NoPlan`.
    pub async fn delete_plan(&mut self) -> Result<(), EditorError> {
        let plan_id = self.loaded_mut()?.tree.plan.id;
        self.store.delete_plan(plan_id).await?;
        self.converge().await
    }

    // -------------------------------------------------------------------
    // Day selection and add
    // -------------------------------------------------------------------

    /// Select a day for display. Selecting an unknown id clears the
    /// selection instead.
    pub fn select_workout(&mut self, workout_id: Option<Uuid>) {
        if let EditorState::Loaded(loaded) = &mut self.state {
            loaded.selected_workout =
                workout_id.filter(|id| loaded.tree.workout(*id).is_some());
        }
    }

    /// Open the add-day form.
    pub fn open_add_workout(&mut self) -> Result<(), EditorError> {
        self.loaded_mut()?.adding_workout = true;
        Ok(())
    }

    /// Close the add-day form without submitting.
    pub fn cancel_add_workout(&mut self) -> Result<(), EditorError> {
        self.loaded_mut()?.adding_workout = false;
        Ok(())
    }

    /// Submit the add-day form. On success the form closes; on failure
    /// it stays open (and populated) so the user can retry.
    pub async fn submit_workout(&mut self, name: &str) -> Result<(), EditorError> {
        let plan_id = self.loaded_mut()?.tree.plan.id;
        self.store.create_workout(plan_id, name).await?;
        self.loaded_mut()?.adding_workout = false;
        self.converge().await
    }

    // -------------------------------------------------------------------
    // Day rename (inline, commit on blur/Enter, Escape cancels)
    // -------------------------------------------------------------------

    /// Start renaming a day inline.
    pub fn begin_rename(&mut self, workout_id: Uuid) -> Result<(), EditorError> {
        let loaded = self.loaded_mut()?;
        if loaded.tree.workout(workout_id).is_none() {
            return Err(EditorError::Repo(RepoError::NotFound(format!(
                "workout {workout_id}"
            ))));
        }
        loaded.renaming = Some(workout_id);
        Ok(())
    }

    /// Abandon the inline rename (Escape).
    pub fn cancel_rename(&mut self) -> Result<(), EditorError> {
        self.loaded_mut()?.renaming = None;
        Ok(())
    }

    /// Commit the inline rename. A blank name is treated as a cancel:
    /// the edit closes and no store call is made.
    pub async fn commit_rename(&mut self, name: &str) -> Result<(), EditorError> {
        let loaded = self.loaded_mut()?;
        let workout_id = loaded
            .renaming
            .ok_or(EditorError::InvalidOperation("no rename in progress"))?;

        if name.trim().is_empty() {
            loaded.renaming = None;
            return Ok(());
        }

        self.store.rename_workout(workout_id, name).await?;
        self.loaded_mut()?.renaming = None;
        self.converge().await
    }

    // -------------------------------------------------------------------
    // Day delete (two-phase)
    // -------------------------------------------------------------------

    /// First phase: mark a day for deletion, pending confirmation.
    pub fn request_delete(&mut self, workout_id: Uuid) -> Result<(), EditorError> {
        let loaded = self.loaded_mut()?;
        if loaded.tree.workout(workout_id).is_none() {
            return Err(EditorError::Repo(RepoError::NotFound(format!(
                "workout {workout_id}"
            ))));
        }
        loaded.pending_delete = Some(workout_id);
        Ok(())
    }

    /// Abandon the pending delete.
    pub fn cancel_delete(&mut self) -> Result<(), EditorError> {
        self.loaded_mut()?.pending_delete = None;
        Ok(())
    }

    /// Second phase: delete the marked day. If it was selected, the
    /// selection clears. On a store failure the confirmation stays
    /// pending so the user can retry without re-requesting intent.
    pub async fn confirm_delete(&mut self) -> Result<(), EditorError> {
        let workout_id = self
            .loaded_mut()?
            .pending_delete
            .ok_or(EditorError::InvalidOperation("no delete pending"))?;

        self.store.delete_workout(workout_id).await?;

        let loaded = self.loaded_mut()?;
        loaded.pending_delete = None;
        if loaded.selected_workout == Some(workout_id) {
            loaded.selected_workout = None;
        }
        self.converge().await
    }

    // -------------------------------------------------------------------
    // Picker
    // -------------------------------------------------------------------

    /// Open the exercise picker for the selected day, loading the full
    /// catalog. Entries already in the day come back disabled.
    pub async fn open_picker(&mut self) -> Result<(), EditorError> {
        let loaded = self.loaded_mut()?;
        let day = loaded
            .selected_day()
            .ok_or(EditorError::InvalidOperation("no day selected"))?;
        let existing: Vec<Uuid> = day
            .exercises
            .iter()
            .filter_map(|e| e.exercise.exercise_definition_id)
            .collect();

        let catalog = self.store.list_definitions().await?;
        self.loaded_mut()?.picker = Some(PickerState::new(catalog, existing));
        Ok(())
    }

    /// Mutable access to the open picker (search, toggling).
    pub fn picker_mut(&mut self) -> Option<&mut PickerState> {
        match &mut self.state {
            EditorState::Loaded(loaded) => loaded.picker.as_mut(),
            _ => None,
        }
    }

    /// Try to dismiss the picker. Refused (returns `false`) while the
    /// bulk-add call is in flight.
    pub fn dismiss_picker(&mut self) -> bool {
        if let EditorState::Loaded(loaded) = &mut self.state {
            if let Some(picker) = &loaded.picker {
                if !picker.can_dismiss() {
                    return false;
                }
                loaded.picker = None;
            }
        }
        true
    }

    /// Confirm the picker selection: one bulk-add call for the selected
    /// day. While in flight the picker refuses dismissal; on success it
    /// closes, on failure it stays open and dismissible again.
    pub async fn confirm_add_exercises(&mut self) -> Result<(), EditorError> {
        let loaded = self.loaded_mut()?;
        let workout_id = loaded
            .selected_workout
            .ok_or(EditorError::InvalidOperation("no day selected"))?;
        let picker = loaded
            .picker
            .as_mut()
            .ok_or(EditorError::InvalidOperation("picker is not open"))?;

        let selection: Vec<Uuid> = picker.selection().to_vec();
        if selection.is_empty() {
            return Ok(());
        }

        picker.begin_submit();
        let result = self.store.add_exercises(workout_id, &selection).await;

        let loaded = self.loaded_mut()?;
        if let Some(picker) = loaded.picker.as_mut() {
            picker.finish_submit();
        }

        match result {
            Ok(()) => {
                loaded.picker = None;
                self.converge().await
            }
            Err(err) => {
                warn!(workout = %workout_id, error = %err, "bulk add failed");
                Err(err.into())
            }
        }
    }

    // -------------------------------------------------------------------
    // Exercise mutations
    // -------------------------------------------------------------------

    /// Drag an exercise of the selected day from one index to another.
    ///
    /// The displayed list reorders immediately; the full dense position
    /// list computed from the new arrangement is then submitted as one
    /// bulk update. If that fails the list rolls back to the exact
    /// pre-drag snapshot (no re-fetch) and the error is surfaced.
    pub async fn move_exercise(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let loaded = self.loaded_mut()?;
        let day = loaded
            .selected_day_mut()
            .ok_or(EditorError::InvalidOperation("no day selected"))?;

        if from >= day.exercises.len() || to >= day.exercises.len() || from == to {
            return Ok(());
        }

        // Optimistic apply, remembering the prior arrangement.
        let snapshot = day.exercises.clone();
        order::move_item(&mut day.exercises, from, to);
        for (idx, entry) in day.exercises.iter_mut().enumerate() {
            entry.exercise.position = idx as i32 + 1;
        }
        let items = order::positions_from_display(&day.exercises);

        match self.store.reorder_exercises(&items).await {
            Ok(()) => self.converge().await,
            Err(err) => {
                warn!(error = %err, "reorder failed, rolling back to pre-drag order");
                if let Some(day) = self.loaded_mut()?.selected_day_mut() {
                    day.exercises = snapshot;
                }
                Err(err.into())
            }
        }
    }

    /// Commit one prescription field on blur, only when its value differs
    /// from the last persisted value. Unchanged values make no store call.
    pub async fn commit_field(
        &mut self,
        exercise_id: Uuid,
        field: ExerciseField,
        value: &str,
    ) -> Result<(), EditorError> {
        let loaded = self.loaded_mut()?;
        let current = loaded
            .tree
            .workouts
            .iter()
            .flat_map(|day| day.exercises.iter())
            .find(|e| e.exercise.id == exercise_id)
            .map(|e| field_value(&e.exercise, field).unwrap_or("").to_owned())
            .ok_or_else(|| {
                EditorError::Repo(RepoError::NotFound(format!(
                    "workout exercise {exercise_id}"
                )))
            })?;

        if current == value {
            return Ok(());
        }

        let patch = ExercisePatch::single(field, value);
        self.store.update_exercise_fields(exercise_id, &patch).await?;
        self.converge().await
    }

    /// Delete one exercise from its day.
    pub async fn delete_exercise(&mut self, exercise_id: Uuid) -> Result<(), EditorError> {
        self.loaded_mut()?;
        self.store.delete_exercise(exercise_id).await?;
        self.converge().await
    }
}

/// The persisted value of one prescription field.
fn field_value(exercise: &WorkoutExercise, field: ExerciseField) -> Option<&str> {
    match field {
        ExerciseField::Sets => exercise.sets.as_deref(),
        ExerciseField::Reps => exercise.reps.as_deref(),
        ExerciseField::Tempo => exercise.tempo.as_deref(),
        ExerciseField::RestPeriod => exercise.rest_period.as_deref(),
        ExerciseField::Notes => exercise.notes.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use spotter_db::models::{Workout, WorkoutPlan};

    fn tree_with_days(names: &[&str]) -> PlanTree {
        let plan = WorkoutPlan {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            title: "New Training Plan".into(),
            general_notes: None,
            is_active: true,
            created_at: Utc::now(),
        };
        let base = Utc::now();
        let workouts = names
            .iter()
            .enumerate()
            .map(|(idx, name)| WorkoutWithExercises {
                workout: Workout {
                    id: Uuid::new_v4(),
                    workout_plan_id: plan.id,
                    name: (*name).to_owned(),
                    created_at: base + Duration::seconds(idx as i64),
                },
                exercises: vec![],
            })
            .collect();
        PlanTree { plan, workouts }
    }

    #[test]
    fn sort_tree_orders_days_by_creation() {
        let mut tree = tree_with_days(&["a", "b", "c"]);
        tree.workouts.reverse();
        sort_tree(&mut tree);
        let names: Vec<_> = tree.workouts.iter().map(|w| w.workout.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn sort_tree_breaks_created_at_ties_by_id() {
        let mut tree = tree_with_days(&["a", "b"]);
        let ts = Utc::now();
        for day in &mut tree.workouts {
            day.workout.created_at = ts;
        }
        sort_tree(&mut tree);
        assert!(tree.workouts[0].workout.id < tree.workouts[1].workout.id);
    }

    #[test]
    fn reconcile_clears_vanished_references() {
        let tree = tree_with_days(&["a"]);
        let mut loaded = LoadedPlan::new(tree);
        let ghost = Uuid::new_v4();
        loaded.selected_workout = Some(ghost);
        loaded.pending_delete = Some(ghost);
        loaded.renaming = Some(ghost);

        loaded.reconcile();
        assert!(loaded.selected_workout.is_none());
        assert!(loaded.pending_delete.is_none());
        assert!(loaded.renaming.is_none());
    }

    #[test]
    fn reconcile_keeps_live_references() {
        let tree = tree_with_days(&["a"]);
        let live = tree.workouts[0].workout.id;
        let mut loaded = LoadedPlan::new(tree);
        loaded.selected_workout = Some(live);

        loaded.reconcile();
        assert_eq!(loaded.selected_workout, Some(live));
    }
}
