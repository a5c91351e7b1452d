//! Exercise picker state.
//!
//! The picker offers the full catalog for multi-selection into a day.
//! Entries already present in the target day are shown but disabled, a
//! case-insensitive search narrows the list, and while the bulk-add call
//! is in flight the picker refuses to be dismissed so the user cannot
//! double-submit.

use std::collections::HashSet;

use uuid::Uuid;

use spotter_db::models::ExerciseDefinition;

/// State of the open exercise picker.
#[derive(Debug, Clone)]
pub struct PickerState {
    catalog: Vec<ExerciseDefinition>,
    /// Definitions already in the target day; selectable never.
    disabled: HashSet<Uuid>,
    /// Current selection, in the order the user picked.
    selected: Vec<Uuid>,
    search: String,
    in_flight: bool,
}

impl PickerState {
    /// Open a picker over the catalog, disabling `existing` definitions.
    pub fn new(catalog: Vec<ExerciseDefinition>, existing: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            catalog,
            disabled: existing.into_iter().collect(),
            selected: Vec::new(),
            search: String::new(),
            in_flight: false,
        }
    }

    /// The catalog entries matching the current search filter.
    pub fn visible(&self) -> Vec<&ExerciseDefinition> {
        let needle = self.search.to_lowercase();
        self.catalog
            .iter()
            .filter(|d| needle.is_empty() || d.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// True when the entry cannot be selected because the day already
    /// contains it.
    pub fn is_disabled(&self, id: Uuid) -> bool {
        self.disabled.contains(&id)
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    /// Toggle selection of an entry. Disabled entries are a no-op.
    pub fn toggle(&mut self, id: Uuid) {
        if self.disabled.contains(&id) {
            return;
        }
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// The current selection, in pick order.
    pub fn selection(&self) -> &[Uuid] {
        &self.selected
    }

    /// Whether the user may close the picker right now.
    pub fn can_dismiss(&self) -> bool {
        !self.in_flight
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Mark the bulk-add call as submitted; dismissal is blocked until
    /// [`Self::finish_submit`].
    pub fn begin_submit(&mut self) {
        self.in_flight = true;
    }

    /// The bulk-add call completed (success or failure); the picker is
    /// dismissible again.
    pub fn finish_submit(&mut self) {
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use spotter_db::models::ExerciseCategory;

    fn definition(name: &str) -> ExerciseDefinition {
        ExerciseDefinition {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            category: ExerciseCategory::Strength,
            description: None,
            primary_muscles: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn toggle_selects_and_deselects() {
        let a = definition("Squat");
        let id = a.id;
        let mut picker = PickerState::new(vec![a], []);

        picker.toggle(id);
        assert!(picker.is_selected(id));
        picker.toggle(id);
        assert!(!picker.is_selected(id));
    }

    #[test]
    fn disabled_entries_cannot_be_selected() {
        let a = definition("Squat");
        let id = a.id;
        let mut picker = PickerState::new(vec![a], [id]);

        assert!(picker.is_disabled(id));
        picker.toggle(id);
        assert!(picker.selection().is_empty());
    }

    #[test]
    fn selection_preserves_pick_order() {
        let a = definition("Squat");
        let b = definition("Deadlift");
        let (id_a, id_b) = (a.id, b.id);
        let mut picker = PickerState::new(vec![a, b], []);

        picker.toggle(id_b);
        picker.toggle(id_a);
        assert_eq!(picker.selection(), &[id_b, id_a]);
    }

    #[test]
    fn search_filters_case_insensitively() {
        let mut picker = PickerState::new(
            vec![definition("Barbell Squat"), definition("Plank")],
            [],
        );
        picker.set_search("squat");
        let visible = picker.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Barbell Squat");
    }

    #[test]
    fn dismissal_blocked_while_in_flight() {
        let mut picker = PickerState::new(vec![], []);
        assert!(picker.can_dismiss());
        picker.begin_submit();
        assert!(!picker.can_dismiss());
        picker.finish_submit();
        assert!(picker.can_dismiss());
    }
}
