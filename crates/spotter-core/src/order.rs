//! Dense-order re-sequencing helpers.
//!
//! A workout's exercises carry a dense, 1-based position sequence. These
//! helpers turn a displayed arrangement into the `(id, position)` pairs
//! submitted to the store, and implement the in-memory list move a drag
//! produces.

use uuid::Uuid;

use spotter_db::models::ExerciseWithDefinition;

/// Compute the full `(id, position)` list for a displayed arrangement:
/// the first element gets position 1, the second 2, and so on.
pub fn positions_from_display(exercises: &[ExerciseWithDefinition]) -> Vec<(Uuid, i32)> {
    exercises
        .iter()
        .enumerate()
        .map(|(idx, entry)| (entry.exercise.id, idx as i32 + 1))
        .collect()
}

/// Move the element at `from` to index `to`, shifting everything in
/// between. Out-of-range indices are a no-op (a drop outside the list).
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}
