//! In-memory ordered view of the todo list.
//!
//! # Design
//! `TodoList` holds the last-fetched items sorted by order key and applies
//! mutations optimistically: a drag or delete changes local state first and
//! hands back the full `ReorderEntry` payload for the asynchronous server
//! call. Every mutation renumbers the sequence to a dense `0..N-1` so the
//! payload always carries the position-derived order keys the server expects.
//!
//! Because the server call happens after the local change, a failed call
//! would silently diverge from stored truth. `snapshot()`/`restore()` exist
//! for exactly that: take a snapshot before the optimistic mutation, restore
//! it when the server rejects the change.

use crate::types::{ReorderEntry, Todo};

/// Ordered client-side view of all todo items.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<Todo>,
}

/// An opaque copy of the list state, used to roll back a failed optimistic
/// mutation.
#[derive(Debug, Clone)]
pub struct Snapshot(Vec<Todo>);

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the whole view with a server response, sorting by order key.
    /// Used after a fetch and after a reorder reply, so local state always
    /// reconciles to what the server actually stored.
    pub fn set_items(&mut self, mut items: Vec<Todo>) {
        items.sort_by_key(|t| t.order);
        self.items = items;
    }

    /// The order key a newly created item should carry to land at the end.
    pub fn next_order(&self) -> i64 {
        self.items.iter().map(|t| t.order + 1).max().unwrap_or(0)
    }

    /// Append a freshly created item (the server response from a create).
    pub fn push(&mut self, todo: Todo) {
        self.items.push(todo);
        self.items.sort_by_key(|t| t.order);
    }

    /// Replace the item with a matching id, re-sorting in case its order key
    /// changed. Unknown ids are ignored.
    pub fn apply_update(&mut self, todo: Todo) {
        if let Some(existing) = self.items.iter_mut().find(|t| t.id == todo.id) {
            *existing = todo;
            self.items.sort_by_key(|t| t.order);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.items.clone())
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.items = snapshot.0;
    }

    /// Move the item at `from` to position `to`, preserving the relative
    /// order of everything else, then renumber densely. Returns the full
    /// reorder payload to submit, or `None` if either index is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> Option<Vec<ReorderEntry>> {
        if from >= self.items.len() || to >= self.items.len() {
            return None;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Some(self.renumber())
    }

    /// Remove an item locally and renumber the survivors by position.
    /// Returns the reorder payload for the renumbered set, or `None` if the
    /// id is not present.
    pub fn remove(&mut self, id: i64) -> Option<Vec<ReorderEntry>> {
        let index = self.items.iter().position(|t| t.id == id)?;
        self.items.remove(index);
        Some(self.renumber())
    }

    /// Assign `order = position` to every item and return the matching
    /// reorder payload.
    fn renumber(&mut self) -> Vec<ReorderEntry> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(position, todo)| {
                todo.order = position as i64;
                ReorderEntry {
                    id: todo.id,
                    order: todo.order,
                }
            })
            .collect()
    }
}
