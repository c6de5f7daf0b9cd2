//! Todo list data model.

use crate::drivers::dom::Key;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

/// Identifier of a todo entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub editing: bool,
}

impl Todo {
    /// A new, active entry.
    pub fn new(id: impl Into<TodoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            editing: false,
        }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Which entries the list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Every filter, in display order.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// The filter a route name selects.
    pub fn from_route(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.route_name() == name)
    }

    pub fn route_name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    /// Location path of the filter.
    pub fn path(self) -> &'static str {
        match self {
            Filter::All => "#/",
            Filter::Active => "#/active",
            Filter::Completed => "#/completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Whether the filter shows `todo`.
    pub fn accepts(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }
}

/// The application state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    pub filter: Filter,
    /// Text of the entry being composed.
    pub todo: String,
    pub todos: Vec<Todo>,
}

impl TodoState {
    /// Entries the current filter shows, in list order.
    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| self.filter.accepts(todo))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.len() - self.active_count()
    }

    /// Whether there are entries and every one is completed.
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.active_count() == 0
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }
}

/// New text for an entry being edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditTitle {
    pub id: TodoId,
    pub title: String,
}

/// A key released while an entry is being edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditKey {
    pub id: TodoId,
    pub key: Key,
}

/// Source of identifiers for new entries.
pub trait IdGenerator {
    fn next_id(&self) -> TodoId;
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> TodoId {
        TodoId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Consecutive numbers, for reproducible runs.
#[derive(Debug)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    /// Numbering starting at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> TodoId {
        let id = self.next.get();
        self.next.set(id + 1);
        TodoId::new(id.to_string())
    }
}
