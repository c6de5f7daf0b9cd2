//! Action kinds of the todo application.

use super::model::{EditKey, EditTitle, Filter, Todo, TodoId};
use crate::drivers::dom::Key;

crate::actions! {
    /// Every action kind the todo application reacts to or emits.
    pub struct TodoActions in "todo" {
        /// The text of the entry being composed changed.
        change: String,
        /// A key was released in the new entry input.
        new_todo_key: Key,
        /// Request to add the composed entry.
        submit: (),
        add: Todo,
        destroy: TodoId,
        toggle: TodoId,
        /// Mark every entry completed or active.
        toggle_all: bool,
        clear_completed: (),
        /// Start editing an entry.
        edit: TodoId,
        update_title: EditTitle,
        /// A key was released while editing an entry.
        edit_key: EditKey,
        /// Finish editing, removing the entry if its title is blank.
        save: TodoId,
        cancel_edit: TodoId,
        /// The user picked a filter.
        select_filter: Filter,
        /// The filter in effect changed.
        filter_change: Filter,
    }
}
