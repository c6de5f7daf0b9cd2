//! Field reducers of the todo state.
//!
//! Every update builds a new list, even when no entry matches the id it
//! names; such updates leave the list value-equal.

use super::actions::TodoActions;
use super::model::{EditTitle, Filter, Todo, TodoId, TodoState};
use crate::action::Action;
use crate::builder::BuildError;
use crate::core::Stream;
use crate::store::{FieldReducer, StateStore};

pub fn add(todos: &[Todo], todo: Todo) -> Vec<Todo> {
    let mut next = todos.to_vec();
    next.push(todo);
    next
}

pub fn destroy(todos: &[Todo], id: &TodoId) -> Vec<Todo> {
    todos.iter().filter(|todo| &todo.id != id).cloned().collect()
}

pub fn toggle(todos: &[Todo], id: &TodoId) -> Vec<Todo> {
    update(todos, id, |todo| todo.completed = !todo.completed)
}

pub fn toggle_all(todos: &[Todo], completed: bool) -> Vec<Todo> {
    todos
        .iter()
        .map(|todo| Todo {
            completed,
            ..todo.clone()
        })
        .collect()
}

pub fn clear_completed(todos: &[Todo]) -> Vec<Todo> {
    todos.iter().filter(|todo| !todo.completed).cloned().collect()
}

/// Start editing `id`. At most one entry is edited at a time.
pub fn edit(todos: &[Todo], id: &TodoId) -> Vec<Todo> {
    todos
        .iter()
        .map(|todo| Todo {
            editing: &todo.id == id,
            ..todo.clone()
        })
        .collect()
}

pub fn update_title(todos: &[Todo], edit: &EditTitle) -> Vec<Todo> {
    update(todos, &edit.id, |todo| todo.title = edit.title.clone())
}

/// Finish editing `id`: trim its title, or drop the entry if the title is
/// blank.
pub fn save(todos: &[Todo], id: &TodoId) -> Vec<Todo> {
    todos
        .iter()
        .filter_map(|todo| {
            if &todo.id != id {
                return Some(todo.clone());
            }
            let title = todo.title.trim();
            (!title.is_empty()).then(|| Todo {
                title: title.to_string(),
                editing: false,
                ..todo.clone()
            })
        })
        .collect()
}

pub fn cancel_edit(todos: &[Todo], id: &TodoId) -> Vec<Todo> {
    update(todos, id, |todo| todo.editing = false)
}

fn update<F>(todos: &[Todo], id: &TodoId, f: F) -> Vec<Todo>
where
    F: Fn(&mut Todo),
{
    todos
        .iter()
        .map(|todo| {
            let mut todo = todo.clone();
            if &todo.id == id {
                f(&mut todo);
            }
            todo
        })
        .collect()
}

/// The `filter` field.
pub fn filter_field(actions: &TodoActions, initial: Filter) -> FieldReducer<TodoState, Filter> {
    FieldReducer::new("filter", initial, |state: &mut TodoState, filter| state.filter = filter)
        .on(&actions.filter_change, |_, filter| filter)
}

/// The `todo` field: text of the entry being composed.
pub fn todo_field(actions: &TodoActions, initial: String) -> FieldReducer<TodoState, String> {
    FieldReducer::new("todo", initial, |state: &mut TodoState, text| state.todo = text)
        .on(&actions.change, |_, text| text)
}

/// The `todos` field.
pub fn todos_field(actions: &TodoActions, initial: Vec<Todo>) -> FieldReducer<TodoState, Vec<Todo>> {
    FieldReducer::new("todos", initial, |state: &mut TodoState, todos| state.todos = todos)
        .on(&actions.add, |todos, todo| add(todos, todo))
        .on(&actions.destroy, |todos, id| destroy(todos, &id))
        .on(&actions.toggle, |todos, id| toggle(todos, &id))
        .on(&actions.toggle_all, |todos, completed| toggle_all(todos, completed))
        .on(&actions.clear_completed, |todos, ()| clear_completed(todos))
        .on(&actions.edit, |todos, id| edit(todos, &id))
        .on(&actions.update_title, |todos, change| update_title(todos, &change))
        .on(&actions.save, |todos, id| save(todos, &id))
        .on(&actions.cancel_edit, |todos, id| cancel_edit(todos, &id))
}

/// The todo state store over `stream`, starting from `initial`.
pub fn store(
    actions: &TodoActions,
    initial: &TodoState,
    stream: &Stream<Action>,
) -> Result<StateStore<TodoState>, BuildError> {
    StateStore::builder()
        .field(filter_field(actions, initial.filter))
        .field(todo_field(actions, initial.todo.clone()))
        .field(todos_field(actions, initial.todos.clone()))
        .build(stream)
}
