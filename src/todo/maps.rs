//! Follow-up actions of the todo application.

use super::actions::TodoActions;
use super::model::{EditKey, Filter, IdGenerator, Todo, TodoState};
use crate::action::ActionDescriptor;
use crate::builder::BuildError;
use crate::drivers::dom::Key;
use crate::drivers::history::HistoryActions;
use crate::maps::{ActionTransformer, Guard};
use std::rc::Rc;

/// Build the transformer deriving follow-up actions.
///
/// Selecting a filter applies it before navigating, so the route change the
/// navigation causes finds the filter already in effect and emits nothing.
pub fn transformer(
    todo: &TodoActions,
    history: &HistoryActions,
    render: &ActionDescriptor<Rc<TodoState>>,
    ids: Rc<dyn IdGenerator>,
) -> Result<ActionTransformer<TodoState>, BuildError> {
    let render = render.clone();
    let (submit, clear, add, change) = (
        todo.submit.clone(),
        todo.change.clone(),
        todo.add.clone(),
        todo.change.clone(),
    );
    let (save, cancel, filter_change, navigate) = (
        todo.save.clone(),
        todo.cancel_edit.clone(),
        todo.filter_change.clone(),
        history.navigate.clone(),
    );
    let routed = todo.filter_change.clone();

    ActionTransformer::builder()
        .on_state("render", move |state| render.create(state))
        .gate(
            "submit-on-enter",
            &todo.new_todo_key,
            Guard::equals(Key::Enter),
            move |_| submit.create(()),
        )
        .gate(
            "clear-on-escape",
            &todo.new_todo_key,
            Guard::equals(Key::Escape),
            move |_| clear.create(String::new()),
        )
        .sample("add-on-submit", &todo.submit, move |(), state: &TodoState| {
            let title = state.todo.trim();
            (!title.is_empty()).then(|| add.create(Todo::new(ids.next_id(), title)))
        })
        .map("clear-after-add", &todo.add, move |_| change.create(String::new()))
        .gate(
            "save-on-enter",
            &todo.edit_key,
            Guard::new(|edit: &EditKey| edit.key == Key::Enter),
            move |edit| save.create(edit.id),
        )
        .gate(
            "cancel-on-escape",
            &todo.edit_key,
            Guard::new(|edit: &EditKey| edit.key == Key::Escape),
            move |edit| cancel.create(edit.id),
        )
        .map("apply-selected-filter", &todo.select_filter, move |filter| {
            filter_change.create(filter)
        })
        .map("navigate-to-filter", &todo.select_filter, move |filter| {
            navigate.create(filter.path().to_string())
        })
        .sample("filter-from-route", &history.changed, move |change, state: &TodoState| {
            Filter::from_route(&change.name)
                .filter(|filter| *filter != state.filter)
                .map(|filter| routed.create(filter))
        })
        .build()
}
