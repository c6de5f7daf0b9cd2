//! The todo list view.

use super::actions::TodoActions;
use super::model::{EditKey, EditTitle, Filter, Todo, TodoState};
use crate::drivers::dom::{EventKind, VNode, ViewContext};

/// View rendering a state as the classic todo list page.
pub fn view(actions: &TodoActions) -> impl Fn(&TodoState, &ViewContext) -> VNode + 'static {
    let actions = actions.clone();
    move |state: &TodoState, cx: &ViewContext| render(&actions, state, cx)
}

/// Render `state` into a `section.todoapp` tree.
pub fn render(actions: &TodoActions, state: &TodoState, cx: &ViewContext) -> VNode {
    let page = cx.create("section.todoapp").child(header(actions, state, cx));
    if state.todos.is_empty() {
        return page;
    }
    page.child(main_section(actions, state, cx)).child(footer(actions, state, cx))
}

fn header(actions: &TodoActions, state: &TodoState, cx: &ViewContext) -> VNode {
    cx.create("header.header")
        .child(cx.create("h1").text("todos"))
        .child(
            cx.create("input.new-todo")
                .attr("placeholder", "What needs to be done?")
                .attr("value", state.todo.clone())
                .flag("autofocus", true)
                .on(cx.emit(EventKind::Input, &actions.change, |e| e.value().map(str::to_string)))
                .on(cx.emit(EventKind::KeyUp, &actions.new_todo_key, |e| e.key())),
        )
}

fn main_section(actions: &TodoActions, state: &TodoState, cx: &ViewContext) -> VNode {
    cx.create("section.main")
        .child(
            cx.create("input#toggle-all.toggle-all[type=checkbox]")
                .flag("checked", state.all_completed())
                .on(cx.emit(EventKind::Change, &actions.toggle_all, |e| e.checked())),
        )
        .child(
            cx.create("label[for=toggle-all]")
                .text("Mark all as complete"),
        )
        .child(
            cx.create("ul.todo-list")
                .children(state.visible_todos().into_iter().map(|todo| item(actions, todo, cx))),
        )
}

fn item(actions: &TodoActions, todo: &Todo, cx: &ViewContext) -> VNode {
    let id = todo.id.clone();
    let (toggled, edited, destroyed) = (id.clone(), id.clone(), id.clone());
    let row = cx
        .create("li")
        .attr("data-id", id.as_str())
        .class_if("completed", todo.completed)
        .class_if("editing", todo.editing)
        .child(
            cx.create("div.view")
                .child(
                    cx.create("input.toggle[type=checkbox]")
                        .flag("checked", todo.completed)
                        .on(cx.emit(EventKind::Change, &actions.toggle, move |_| Some(toggled.clone()))),
                )
                .child(
                    cx.create("label")
                        .text(todo.title.clone())
                        .on(cx.emit(EventKind::DoubleClick, &actions.edit, move |_| Some(edited.clone()))),
                )
                .child(
                    cx.create("button.destroy")
                        .on(cx.emit(EventKind::Click, &actions.destroy, move |_| Some(destroyed.clone()))),
                ),
        );
    if !todo.editing {
        return row;
    }

    let (retitled, keyed, blurred) = (id.clone(), id.clone(), id);
    row.child(
        cx.create("input.edit")
            .attr("value", todo.title.clone())
            .on(cx.emit(EventKind::Input, &actions.update_title, move |e| {
                e.value().map(|title| EditTitle {
                    id: retitled.clone(),
                    title: title.to_string(),
                })
            }))
            .on(cx.emit(EventKind::KeyUp, &actions.edit_key, move |e| {
                e.key().map(|key| EditKey {
                    id: keyed.clone(),
                    key,
                })
            }))
            .on(cx.emit(EventKind::Blur, &actions.save, move |_| Some(blurred.clone()))),
    )
}

fn footer(actions: &TodoActions, state: &TodoState, cx: &ViewContext) -> VNode {
    let left = state.active_count();
    let unit = if left == 1 { " item left" } else { " items left" };
    let filters = Filter::ALL.into_iter().map(|filter| {
        cx.create("li").child(
            cx.create("a")
                .attr("href", filter.path())
                .class_if("selected", filter == state.filter)
                .text(filter.label())
                .on(cx.emit(EventKind::Click, &actions.select_filter, move |_| Some(filter))),
        )
    });

    let footer = cx
        .create("footer.footer")
        .child(
            cx.create("span.todo-count")
                .child(cx.create("strong").text(left.to_string()))
                .child(cx.create("span").text(unit)),
        )
        .child(cx.create("ul.filters").children(filters));
    if state.completed_count() == 0 {
        return footer;
    }
    footer.child(
        cx.create("button.clear-completed")
            .text("Clear completed")
            .on(cx.emit(EventKind::Click, &actions.clear_completed, |_| Some(()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRegistry;
    use crate::drivers::dom::{DomEvent, Key, Selector};

    fn fixture() -> (TodoActions, TodoState) {
        let registry = ActionRegistry::new();
        let actions = TodoActions::describe(&registry).unwrap();
        let state = TodoState {
            filter: Filter::All,
            todo: "Mil".to_string(),
            todos: vec![
                Todo::new("1", "Taste").completed(true),
                Todo::new("2", "Buy a unicorn"),
            ],
        };
        (actions, state)
    }

    fn fire(tree: &VNode, selector: &str, event: DomEvent) -> Vec<crate::action::Action> {
        Selector::parse(selector)
            .unwrap()
            .select(tree)
            .iter()
            .flat_map(|node| node.bindings())
            .filter_map(|binding| binding.fire(&event))
            .collect()
    }

    #[test]
    fn empty_lists_render_only_the_header() {
        let (actions, _) = fixture();
        let tree = render(&actions, &TodoState::default(), &ViewContext::new());

        assert!(tree.find("header .new-todo").is_some());
        assert!(tree.find(".main").is_none());
        assert!(tree.find(".footer").is_none());
    }

    #[test]
    fn list_renders_entries_and_counts() {
        let (actions, state) = fixture();
        let tree = render(&actions, &state, &ViewContext::new());

        assert_eq!(tree.find_all(".todo-list li").len(), 2);
        assert!(tree.find("li[data-id=1]").is_some_and(|li| li.has_class("completed")));
        assert_eq!(tree.find(".todo-count").map(VNode::text_content), Some("1 item left".to_string()));
        assert!(tree.find(".clear-completed").is_some());
        assert!(tree.find("a[href='#/']").is_some_and(|a| a.has_class("selected")));
        assert_eq!(tree.find(".new-todo").and_then(|n| n.get_attr("value")), Some("Mil"));
    }

    #[test]
    fn filtered_views_hide_other_entries() {
        let (actions, mut state) = fixture();
        state.filter = Filter::Active;
        let tree = render(&actions, &state, &ViewContext::new());

        let labels: Vec<String> = tree.find_all(".todo-list label").iter().map(|l| l.text_content()).collect();
        assert_eq!(labels, vec!["Buy a unicorn"]);
    }

    #[test]
    fn bindings_produce_todo_actions() {
        let (actions, mut state) = fixture();
        state.todos[1].editing = true;
        let tree = render(&actions, &state, &ViewContext::new());

        assert_eq!(
            fire(&tree, ".new-todo", DomEvent::KeyUp { key: Key::Enter, value: "Milk".into() }),
            vec![actions.new_todo_key.create(Key::Enter)]
        );
        assert_eq!(
            fire(&tree, "li[data-id=1] .toggle", DomEvent::Change { checked: false }),
            vec![actions.toggle.create("1".into())]
        );
        assert_eq!(
            fire(&tree, ".filters a", DomEvent::Click),
            Filter::ALL.iter().map(|f| actions.select_filter.create(*f)).collect::<Vec<_>>()
        );
        assert_eq!(
            fire(&tree, "li.editing .edit", DomEvent::Blur),
            vec![actions.save.create("2".into())]
        );
        assert_eq!(tree.find_all(".edit").len(), 1);
    }
}
