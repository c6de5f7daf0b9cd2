//! Wiring the todo application into a run loop.

use super::actions::TodoActions;
use super::maps;
use super::model::{Filter, IdGenerator, Todo, TodoState};
use super::reducers;
use super::view;
use crate::action::{Action, ActionRegistry};
use crate::config::{self, ConfigError, RunConfig};
use crate::core::Stream;
use crate::drivers::dom::{describe_render, DomDriver, DomHandle, Selector};
use crate::drivers::history::{HistoryActions, HistoryConfig, HistoryDriver, HistoryHandle, FALLBACK_ROUTE};
use crate::run::{Application, RunError, RunLoop, RunOptions, Running};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Everything needed to start the todo application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoConfig {
    pub run: RunConfig,
    /// Selector of the node the view is rendered under.
    pub root: String,
    pub history: HistoryConfig,
    /// Entries present at start.
    pub todos: Vec<Todo>,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            root: "#root".to_string(),
            history: default_routes(),
            todos: Vec::new(),
        }
    }
}

impl TodoConfig {
    /// Parse and check a configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = config::parse(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable roots and repeated entry ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Selector::parse(&self.root).map_err(|error| ConfigError::Rejected(error.to_string()))?;
        let mut seen = BTreeSet::new();
        for todo in &self.todos {
            if !seen.insert(&todo.id) {
                return Err(ConfigError::Rejected(format!("Todo `{}` is listed more than once", todo.id)));
            }
        }
        Ok(())
    }

    /// The state the application starts from.
    pub fn initial_state(&self) -> TodoState {
        TodoState {
            filter: Filter::All,
            todo: String::new(),
            todos: self.todos.clone(),
        }
    }
}

/// Route table mapping each filter's path to its route name, with every
/// other path showing all entries.
pub fn default_routes() -> HistoryConfig {
    Filter::ALL
        .into_iter()
        .fold(HistoryConfig::default(), |config, filter| {
            config.route(filter.path(), filter.route_name())
        })
        .route(FALLBACK_ROUTE, Filter::All.route_name())
        .initial_path(Filter::All.path())
}

/// The todo application: state store plus transformer.
pub struct TodoApp {
    initial: TodoState,
    ids: Rc<dyn IdGenerator>,
    state: Option<Stream<Rc<TodoState>>>,
}

impl TodoApp {
    pub fn new(initial: TodoState, ids: Rc<dyn IdGenerator>) -> Self {
        Self {
            initial,
            ids,
            state: None,
        }
    }

    /// The shared state stream, once the application is wired.
    pub fn state(&self) -> Option<Stream<Rc<TodoState>>> {
        self.state.clone()
    }

    /// The latest state while the loop runs.
    ///
    /// `None` before the application is wired and after its loop stopped.
    pub fn snapshot(&self) -> Option<Rc<TodoState>> {
        let state = self.state.as_ref()?;
        let latest = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&latest);
        state
            .subscribe(move |snapshot| *sink.borrow_mut() = Some(snapshot))
            .unsubscribe();
        let snapshot = latest.borrow_mut().take();
        snapshot
    }
}

impl Application for TodoApp {
    fn handle(
        &mut self,
        actions: Stream<Action>,
        options: &RunOptions,
    ) -> Result<Stream<Action>, RunError> {
        let todo = TodoActions::describe(&options.registry)?;
        let history = HistoryActions::describe(&options.registry)?;
        let render = describe_render::<TodoState>(&options.registry)?;

        let store = reducers::store(&todo, &self.initial, &actions)?;
        let transformer = maps::transformer(&todo, &history, &render, Rc::clone(&self.ids))?;
        tracing::debug!(
            fields = ?store.field_names(),
            rules = transformer.len(),
            "Todo application wired"
        );

        let state = store.state();
        self.state = Some(state.clone());
        Ok(transformer.apply(&actions, &state))
    }

    fn stopped(&mut self) {
        self.state = None;
    }
}

/// A running todo application and the handles to its drivers.
pub struct TodoMvc {
    running: Running<TodoApp>,
    actions: TodoActions,
    dom: DomHandle,
    history: HistoryHandle,
}

impl TodoMvc {
    pub fn actions(&self) -> &TodoActions {
        &self.actions
    }

    /// The rendered page.
    pub fn dom(&self) -> &DomHandle {
        &self.dom
    }

    pub fn history(&self) -> &HistoryHandle {
        &self.history
    }

    /// The latest state, or `None` once the loop has stopped.
    pub fn state(&self) -> Option<Rc<TodoState>> {
        if !self.running.is_running() {
            return None;
        }
        self.running.app().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn stop(self) -> TodoApp {
        self.running.stop()
    }
}

/// Start the todo application with a history driver and a headless DOM.
pub fn bootstrap(config: TodoConfig, ids: Rc<dyn IdGenerator>) -> Result<TodoMvc, RunError> {
    config.validate()?;
    let registry = ActionRegistry::new();
    let actions = TodoActions::describe(&registry)?;

    let history = HistoryDriver::new(config.history.clone());
    let dom = DomDriver::new(config.root.clone(), view::view(&actions));
    let (history_handle, dom_handle) = (history.controller(), dom.controller());

    let running = RunLoop::new(RunOptions::new(registry, config.run.clone()))
        .driver(history)
        .driver(dom)
        .run(TodoApp::new(config.initial_state(), ids))?;
    tracing::info!(root = %config.root, todos = config.todos.len(), "Todo application started");

    Ok(TodoMvc {
        running,
        actions,
        dom: dom_handle,
        history: history_handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::dom::{DomEvent, Key};
    use crate::todo::model::SequentialIds;

    fn started(todos: Vec<Todo>) -> TodoMvc {
        let config = TodoConfig {
            todos,
            ..TodoConfig::default()
        };
        bootstrap(config, Rc::new(SequentialIds::default())).unwrap()
    }

    #[test]
    fn default_routes_cover_every_filter() {
        let routes = default_routes();

        for filter in Filter::ALL {
            assert_eq!(routes.resolve(filter.path()), Some(filter.route_name()));
        }
        assert_eq!(routes.resolve("#/elsewhere"), Some("all"));
    }

    #[test]
    fn config_rejects_repeated_ids() {
        let json = r#"{"todos": [{"id": "1", "title": "a"}, {"id": "1", "title": "b"}]}"#;

        assert!(matches!(TodoConfig::from_json(json), Err(ConfigError::Rejected(_))));
    }

    #[test]
    fn config_rejects_bad_roots() {
        assert!(matches!(
            TodoConfig::from_json(r#"{"root": "div["}"#),
            Err(ConfigError::Rejected(_))
        ));
    }

    #[test]
    fn bootstrap_renders_initial_state() {
        let app = started(vec![Todo::new("1", "Taste")]);

        assert!(app.is_running());
        assert_eq!(app.dom().count(".todo-list li"), 1);
        assert_eq!(app.history().location(), Some("#/".to_string()));
        assert_eq!(app.state().map(|s| s.todos.len()), Some(1));
    }

    #[test]
    fn typing_and_enter_add_an_entry() {
        let app = started(Vec::new());

        app.dom()
            .dispatch(".new-todo", DomEvent::Input { value: "Milk".into() })
            .unwrap();
        app.dom()
            .dispatch(".new-todo", DomEvent::KeyUp { key: Key::Enter, value: "Milk".into() })
            .unwrap();

        let state = app.state().unwrap();
        assert_eq!(state.todos, vec![Todo::new("1", "Milk")]);
        assert_eq!(state.todo, "");
        assert_eq!(app.dom().text(".todo-list label"), Some("Milk".to_string()));
    }

    #[test]
    fn filter_links_navigate() {
        let app = started(vec![Todo::new("1", "Taste").completed(true), Todo::new("2", "Walk")]);

        app.dom().dispatch("a[href='#/completed']", DomEvent::Click).unwrap();

        assert_eq!(app.history().location(), Some("#/completed".to_string()));
        assert_eq!(app.state().map(|s| s.filter), Some(Filter::Completed));
        assert_eq!(app.dom().count(".todo-list li"), 1);
    }

    #[test]
    fn stopping_ends_the_loop() {
        let app = started(Vec::new());
        let renders = app.dom().render_count();
        let history = app.history().clone();

        let todo_app = app.stop();
        history.go("#/active");

        assert!(todo_app.state().is_none());
        assert!(todo_app.snapshot().is_none());
        assert_eq!(renders, 1);
    }

    #[test]
    fn stopped_loops_report_no_state() {
        let app = started(vec![Todo::new("1", "Taste")]);
        app.dom()
            .dispatch("li[data-id=1] .toggle", DomEvent::Change { checked: true })
            .unwrap();
        let dom = app.dom().clone();
        assert!(app.state().is_some_and(|s| s.todos[0].completed));
        let rendered = dom.render_count();

        let todo_app = app.stop();

        assert!(todo_app.snapshot().is_none());
        assert_eq!(dom.render_count(), rendered);
    }
}
