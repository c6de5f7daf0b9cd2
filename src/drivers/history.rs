//! Location history and routing.

use crate::action::Action;
use crate::core::{merge, Stream, Subject};
use crate::run::{Driver, DriverError, RunOptions};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Pattern matching any path no exact route matches.
pub const FALLBACK_ROUTE: &str = "*";

crate::actions! {
    /// Action kinds understood and emitted by the history driver.
    pub struct HistoryActions in "history" {
        /// Request to move to a path.
        navigate: String,
        /// The location changed to a known route.
        changed: RouteChange,
    }
}

/// A location change resolved against the route table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteChange {
    /// Name of the matched route.
    pub name: String,
    /// The path that was navigated to.
    pub path: String,
}

/// Static configuration of the history driver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path patterns to route names. A `*` pattern catches every path
    /// without an exact match.
    pub routes: BTreeMap<String, String>,
    /// Path announced once the loop starts.
    pub initial_path: Option<String>,
}

impl HistoryConfig {
    /// Add a route.
    pub fn route(mut self, pattern: impl Into<String>, name: impl Into<String>) -> Self {
        self.routes.insert(pattern.into(), name.into());
        self
    }

    /// Set the path announced when the loop starts.
    pub fn initial_path(mut self, path: impl Into<String>) -> Self {
        self.initial_path = Some(path.into());
        self
    }

    /// Resolve `path` to a route name, preferring an exact match.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.routes
            .get(path)
            .or_else(|| self.routes.get(FALLBACK_ROUTE))
            .map(String::as_str)
    }
}

struct Location {
    config: HistoryConfig,
    current: Option<String>,
    actions: Option<HistoryActions>,
    external: Subject<Action>,
}

impl Location {
    /// Move to `path`, returning the change if the path is routable.
    fn visit(&mut self, path: &str) -> Option<RouteChange> {
        let Some(name) = self.config.resolve(path) else {
            tracing::warn!(path = %path, "No route matches path");
            return None;
        };
        let change = RouteChange {
            name: name.to_string(),
            path: path.to_string(),
        };
        self.current = Some(path.to_string());
        tracing::debug!(path = %path, route = %change.name, "Location changed");
        Some(change)
    }
}

/// Tracks the current location and resolves it against a route table.
///
/// Consumes `history/navigate` and emits `history/changed` for every path
/// with a matching route. Locations can also change from outside the loop
/// through [`HistoryHandle::go`].
pub struct HistoryDriver {
    location: Rc<RefCell<Location>>,
}

impl HistoryDriver {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            location: Rc::new(RefCell::new(Location {
                config,
                current: None,
                actions: None,
                external: Subject::new(),
            })),
        }
    }

    /// Handle for changing the location from outside the loop.
    pub fn controller(&self) -> HistoryHandle {
        HistoryHandle {
            location: Rc::clone(&self.location),
        }
    }
}

impl Driver for HistoryDriver {
    fn name(&self) -> &str {
        "history"
    }

    fn handle(
        &mut self,
        inbound: Stream<Action>,
        options: &RunOptions,
    ) -> Result<Stream<Action>, DriverError> {
        let actions = HistoryActions::describe(&options.registry)?;
        if self.location.borrow().config.routes.is_empty() {
            return Err(DriverError::InvalidConfig(
                "history driver needs at least one route".to_string(),
            ));
        }

        let external = {
            let mut location = self.location.borrow_mut();
            location.actions = Some(actions.clone());
            location.external.stream()
        };

        let location = Rc::clone(&self.location);
        let changed = actions.changed.clone();
        let navigations = actions.navigate.matches(&inbound).filter_map(move |path| {
            let change = location.borrow_mut().visit(&path);
            change.map(|change| changed.create(change))
        });

        Ok(merge(vec![navigations, external]))
    }

    fn start(&mut self) {
        let initial = self.location.borrow().config.initial_path.clone();
        if let Some(path) = initial {
            self.controller().go(&path);
        }
    }
}

/// Caller side of a [`HistoryDriver`].
#[derive(Clone)]
pub struct HistoryHandle {
    location: Rc<RefCell<Location>>,
}

impl HistoryHandle {
    /// Change the location as a browser's back button or address bar would.
    ///
    /// Emits `history/changed` into the loop when the path is routable.
    pub fn go(&self, path: &str) -> Option<RouteChange> {
        let (change, emit) = {
            let mut location = self.location.borrow_mut();
            let change = location.visit(path)?;
            let emit = location
                .actions
                .as_ref()
                .map(|actions| (actions.changed.create(change.clone()), location.external.clone()));
            (change, emit)
        };
        if let Some((action, external)) = emit {
            external.next(action);
        }
        Some(change)
    }

    /// The current path, once any location has been visited.
    pub fn location(&self) -> Option<String> {
        self.location.borrow().current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRegistry;

    fn config() -> HistoryConfig {
        HistoryConfig::default()
            .route("#/", "all")
            .route("#/active", "active")
            .route(FALLBACK_ROUTE, "all")
    }

    fn wired(config: HistoryConfig) -> (HistoryDriver, Subject<Action>, Rc<RefCell<Vec<RouteChange>>>, HistoryActions) {
        let registry = ActionRegistry::new();
        let mut driver = HistoryDriver::new(config);
        let inbound = Subject::new();
        let options = RunOptions::new(registry.clone(), Default::default());
        let outbound = driver.handle(inbound.stream(), &options).unwrap();
        let actions = HistoryActions::describe(&registry).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let changed = actions.changed.clone();
        outbound.subscribe(move |a| sink.borrow_mut().extend(changed.extract(&a)));
        (driver, inbound, seen, actions)
    }

    #[test]
    fn exact_routes_win_over_fallback() {
        let config = config();

        assert_eq!(config.resolve("#/active"), Some("active"));
        assert_eq!(config.resolve("#/unknown"), Some("all"));
    }

    #[test]
    fn unroutable_paths_resolve_to_nothing() {
        let config = HistoryConfig::default().route("#/", "all");

        assert_eq!(config.resolve("#/nope"), None);
    }

    #[test]
    fn navigate_emits_route_change() {
        let (driver, inbound, seen, actions) = wired(config());

        inbound.next(actions.navigate.create("#/active".to_string()));

        assert_eq!(
            *seen.borrow(),
            vec![RouteChange {
                name: "active".to_string(),
                path: "#/active".to_string()
            }]
        );
        assert_eq!(driver.controller().location(), Some("#/active".to_string()));
    }

    #[test]
    fn go_and_start_announce_locations() {
        let (mut driver, _inbound, seen, _) = wired(config().initial_path("#/"));

        driver.start();
        driver.controller().go("#/active");

        let names: Vec<String> = seen.borrow().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["all", "active"]);
    }

    #[test]
    fn empty_route_table_is_rejected() {
        let mut driver = HistoryDriver::new(HistoryConfig::default());
        let inbound = Subject::new();

        let result = driver.handle(inbound.stream(), &RunOptions::default());

        assert!(matches!(result, Err(DriverError::InvalidConfig(_))));
    }

    #[test]
    fn config_loads_from_json() {
        let config: HistoryConfig =
            serde_json::from_str(r##"{"routes": {"#/": "all"}, "initial_path": "#/"}"##).unwrap();

        assert_eq!(config.resolve("#/"), Some("all"));
        assert_eq!(config.initial_path.as_deref(), Some("#/"));
    }
}
