//! The todo list application.
//!
//! State is three independent fields: the active filter, the text being
//! composed and the entries. Interactions arrive from the DOM driver, route
//! changes from the history driver, and every state is rendered back
//! through [`view::view`].
//!
//! # Example
//!
//! ```rust
//! use rivulet::drivers::dom::{DomEvent, Key};
//! use rivulet::todo::{bootstrap, SequentialIds, TodoConfig};
//! use std::rc::Rc;
//!
//! let app = bootstrap(TodoConfig::default(), Rc::new(SequentialIds::default())).unwrap();
//!
//! app.dom().dispatch(".new-todo", DomEvent::Input { value: "Milk".into() }).unwrap();
//! app.dom()
//!     .dispatch(".new-todo", DomEvent::KeyUp { key: Key::Enter, value: "Milk".into() })
//!     .unwrap();
//!
//! assert_eq!(app.dom().text(".todo-count strong"), Some("1".to_string()));
//! ```

pub mod actions;
pub mod app;
pub mod maps;
pub mod model;
pub mod reducers;
pub mod view;

pub use actions::TodoActions;
pub use app::{bootstrap, default_routes, TodoApp, TodoConfig, TodoMvc};
pub use model::{
    EditKey, EditTitle, Filter, IdGenerator, SequentialIds, Todo, TodoId, TodoState, UuidIds,
};
