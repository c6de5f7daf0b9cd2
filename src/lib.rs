//! Rivulet: a synchronous reactive runtime for unidirectional state
//!
//! Rivulet turns a stream of actions into an always-current state and a
//! stream of follow-up actions. Application logic stays pure: effects live in
//! drivers at the edge of a closed loop, and everything between them is a
//! composition of streams.
//!
//! # Core Concepts
//!
//! - **Actions**: typed, namespaced records described through an
//!   [`ActionRegistry`](action::ActionRegistry)
//! - **Field reducers**: independent folds, one per slice of the state
//! - **State store**: the latest value of every field combined into one
//!   shared snapshot stream
//! - **Transformer**: rules deriving follow-up actions from actions and state
//! - **Run loop**: drivers and the application wired into one cycle
//!
//! # Example
//!
//! ```rust
//! use rivulet::action::{Action, ActionRegistry};
//! use rivulet::core::Stream;
//! use rivulet::drivers::manual::ManualDriver;
//! use rivulet::run::{RunError, RunLoop, RunOptions};
//! use rivulet::store::{FieldReducer, StateStore};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! let registry = ActionRegistry::new();
//! let add = registry.describe::<i64>("counter", "add").unwrap();
//!
//! let manual = ManualDriver::new();
//! let remote = manual.controller();
//! let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let field = add.clone();
//! let _running = RunLoop::new(RunOptions::new(registry, Default::default()))
//!     .driver(manual)
//!     .run(move |actions: Stream<Action>, _: &RunOptions| -> Result<Stream<Action>, RunError> {
//!         let store = StateStore::<Counter>::builder()
//!             .field(
//!                 FieldReducer::new("count", 0, |s: &mut Counter, v| s.count = v)
//!                     .on(&field, |count, n| count + n),
//!             )
//!             .build(&actions)?;
//!         let sink = sink.clone();
//!         Ok(store.state().filter_map(move |s| {
//!             sink.borrow_mut().push(s.count);
//!             None
//!         }))
//!     })
//!     .unwrap();
//!
//! remote.dispatch(add.create(2));
//! remote.dispatch(add.create(5));
//! assert_eq!(*seen.borrow(), vec![0, 2, 7]);
//! ```

pub mod action;
pub mod builder;
pub mod config;
pub mod core;
pub mod drivers;
pub mod maps;
pub mod run;
pub mod store;
pub mod todo;

// Re-export commonly used types
pub use action::{Action, ActionDescriptor, ActionRegistry};
pub use builder::BuildError;
pub use core::{Stream, Subject, Subscription};
pub use maps::{ActionTransformer, Guard};
pub use run::{Driver, RunLoop, RunOptions};
pub use store::{FieldReducer, StateStore};
