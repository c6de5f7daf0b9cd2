//! Headless render target.
//!
//! The DOM driver renders every `dom/render` action through a view
//! function into a tree of [`VNode`]s kept in memory. Callers interact with
//! the rendered tree through a [`DomHandle`], dispatching [`DomEvent`]s at
//! selectors; bound events come back into the loop as actions.

mod event;
mod selector;
mod vnode;

pub use event::{DomEvent, EventKind, Key};
pub use selector::Selector;
pub use vnode::{Binding, VNode, ViewContext};

use crate::action::{Action, ActionDescriptor, ActionRegistry};
use crate::builder::BuildError;
use crate::core::{merge, Stream, Subject};
use crate::run::{Driver, DriverError, RunOptions};
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use thiserror::Error;

/// Namespace of the DOM driver's action kinds.
pub const NAMESPACE: &str = "dom";

/// Describe the `dom/render` kind carrying state snapshots of type `S`.
pub fn describe_render<S>(registry: &ActionRegistry) -> Result<ActionDescriptor<Rc<S>>, BuildError>
where
    S: Debug + PartialEq + 'static,
{
    registry.describe(NAMESPACE, "render")
}

/// Errors from interacting with the rendered tree.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomError {
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Nothing has been rendered yet")]
    NotRendered,

    #[error("No element matches `{0}`")]
    NoMatch(String),
}

type View<S> = Rc<dyn Fn(&S, &ViewContext) -> VNode>;

#[derive(Default)]
struct Document {
    tree: Option<VNode>,
    renders: usize,
}

/// Renders state snapshots through a view and emits bound interactions.
pub struct DomDriver<S> {
    root: String,
    view: View<S>,
    document: Rc<RefCell<Document>>,
    events: Subject<Action>,
}

impl<S: Debug + PartialEq + 'static> DomDriver<S> {
    /// Render `view` under a root node created from the `root` selector.
    pub fn new<F>(root: impl Into<String>, view: F) -> Self
    where
        F: Fn(&S, &ViewContext) -> VNode + 'static,
    {
        Self {
            root: root.into(),
            view: Rc::new(view),
            document: Rc::new(RefCell::new(Document::default())),
            events: Subject::new(),
        }
    }

    /// Handle for inspecting and interacting with the rendered tree.
    pub fn controller(&self) -> DomHandle {
        DomHandle {
            document: Rc::clone(&self.document),
            events: self.events.clone(),
        }
    }
}

impl<S: Debug + PartialEq + 'static> Driver for DomDriver<S> {
    fn name(&self) -> &str {
        "dom"
    }

    fn handle(
        &mut self,
        inbound: Stream<Action>,
        options: &RunOptions,
    ) -> Result<Stream<Action>, DriverError> {
        let render = describe_render::<S>(&options.registry)?;
        Selector::parse(&self.root).map_err(|error| DriverError::InvalidConfig(error.to_string()))?;

        let root = self.root.clone();
        let view = Rc::clone(&self.view);
        let document = Rc::clone(&self.document);
        let renders = render.matches(&inbound).filter_map(move |state: Rc<S>| {
            let cx = ViewContext::new();
            let tree = cx.create(&root).child(view(&state, &cx));
            let mut document = document.borrow_mut();
            document.tree = Some(tree);
            document.renders += 1;
            tracing::trace!(renders = document.renders, "Rendered view");
            None
        });

        Ok(merge(vec![renders, self.events.stream()]))
    }
}

/// Caller side of a [`DomDriver`].
#[derive(Clone)]
pub struct DomHandle {
    document: Rc<RefCell<Document>>,
    events: Subject<Action>,
}

impl DomHandle {
    /// Deliver `event` to every element matching `selector`.
    ///
    /// Returns how many actions the event produced. Actions are collected
    /// from the current tree before any is emitted, so a re-render caused by
    /// the first action does not change which bindings fire.
    pub fn dispatch(&self, selector: &str, event: DomEvent) -> Result<usize, DomError> {
        let parsed = Selector::parse(selector)?;
        let actions: Vec<Action> = {
            let document = self.document.borrow();
            let tree = document.tree.as_ref().ok_or(DomError::NotRendered)?;
            let targets = parsed.select(tree);
            if targets.is_empty() {
                return Err(DomError::NoMatch(selector.to_string()));
            }
            targets
                .iter()
                .flat_map(|node| node.bindings())
                .filter_map(|binding| binding.fire(&event))
                .collect()
        };

        tracing::debug!(selector = %selector, event = ?event.kind(), actions = actions.len(), "Dispatching DOM event");
        let count = actions.len();
        for action in actions {
            self.events.next(action);
        }
        Ok(count)
    }

    /// A copy of the current tree.
    pub fn tree(&self) -> Option<VNode> {
        self.document.borrow().tree.clone()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.document.borrow().renders
    }

    /// Text content of the first element matching `selector`.
    pub fn text(&self, selector: &str) -> Option<String> {
        let document = self.document.borrow();
        let tree = document.tree.as_ref()?;
        tree.find(selector).map(VNode::text_content)
    }

    /// Number of elements matching `selector`.
    pub fn count(&self, selector: &str) -> usize {
        let document = self.document.borrow();
        document
            .tree
            .as_ref()
            .map_or(0, |tree| tree.find_all(selector).len())
    }
}
