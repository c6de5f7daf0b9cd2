//! Declarative view trees.

use super::event::{DomEvent, EventKind};
use super::selector::{Compound, Selector};
use crate::action::{Action, ActionDescriptor, Payload};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

type Handler = Rc<dyn Fn(&DomEvent) -> Option<Action>>;

/// An event listener attached to a node, producing an action.
#[derive(Clone)]
pub struct Binding {
    event: EventKind,
    handler: Handler,
}

impl Binding {
    /// The event kind this binding listens for.
    pub fn event(&self) -> EventKind {
        self.event
    }

    /// The action produced for `event`, if this binding listens for it.
    pub fn fire(&self, event: &DomEvent) -> Option<Action> {
        if event.kind() == self.event {
            (self.handler)(event)
        } else {
            None
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("event", &self.event).finish()
    }
}

/// The capabilities a view is given to describe its output.
///
/// Views build nodes with [`ViewContext::create`] and attach behavior with
/// [`ViewContext::emit`]; they have no other way to reach the loop.
#[derive(Debug, Default)]
pub struct ViewContext {
    _private: (),
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node from a compound selector such as `input.new-todo`.
    ///
    /// The tag defaults to `div`. Attributes written in the selector are
    /// set on the node.
    pub fn create(&self, selector: &str) -> VNode {
        let compound = match Compound::parse(selector) {
            Ok(compound) => compound,
            Err(error) => {
                tracing::warn!(selector = %selector, error = %error, "Invalid node selector");
                Compound::default()
            }
        };
        VNode {
            tag: compound.tag.unwrap_or_else(|| "div".to_string()),
            id: compound.id,
            classes: compound.classes,
            attrs: compound
                .attrs
                .into_iter()
                .map(|(name, value)| (name, value.unwrap_or_default()))
                .collect(),
            bindings: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Bind `event` to an action of kind `action`.
    ///
    /// `payload` picks the payload out of the event; returning `None` emits
    /// nothing.
    pub fn emit<P, F>(&self, event: EventKind, action: &ActionDescriptor<P>, payload: F) -> Binding
    where
        P: Payload,
        F: Fn(&DomEvent) -> Option<P> + 'static,
    {
        let action = action.clone();
        Binding {
            event,
            handler: Rc::new(move |dom_event: &DomEvent| payload(dom_event).map(|p| action.create(p))),
        }
    }
}

/// A node of a rendered view.
#[derive(Clone)]
pub struct VNode {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    bindings: Vec<Binding>,
    children: Vec<VNode>,
    text: Option<String>,
}

impl VNode {
    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Set a boolean attribute, present only when `on` holds.
    pub fn flag(mut self, name: impl Into<String>, on: bool) -> Self {
        let name = name.into();
        if on {
            self.attrs.insert(name, String::new());
        } else {
            self.attrs.remove(&name);
        }
        self
    }

    /// Add a class when `on` holds.
    pub fn class_if(mut self, class: impl Into<String>, on: bool) -> Self {
        let class = class.into();
        if on && !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Attach an event binding.
    pub fn on(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Append a child.
    pub fn child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append children in order.
    pub fn children(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the node's own text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute value; boolean attributes read as an empty string.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn own_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child_nodes(&self) -> &[VNode] {
        &self.children
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Text of this node and all its descendants, concatenated.
    pub fn text_content(&self) -> String {
        let mut content = self.text.clone().unwrap_or_default();
        for child in &self.children {
            content.push_str(&child.text_content());
        }
        content
    }

    /// First node matching `selector`. Malformed selectors match nothing.
    pub fn find(&self, selector: &str) -> Option<&VNode> {
        self.find_all(selector).into_iter().next()
    }

    /// Every node matching `selector`, in document order. Malformed
    /// selectors match nothing.
    pub fn find_all(&self, selector: &str) -> Vec<&VNode> {
        match Selector::parse(selector) {
            Ok(selector) => selector.select(self),
            Err(error) => {
                tracing::warn!(error = %error, "Ignoring malformed selector");
                Vec::new()
            }
        }
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("classes", &self.classes)
            .field("attrs", &self.attrs)
            .field("bindings", &self.bindings)
            .field("text", &self.text)
            .field("children", &self.children)
            .finish()
    }
}
