//! Explicitly constructed registry of action kinds.

use super::descriptor::ActionDescriptor;
use super::record::Payload;
use crate::builder::BuildError;
use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

struct Registered {
    kind: Rc<str>,
    payload: TypeId,
    payload_name: &'static str,
}

/// Registry of every action kind used by one run loop.
///
/// Kinds are namespaced (`namespace/name`), so two components can only
/// collide by naming the same namespace. Describing an existing kind again
/// with the same payload type returns an equal descriptor, which is how a
/// driver and the application agree on a shared kind such as `dom/render`;
/// describing it with a different payload type is a construction error.
///
/// The registry is a cheap handle: clones share the same table.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    kinds: Rc<RefCell<BTreeMap<String, Registered>>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope for describing kinds under `prefix`.
    pub fn namespace(&self, prefix: &str) -> Namespace {
        Namespace {
            registry: self.clone(),
            prefix: prefix.to_string(),
        }
    }

    /// Describe `namespace/name` with payload `P`.
    pub fn describe<P: Payload>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ActionDescriptor<P>, BuildError> {
        for part in [namespace, name] {
            if part.is_empty() || part.contains('/') {
                return Err(BuildError::InvalidActionName(format!("{namespace}/{name}")));
            }
        }
        let key = format!("{namespace}/{name}");
        let mut kinds = self.kinds.borrow_mut();

        if let Some(existing) = kinds.get(&key) {
            if existing.payload != TypeId::of::<P>() {
                return Err(BuildError::ConflictingAction {
                    kind: key,
                    existing: existing.payload_name,
                    requested: type_name::<P>(),
                });
            }
            return Ok(ActionDescriptor::new(Rc::clone(&existing.kind)));
        }

        let kind: Rc<str> = Rc::from(key.as_str());
        kinds.insert(
            key,
            Registered {
                kind: Rc::clone(&kind),
                payload: TypeId::of::<P>(),
                payload_name: type_name::<P>(),
            },
        );
        tracing::trace!(kind = %kind, payload = type_name::<P>(), "Registered action kind");
        Ok(ActionDescriptor::new(kind))
    }

    /// Whether `kind` has been described.
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.borrow().contains_key(kind)
    }

    /// Every registered kind, sorted.
    pub fn kinds(&self) -> Vec<String> {
        self.kinds.borrow().keys().cloned().collect()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// A registry scoped to one namespace.
#[derive(Clone, Debug)]
pub struct Namespace {
    registry: ActionRegistry,
    prefix: String,
}

impl Namespace {
    /// Describe `prefix/name` with payload `P`.
    pub fn describe<P: Payload>(&self, name: &str) -> Result<ActionDescriptor<P>, BuildError> {
        self.registry.describe(&self.prefix, name)
    }

    /// The namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_keep_equal_names_apart() {
        let registry = ActionRegistry::new();
        let todo_add = registry.namespace("todo").describe::<String>("add").unwrap();
        let tag_add = registry.namespace("tag").describe::<String>("add").unwrap();

        assert_ne!(todo_add.kind(), tag_add.kind());
        assert_eq!(todo_add.extract(&tag_add.create("x".into())), None);
        assert_eq!(registry.kinds(), vec!["tag/add", "todo/add"]);
    }

    #[test]
    fn describing_again_with_same_payload_returns_equal_descriptor() {
        let registry = ActionRegistry::new();
        let first = registry.describe::<u32>("dom", "render").unwrap();
        let second = registry.describe::<u32>("dom", "render").unwrap();

        assert_eq!(first, second);
        assert_eq!(second.extract(&first.create(3)), Some(3));
    }

    #[test]
    fn conflicting_payload_is_rejected() {
        let registry = ActionRegistry::new();
        registry.describe::<u32>("dom", "render").unwrap();

        let result = registry.describe::<String>("dom", "render");

        assert!(matches!(result, Err(BuildError::ConflictingAction { .. })));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let registry = ActionRegistry::new();

        assert!(matches!(
            registry.describe::<()>("", "x"),
            Err(BuildError::InvalidActionName(_))
        ));
        assert!(matches!(
            registry.describe::<()>("todo", "a/b"),
            Err(BuildError::InvalidActionName(_))
        ));
        assert!(!registry.contains("todo/a/b"));
    }
}
