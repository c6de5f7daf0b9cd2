//! Builder for state stores.

use crate::action::Action;
use crate::builder::error::BuildError;
use crate::builder::validate_names;
use crate::core::Stream;
use crate::store::{Field, FieldReducer, StateStore};

/// Builder for [`StateStore`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use rivulet::action::ActionRegistry;
/// use rivulet::core::Subject;
/// use rivulet::store::{FieldReducer, StateStore};
///
/// #[derive(Default)]
/// struct Editor {
///     text: String,
///     saved: bool,
/// }
///
/// let registry = ActionRegistry::new();
/// let typed = registry.describe::<String>("editor", "typed").unwrap();
/// let save = registry.describe::<()>("editor", "save").unwrap();
/// let actions = Subject::new();
///
/// let store = StateStore::builder()
///     .field(
///         FieldReducer::new("text", String::new(), |e: &mut Editor, v| e.text = v)
///             .on(&typed, |_, text| text),
///     )
///     .field(
///         FieldReducer::new("saved", false, |e: &mut Editor, v| e.saved = v)
///             .on(&typed, |_, _| false)
///             .on(&save, |_, ()| true),
///     )
///     .build(&actions.stream())
///     .unwrap();
///
/// assert_eq!(store.field_names(), ["text", "saved"]);
/// ```
pub struct StoreBuilder<S> {
    fields: Vec<Box<dyn Field<S>>>,
}

impl<S: Default + 'static> StoreBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field.
    pub fn field<V: Clone + 'static>(mut self, field: FieldReducer<S, V>) -> Self {
        self.fields.push(Box::new(field));
        self
    }

    /// Build the store over `actions`.
    ///
    /// Returns every violation found: a store without fields, and each
    /// field name declared more than once.
    pub fn build(self, actions: &Stream<Action>) -> Result<StateStore<S>, BuildError> {
        let names: Vec<&str> = self.fields.iter().map(|field| field.name()).collect();
        validate_names(&names, BuildError::NoFields, BuildError::DuplicateField)?;

        tracing::debug!(fields = ?names, "Building state store");
        Ok(StateStore::assemble(self.fields, actions))
    }
}

impl<S: Default + 'static> Default for StoreBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
