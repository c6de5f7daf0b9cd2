//! Macros for declaring action kinds.

/// Declare a struct holding the descriptors of one namespace.
///
/// Every field becomes a public [`ActionDescriptor`](crate::action::ActionDescriptor)
/// for the kind `namespace/field`, and the generated `describe` function
/// registers them all.
///
/// # Example
///
/// ```
/// use rivulet::actions;
/// use rivulet::action::ActionRegistry;
///
/// actions! {
///     pub struct CounterActions in "counter" {
///         increment: u32,
///         reset: (),
///     }
/// }
///
/// let registry = ActionRegistry::new();
/// let counter = CounterActions::describe(&registry).unwrap();
/// assert_eq!(counter.increment.kind(), "counter/increment");
/// assert_eq!(CounterActions::NAMESPACE, "counter");
/// ```
#[macro_export]
macro_rules! actions {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident in $namespace:literal {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $payload:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::action::ActionDescriptor<$payload>,
            )*
        }

        impl $name {
            /// Namespace every kind of this set lives in.
            pub const NAMESPACE: &'static str = $namespace;

            /// Register every kind of this set.
            pub fn describe(
                registry: &$crate::action::ActionRegistry,
            ) -> ::std::result::Result<Self, $crate::builder::BuildError> {
                let namespace = registry.namespace($namespace);
                Ok(Self {
                    $($field: namespace.describe(stringify!($field))?,)*
                })
            }
        }
    };
}
