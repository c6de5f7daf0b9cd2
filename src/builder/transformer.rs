//! Builder for action transformers.

use crate::action::{Action, ActionDescriptor, Payload};
use crate::builder::error::BuildError;
use crate::builder::validate_names;
use crate::core::Stream;
use crate::maps::{ActionTransformer, Guard, MappingError, Rule, RuleOutput, RuleShape};
use std::rc::Rc;

/// Builder for [`ActionTransformer`] with a fluent API.
///
/// Every rule is named so failures can be traced back to it. Rules respond
/// to a shared action in the order they are added here.
///
/// # Example
///
/// ```rust
/// use rivulet::action::ActionRegistry;
/// use rivulet::maps::{ActionTransformer, Guard};
///
/// struct Search {
///     query: String,
/// }
///
/// let registry = ActionRegistry::new();
/// let key = registry.describe::<u32>("search", "key").unwrap();
/// let submit = registry.describe::<String>("search", "submit").unwrap();
///
/// let transformer = ActionTransformer::<Search>::builder()
///     .sample("submit-on-enter", &key, move |code, state: &Search| {
///         (code == 13).then(|| submit.create(state.query.clone()))
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(transformer.len(), 1);
/// ```
pub struct TransformerBuilder<S> {
    rules: Vec<Rule<S>>,
}

impl<S: 'static> TransformerBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    fn rule<F>(mut self, name: impl Into<String>, shape: RuleShape, derive: F) -> Self
    where
        F: Fn(&Stream<Action>, &Stream<Rc<S>>) -> RuleOutput + 'static,
    {
        self.rules.push(Rule {
            name: name.into(),
            shape,
            derive: Box::new(derive),
        });
        self
    }

    /// Map every action of kind `from` to another action.
    pub fn map<P, F>(self, name: impl Into<String>, from: &ActionDescriptor<P>, f: F) -> Self
    where
        P: Payload,
        F: Fn(P) -> Action + 'static,
    {
        self.try_map(name, from, move |payload| Ok(f(payload)))
    }

    /// Like [`TransformerBuilder::map`] for mappings that can fail.
    pub fn try_map<P, F>(self, name: impl Into<String>, from: &ActionDescriptor<P>, f: F) -> Self
    where
        P: Payload,
        F: Fn(P) -> Result<Action, MappingError> + 'static,
    {
        let from = from.clone();
        let f = Rc::new(f);
        self.rule(name, RuleShape::Map, move |actions, _| {
            let f = Rc::clone(&f);
            from.matches(actions).map(move |payload| f(payload))
        })
    }

    /// Map actions of kind `from` whose payload passes `guard`.
    pub fn gate<P, F>(
        self,
        name: impl Into<String>,
        from: &ActionDescriptor<P>,
        guard: Guard<P>,
        f: F,
    ) -> Self
    where
        P: Payload,
        F: Fn(P) -> Action + 'static,
    {
        let from = from.clone();
        let f = Rc::new(f);
        self.rule(name, RuleShape::Gated, move |actions, _| {
            let f = Rc::clone(&f);
            let guard = guard.clone();
            from.matches(actions)
                .filter(move |payload| guard.check(payload))
                .map(move |payload| Ok(f(payload)))
        })
    }

    /// Combine each action of kind `from` with the latest state.
    ///
    /// Returning `None` emits nothing for that action.
    pub fn sample<P, F>(self, name: impl Into<String>, from: &ActionDescriptor<P>, f: F) -> Self
    where
        P: Payload,
        F: Fn(P, &S) -> Option<Action> + 'static,
    {
        self.try_sample(name, from, move |payload, state| Ok(f(payload, state)))
    }

    /// Like [`TransformerBuilder::sample`] for samples that can fail.
    pub fn try_sample<P, F>(self, name: impl Into<String>, from: &ActionDescriptor<P>, f: F) -> Self
    where
        P: Payload,
        F: Fn(P, &S) -> Result<Option<Action>, MappingError> + 'static,
    {
        let from = from.clone();
        let f = Rc::new(f);
        self.rule(name, RuleShape::Sampled, move |actions, state| {
            let f = Rc::clone(&f);
            from.matches(actions)
                .with_latest_from(state)
                .filter_map(move |(payload, state)| f(payload, &state).transpose())
        })
    }

    /// Map every state snapshot to an action.
    pub fn on_state<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Rc<S>) -> Action + 'static,
    {
        let f = Rc::new(f);
        self.rule(name, RuleShape::StateDriven, move |_, state| {
            let f = Rc::clone(&f);
            state.map(move |snapshot| Ok(f(snapshot)))
        })
    }

    /// Build the transformer.
    ///
    /// Returns every violation found: a transformer without rules, and each
    /// rule name declared more than once.
    pub fn build(self) -> Result<ActionTransformer<S>, BuildError> {
        let names: Vec<&str> = self.rules.iter().map(|rule| rule.name.as_str()).collect();
        validate_names(&names, BuildError::NoRules, BuildError::DuplicateRule)?;

        tracing::debug!(rules = ?names, "Building action transformer");
        Ok(ActionTransformer::from_rules(self.rules))
    }
}

impl<S: 'static> Default for TransformerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionRegistry;

    struct Empty;

    #[test]
    fn builder_requires_rules() {
        let result = TransformerBuilder::<Empty>::new().build();

        assert!(matches!(result, Err(BuildError::NoRules)));
    }

    #[test]
    fn builder_rejects_duplicate_rule_names() {
        let registry = ActionRegistry::new();
        let ping = registry.describe::<()>("test", "ping").unwrap();
        let a = ping.clone();
        let b = ping.clone();

        let result = TransformerBuilder::<Empty>::new()
            .map("echo", &ping, move |()| a.create(()))
            .map("echo", &ping, move |()| b.create(()))
            .build();

        assert!(matches!(result, Err(BuildError::DuplicateRule(name)) if name == "echo"));
    }

    #[test]
    fn every_shape_is_recorded() {
        let registry = ActionRegistry::new();
        let ping = registry.describe::<u8>("test", "ping").unwrap();
        let out = registry.describe::<()>("test", "out").unwrap();
        let (a, b, c, d) = (out.clone(), out.clone(), out.clone(), out.clone());

        let transformer = TransformerBuilder::<Empty>::new()
            .map("map", &ping, move |_| a.create(()))
            .gate("gate", &ping, Guard::equals(1), move |_| b.create(()))
            .sample("sample", &ping, move |_, _| Some(c.create(())))
            .on_state("state", move |_| d.create(()))
            .build()
            .unwrap();

        let shapes: Vec<RuleShape> = transformer.rules().into_iter().map(|(_, s)| s).collect();
        assert_eq!(
            shapes,
            vec![
                RuleShape::Map,
                RuleShape::Gated,
                RuleShape::Sampled,
                RuleShape::StateDriven
            ]
        );
    }
}
