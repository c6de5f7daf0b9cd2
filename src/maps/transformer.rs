//! Follow-on actions computed from actions and state.

use super::error::MappingError;
use crate::action::Action;
use crate::builder::TransformerBuilder;
use crate::core::{merge, Notification, Stream, Subscriber, Subscription};
use std::fmt;
use std::rc::Rc;

/// How a rule derives its actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleShape {
    /// One action kind maps unconditionally to another.
    Map,
    /// A payload predicate decides whether the map fires.
    Gated,
    /// An action is combined with the latest state when it fires.
    Sampled,
    /// Every state snapshot maps to an action.
    StateDriven,
}

pub(crate) type RuleOutput = Stream<Result<Action, MappingError>>;

type RuleFn<S> = Box<dyn Fn(&Stream<Action>, &Stream<Rc<S>>) -> RuleOutput>;

pub(crate) struct Rule<S> {
    pub(crate) name: String,
    pub(crate) shape: RuleShape,
    pub(crate) derive: RuleFn<S>,
}

/// Stateless rules deriving follow-on actions.
///
/// Every rule runs independently and their outputs are interleaved. For a
/// single incoming action, rules respond in the order they were declared.
/// Sampled rules read the state as of the moment the action fires; a state
/// change on its own never triggers a sample.
///
/// A rule that fails is logged and disabled without affecting the others.
pub struct ActionTransformer<S> {
    rules: Vec<Rule<S>>,
}

impl<S: 'static> ActionTransformer<S> {
    /// Start building a transformer.
    pub fn builder() -> TransformerBuilder<S> {
        TransformerBuilder::new()
    }

    pub(crate) fn from_rules(rules: Vec<Rule<S>>) -> Self {
        Self { rules }
    }

    /// Derive the follow-on actions of `actions` given `state`.
    ///
    /// `state` is subscribed before any rule, so an action reaches the state
    /// ahead of every rule reacting to it. An error terminating `state`
    /// terminates the result.
    pub fn apply(&self, actions: &Stream<Action>, state: &Stream<Rc<S>>) -> Stream<Action> {
        let outputs = self
            .rules
            .iter()
            .map(|rule| isolate(&rule.name, (rule.derive)(actions, state)))
            .collect();
        let rules = merge(outputs);
        let state = state.clone();

        Stream::new(move |subscriber: Subscriber<Action>| {
            let subscription = Subscription::new();
            let failed = subscriber.clone();
            subscription.add(state.subscribe_with(move |notification| {
                if let Notification::Error(error) = notification {
                    failed.error(error);
                }
            }));
            if !subscriber.is_closed() {
                subscription.add(rules.subscribe_with(move |n| subscriber.notify(n)));
            }
            subscription
        })
    }

    /// Rule names and shapes, in declaration order.
    pub fn rules(&self) -> Vec<(&str, RuleShape)> {
        self.rules
            .iter()
            .map(|rule| (rule.name.as_str(), rule.shape))
            .collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the transformer has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S> fmt::Debug for ActionTransformer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<(&str, RuleShape)> = self
            .rules
            .iter()
            .map(|rule| (rule.name.as_str(), rule.shape))
            .collect();
        f.debug_struct("ActionTransformer")
            .field("rules", &rules)
            .finish()
    }
}

/// Run one rule so that its failure stays its own.
///
/// The first error is logged and detaches the rule from its sources for
/// the rest of that subscription; the rule is not called again.
fn isolate(name: &str, output: RuleOutput) -> Stream<Action> {
    let name = name.to_string();
    Stream::new(move |subscriber: Subscriber<Action>| {
        let branch = Subscription::new();
        let detach = branch.clone();
        let name = name.clone();
        branch.add(output.subscribe_with(move |notification| match notification {
            Notification::Next(Ok(action)) => subscriber.next(action),
            Notification::Next(Err(error)) => {
                tracing::error!(rule = %name, error = %error, "Transformer rule failed, disabling it");
                detach.unsubscribe();
            }
            Notification::Error(error) => subscriber.error(error),
            Notification::Complete => subscriber.complete(),
        }));
        branch
    })
}
