//! Payload predicates for gated rules.

use std::fmt;
use std::rc::Rc;

/// Pure predicate deciding whether a gated rule fires for a payload.
///
/// Guards are evaluated once per matching action, before the rule's
/// mapping runs. They must be deterministic and free of side effects.
///
/// # Example
///
/// ```rust
/// use rivulet::maps::Guard;
///
/// let non_blank = Guard::new(|text: &String| !text.trim().is_empty());
///
/// assert!(non_blank.check(&"milk".to_string()));
/// assert!(!non_blank.check(&"   ".to_string()));
/// ```
pub struct Guard<P> {
    predicate: Rc<dyn Fn(&P) -> bool>,
}

impl<P> Clone for Guard<P> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<P: 'static> Guard<P> {
    /// Create a guard from a pure predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&P) -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Guard passing only payloads equal to `expected`.
    pub fn equals(expected: P) -> Self
    where
        P: PartialEq,
    {
        Self::new(move |payload| *payload == expected)
    }

    /// Check whether the guard lets `payload` through.
    pub fn check(&self, payload: &P) -> bool {
        (self.predicate)(payload)
    }

    /// Guard passing payloads that pass both guards.
    pub fn and(self, other: Guard<P>) -> Self {
        Self::new(move |payload| self.check(payload) && other.check(payload))
    }
}

impl<P> fmt::Debug for Guard<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Key {
        Enter,
        Escape,
        Other,
    }

    #[test]
    fn guard_allows_matching_payloads() {
        let guard = Guard::new(|k: &Key| matches!(k, Key::Enter));

        assert!(guard.check(&Key::Enter));
        assert!(!guard.check(&Key::Escape));
    }

    #[test]
    fn equals_guard_compares_payloads() {
        let guard = Guard::equals(Key::Escape);

        assert!(guard.check(&Key::Escape));
        assert!(!guard.check(&Key::Other));
    }

    #[test]
    fn guards_combine_with_and() {
        let guard = Guard::new(|n: &i32| *n > 0).and(Guard::new(|n: &i32| n % 2 == 0));

        assert!(guard.check(&4));
        assert!(!guard.check(&3));
        assert!(!guard.check(&-2));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new(|k: &Key| !matches!(k, Key::Other));

        assert_eq!(guard.check(&Key::Enter), guard.check(&Key::Enter));
    }
}
