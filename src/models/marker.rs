use std::fmt;

/// When a marker applies. Predicates are evaluated every time the marker is
/// resolved, so conditions like "only on this platform" or "only when an
/// env var is set" stay dynamic.
pub enum Condition {
    Static(bool),
    Predicate(Box<dyn Fn() -> bool>),
}

impl Condition {
    pub fn evaluate(&self) -> bool {
        match self {
            Condition::Static(value) => *value,
            Condition::Predicate(predicate) => predicate(),
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Static(true)
    }
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        Condition::Static(value)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Skip,
    ExpectFail,
}

/// Conditional execution policy attached to a test.
#[derive(Debug)]
pub struct Marker {
    kind: MarkerKind,
    reason: Option<String>,
    when: Condition,
}

impl Marker {
    pub fn new(kind: MarkerKind, options: MarkerOptions) -> Self {
        Self {
            kind,
            reason: options.reason,
            when: options.when,
        }
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Evaluates the `when` condition. Never cached.
    pub fn is_active(&self) -> bool {
        self.when.evaluate()
    }
}

/// Arguments of the `skip` and `expectfail` registration calls.
///
/// `MarkerOptions::default()` is the bare form (no reason, always active);
/// a `&str` or `String` converts into the reason-only shorthand.
#[derive(Debug, Default)]
pub struct MarkerOptions {
    reason: Option<String>,
    when: Condition,
}

impl MarkerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn when(mut self, active: bool) -> Self {
        self.when = Condition::Static(active);
        self
    }

    pub fn when_fn<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.when = Condition::Predicate(Box::new(predicate));
        self
    }
}

impl From<&str> for MarkerOptions {
    fn from(reason: &str) -> Self {
        MarkerOptions::new().reason(reason)
    }
}

impl From<String> for MarkerOptions {
    fn from(reason: String) -> Self {
        MarkerOptions::new().reason(reason)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn bare_marker_is_active_without_reason() {
        let marker = Marker::new(MarkerKind::Skip, MarkerOptions::default());
        assert!(marker.is_active());
        assert_eq!(marker.reason(), None);
    }

    #[test]
    fn reason_shorthand_matches_builder() {
        let marker = Marker::new(MarkerKind::ExpectFail, "not completed".into());
        assert_eq!(marker.reason(), Some("not completed"));
        assert!(marker.is_active());
    }

    #[test]
    fn predicate_is_evaluated_on_every_call() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let marker = Marker::new(
            MarkerKind::Skip,
            MarkerOptions::new().when_fn(move || {
                seen.set(seen.get() + 1);
                seen.get() % 2 == 0
            }),
        );

        assert!(!marker.is_active());
        assert!(marker.is_active());
        assert_eq!(calls.get(), 2);
    }
}
