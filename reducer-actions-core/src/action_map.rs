//! Name -> update function tables and the reducer that resolves them

use std::any::{type_name, Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::action::{NamedAction, PayloadAction};
use crate::Action;

type PayloadlessFn<S> = Rc<dyn Fn(&S) -> S>;
type ErasedPayloadFn<S> = Rc<dyn Fn(&S, &dyn Any) -> Option<S>>;

/// Calling convention of an action, fixed when it is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionShape {
    /// Called with no arguments, updates with `(state) -> state`
    Payloadless,
    /// Called with one argument, updates with `(state, PayloadAction<P>) -> state`
    Payload {
        type_id: TypeId,
        type_name: &'static str,
    },
}

impl ActionShape {
    pub fn takes_payload(&self) -> bool {
        matches!(self, ActionShape::Payload { .. })
    }
}

/// A pure update function tagged with its calling convention
pub enum UpdateFn<S> {
    Payloadless(PayloadlessFn<S>),
    Payload {
        type_id: TypeId,
        type_name: &'static str,
        apply: ErasedPayloadFn<S>,
    },
}

impl<S> Clone for UpdateFn<S> {
    fn clone(&self) -> Self {
        match self {
            UpdateFn::Payloadless(f) => UpdateFn::Payloadless(Rc::clone(f)),
            UpdateFn::Payload {
                type_id,
                type_name,
                apply,
            } => UpdateFn::Payload {
                type_id: *type_id,
                type_name: *type_name,
                apply: Rc::clone(apply),
            },
        }
    }
}

impl<S> fmt::Debug for UpdateFn<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UpdateFn").field(&self.shape()).finish()
    }
}

impl<S: 'static> UpdateFn<S> {
    pub fn payloadless<F>(f: F) -> Self
    where
        F: Fn(&S) -> S + 'static,
    {
        UpdateFn::Payloadless(Rc::new(f))
    }

    pub fn payload<P, F>(f: F) -> Self
    where
        P: 'static,
        F: Fn(&S, &PayloadAction<P>) -> S + 'static,
    {
        UpdateFn::Payload {
            type_id: TypeId::of::<P>(),
            type_name: type_name::<P>(),
            apply: Rc::new(move |state: &S, payload: &dyn Any| {
                payload
                    .downcast_ref::<PayloadAction<P>>()
                    .map(|action| f(state, action))
            }),
        }
    }
}

impl<S> UpdateFn<S> {
    pub fn shape(&self) -> ActionShape {
        match self {
            UpdateFn::Payloadless(_) => ActionShape::Payloadless,
            UpdateFn::Payload {
                type_id, type_name, ..
            } => ActionShape::Payload {
                type_id: *type_id,
                type_name: *type_name,
            },
        }
    }

    /// Apply to `state`. Returns `None` when `action` does not carry the
    /// payload this function was registered with.
    pub fn apply(&self, state: &S, action: &NamedAction) -> Option<S> {
        match self {
            UpdateFn::Payloadless(f) => Some(f(state)),
            UpdateFn::Payload {
                type_name, apply, ..
            } => {
                let Some(payload) = action.payload_any() else {
                    tracing::warn!(
                        action = %action.name(),
                        expected = %type_name,
                        "payload action dispatched without a payload"
                    );
                    return None;
                };
                let next = apply(state, payload);
                if next.is_none() {
                    tracing::warn!(
                        action = %action.name(),
                        expected = %type_name,
                        found = ?action.payload_type(),
                        "payload has the wrong type"
                    );
                }
                next
            }
        }
    }
}

/// Caller-supplied table of action name -> update function.
///
/// Cloning is cheap: update functions are reference counted.
///
/// # Example
/// ```
/// use reducer_actions_core::{ActionMap, PayloadAction};
///
/// let map = ActionMap::<Vec<String>>::new()
///     .action("clear", |_| Vec::new())
///     .payload_action("push", |items: &Vec<String>, action: &PayloadAction<String>| {
///         let mut items = items.clone();
///         items.push(String::clone(&action.payload));
///         items
///     });
///
/// assert_eq!(map.len(), 2);
/// assert!(map.shape("push").unwrap().takes_payload());
/// ```
pub struct ActionMap<S> {
    entries: BTreeMap<String, UpdateFn<S>>,
}

impl<S> Default for ActionMap<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S> Clone for ActionMap<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S> fmt::Debug for ActionMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v.shape())))
            .finish()
    }
}

impl<S: 'static> ActionMap<S> {
    /// Register an action that takes no payload
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&S) -> S + 'static,
    {
        self.insert(name, UpdateFn::payloadless(f));
        self
    }

    /// Register an action whose update function reads `action.payload`
    pub fn payload_action<P, F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        P: 'static,
        F: Fn(&S, &PayloadAction<P>) -> S + 'static,
    {
        self.insert(name, UpdateFn::payload(f));
        self
    }
}

impl<S> ActionMap<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous one
    pub fn insert(&mut self, name: impl Into<String>, update: UpdateFn<S>) -> Option<UpdateFn<S>> {
        self.entries.insert(name.into(), update)
    }

    pub fn remove(&mut self, name: &str) -> Option<UpdateFn<S>> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&UpdateFn<S>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn shape(&self, name: &str) -> Option<ActionShape> {
        self.entries.get(name).map(UpdateFn::shape)
    }

    /// Action names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UpdateFn<S>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `action` by name and apply its update function.
    ///
    /// Returns `None` (no transition) for unknown names and for payload
    /// records that don't match the registered payload type.
    pub fn reduce(&self, state: &S, action: &NamedAction) -> Option<S> {
        match self.entries.get(action.name()) {
            Some(update) => update.apply(state, action),
            None => {
                tracing::debug!(action = %action.name(), "unknown action, state unchanged");
                None
            }
        }
    }
}

impl<S> FromIterator<(String, UpdateFn<S>)> for ActionMap<S> {
    fn from_iter<T: IntoIterator<Item = (String, UpdateFn<S>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_map() -> ActionMap<i32> {
        ActionMap::new()
            .action("increment", |n| n + 1)
            .action("reset", |_| 0)
            .payload_action("add", |n: &i32, action: &PayloadAction<i32>| {
                n + action.payload
            })
    }

    #[test]
    fn test_reduce_payloadless() {
        let map = counter_map();
        assert_eq!(map.reduce(&1, &NamedAction::payloadless("increment")), Some(2));
        assert_eq!(map.reduce(&7, &NamedAction::payloadless("reset")), Some(0));
    }

    #[test]
    fn test_reduce_payload() {
        let map = counter_map();
        assert_eq!(map.reduce(&1, &NamedAction::with_payload("add", 41)), Some(42));
    }

    #[test]
    fn test_reduce_unknown_is_noop() {
        let map = counter_map();
        assert_eq!(map.reduce(&1, &NamedAction::payloadless("missing")), None);
    }

    #[test]
    fn test_reduce_payload_mismatch_is_noop() {
        let map = counter_map();
        assert_eq!(map.reduce(&1, &NamedAction::payloadless("add")), None);
        assert_eq!(map.reduce(&1, &NamedAction::with_payload("add", 1_u8)), None);
    }

    #[test]
    fn test_payloadless_ignores_stray_payload() {
        let map = counter_map();
        assert_eq!(
            map.reduce(&1, &NamedAction::with_payload("increment", 10)),
            Some(2)
        );
    }

    #[test]
    fn test_shapes() {
        let map = counter_map();
        assert_eq!(map.shape("increment"), Some(ActionShape::Payloadless));
        assert_eq!(
            map.shape("add"),
            Some(ActionShape::Payload {
                type_id: TypeId::of::<i32>(),
                type_name: type_name::<i32>(),
            })
        );
        assert_eq!(map.shape("missing"), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut map = counter_map();
        let previous = map.insert("increment", UpdateFn::payloadless(|n: &i32| n + 10));
        assert!(previous.is_some());
        assert_eq!(map.len(), 3);
        assert_eq!(map.reduce(&0, &NamedAction::payloadless("increment")), Some(10));
    }

    #[test]
    fn test_names_sorted() {
        let map = counter_map();
        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["add", "increment", "reset"]);
    }
}
