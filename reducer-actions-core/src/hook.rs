//! Per-component hook: state plus bound actions in one call

use std::cell::RefCell;
use std::rc::Rc;

use crate::action::NamedAction;
use crate::action_map::ActionMap;
use crate::binder::{bind_actions, BoundActions};
use crate::store::Store;

/// Owns the store and bound actions of one component instance.
///
/// Call [`bind`](Self::bind) on every render with the component's action map
/// and initial state:
///
/// - the initial state is used only on the first call
/// - the map passed last is the one the reducer consults, so an update
///   function replaced between renders takes effect immediately
/// - the bound actions are rebuilt only when the set of names (or their
///   calling conventions) changes, otherwise the same `Rc` is returned
///
/// # Example
/// ```
/// use reducer_actions_core::{ActionMap, PayloadAction, ReducerActions};
///
/// let actions = ActionMap::new()
///     .action("reset", |_: &i32| 0)
///     .payload_action("add", |n: &i32, action: &PayloadAction<i32>| n + action.payload);
///
/// let mut hook = ReducerActions::new();
/// let (state, bound) = hook.bind(actions.clone(), 1);
/// assert_eq!(*state, 1);
///
/// bound.action("add").unwrap().call_with(2).unwrap();
/// let (state, _) = hook.bind(actions, 1);
/// assert_eq!(*state, 3);
/// ```
pub struct ReducerActions<S> {
    current: Rc<RefCell<Rc<ActionMap<S>>>>,
    store: Option<Rc<Store<S, NamedAction>>>,
    bound: Option<Rc<BoundActions<S>>>,
}

impl<S: 'static> Default for ReducerActions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> ReducerActions<S> {
    pub fn new() -> Self {
        Self {
            current: Rc::new(RefCell::new(Rc::new(ActionMap::new()))),
            store: None,
            bound: None,
        }
    }

    /// Return the current state and the bound actions for `map`.
    ///
    /// `initial` is ignored after the first call.
    pub fn bind(&mut self, map: ActionMap<S>, initial: S) -> (Rc<S>, Rc<BoundActions<S>>) {
        self.bind_with(map, || initial)
    }

    /// Like [`bind`](Self::bind), but the initial state is only computed on
    /// the first call.
    pub fn bind_with<F>(&mut self, map: ActionMap<S>, init: F) -> (Rc<S>, Rc<BoundActions<S>>)
    where
        F: FnOnce() -> S,
    {
        if map.is_empty() {
            tracing::warn!("binding an empty action map");
        }

        let store = match &self.store {
            Some(store) => Rc::clone(store),
            None => {
                let store = Rc::new(Store::new(init(), self.reducer()));
                self.store = Some(Rc::clone(&store));
                store
            }
        };

        let bound = match self.bound.take() {
            Some(bound) if bound.matches(&map) => bound,
            _ => {
                tracing::debug!(actions = map.len(), "binding actions");
                Rc::new(bind_actions(&map, &store))
            }
        };
        self.bound = Some(Rc::clone(&bound));
        *self.current.borrow_mut() = Rc::new(map);

        (store.state(), bound)
    }

    /// Reducer that resolves names against whichever map was bound last
    fn reducer(&self) -> impl Fn(&S, &NamedAction) -> Option<S> + 'static {
        let current = Rc::clone(&self.current);
        move |state: &S, action: &NamedAction| {
            let map = Rc::clone(&current.borrow());
            map.reduce(state, action)
        }
    }

    /// Current state, or `None` before the first bind
    pub fn state(&self) -> Option<Rc<S>> {
        self.store.as_ref().map(|store| store.state())
    }

    /// The underlying store, for subscriptions and middleware
    pub fn store(&self) -> Option<&Rc<Store<S, NamedAction>>> {
        self.store.as_ref()
    }

    /// Bound actions from the last bind
    pub fn actions(&self) -> Option<Rc<BoundActions<S>>> {
        self.bound.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PayloadAction;
    use crate::error::BindError;

    fn counter_map() -> ActionMap<i32> {
        ActionMap::new()
            .action("increment", |n| n + 1)
            .payload_action("add", |n: &i32, action: &PayloadAction<i32>| {
                n + action.payload
            })
    }

    #[test]
    fn test_initial_state_before_any_call() {
        let mut hook = ReducerActions::new();
        assert!(hook.state().is_none());

        let (state, actions) = hook.bind(counter_map(), 7);
        assert_eq!(*state, 7);
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn test_initial_state_used_once() {
        let mut hook = ReducerActions::new();
        hook.bind(counter_map(), 1);
        let (state, _) = hook.bind(counter_map(), 100);
        assert_eq!(*state, 1);
    }

    #[test]
    fn test_bind_with_is_lazy() {
        let mut hook = ReducerActions::new();
        hook.bind_with(counter_map(), || 1);
        let (state, _) = hook.bind_with(counter_map(), || panic!("initializer ran twice"));
        assert_eq!(*state, 1);
    }

    #[test]
    fn test_identity_stable_for_same_keys() {
        let mut hook = ReducerActions::new();
        let (_, first) = hook.bind(counter_map(), 0);
        // A fresh map with the same names and shapes
        let (_, second) = hook.bind(counter_map(), 0);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_identity_changes_with_keys() {
        let mut hook = ReducerActions::new();
        let (_, first) = hook.bind(counter_map(), 0);
        let (_, second) = hook.bind(counter_map().action("reset", |_| 0), 0);
        assert!(!Rc::ptr_eq(&first, &second));
        assert!(second.contains("reset"));
    }

    #[test]
    fn test_late_bound_update_function() {
        let mut hook = ReducerActions::new();
        let (_, actions) = hook.bind(counter_map(), 0);

        let doubled = ActionMap::new()
            .action("increment", |n: &i32| n + 2)
            .payload_action("add", |n: &i32, action: &PayloadAction<i32>| {
                n + action.payload * 2
            });
        let (_, rebound) = hook.bind(doubled, 0);
        assert!(Rc::ptr_eq(&actions, &rebound));

        // Callable captured before the rebind uses the new function
        actions.action("increment").unwrap().call().unwrap();
        assert_eq!(hook.state().map(|s| *s), Some(2));
    }

    #[test]
    fn test_stale_callable_for_removed_name_is_noop() {
        let mut hook = ReducerActions::new();
        let (_, old) = hook.bind(counter_map(), 0);
        hook.bind(ActionMap::new().action("increment", |n: &i32| n + 1), 0);

        assert_eq!(old.action("add").unwrap().call_with(5), Ok(false));
        assert_eq!(hook.state().map(|s| *s), Some(0));
    }

    #[test]
    fn test_empty_map() {
        let mut hook = ReducerActions::<i32>::new();
        let (state, actions) = hook.bind(ActionMap::new(), 3);
        assert_eq!(*state, 3);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_actions_detach_when_hook_dropped() {
        let mut hook = ReducerActions::new();
        let (_, actions) = hook.bind(counter_map(), 0);
        drop(hook);

        assert!(matches!(
            actions.action("increment").unwrap().call(),
            Err(BindError::Detached { .. })
        ));
    }
}
