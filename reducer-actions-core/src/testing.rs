//! Test utilities for components built on reducer-actions
//!
//! - [`TestHarness`]: stands in for a component instance, re-binding on
//!   every [`render`](TestHarness::render) and counting store notifications
//! - [`assert_dispatched!`] / [`assert_not_dispatched!`]: check the names of
//!   actions that reached the store
//!
//! # Example
//!
//! ```
//! use reducer_actions_core::testing::TestHarness;
//! use reducer_actions_core::{assert_dispatched, ActionMap};
//!
//! let map = ActionMap::new().action("increment", |n: &i32| n + 1);
//! let mut harness = TestHarness::new(map, 0);
//!
//! harness.call("increment");
//! assert_eq!(*harness.state(), 1);
//! assert_eq!(harness.renders(), 1);
//! assert_dispatched!(harness, "increment");
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::action_map::ActionMap;
use crate::binder::BoundActions;
use crate::hook::ReducerActions;
use crate::logging::{ActionLog, ActionLogConfig, LoggingMiddleware};

/// Generic test harness emulating one component instance.
///
/// The harness binds once on construction, subscribes a render counter and
/// records every dispatched action name.
pub struct TestHarness<S: Clone + 'static> {
    hook: ReducerActions<S>,
    map: ActionMap<S>,
    initial: S,
    renders: Rc<Cell<usize>>,
    log: Rc<RefCell<ActionLog>>,
}

impl<S: Clone + 'static> TestHarness<S> {
    pub fn new(map: ActionMap<S>, initial: S) -> Self {
        let mut hook = ReducerActions::new();
        hook.bind(map.clone(), initial.clone());

        let renders = Rc::new(Cell::new(0));
        // Unbounded: assertions must see every name, not just the recent ones
        let log = Rc::new(RefCell::new(ActionLog::new(ActionLogConfig::with_capacity(
            usize::MAX,
        ))));
        let middleware = LoggingMiddleware::with_shared_log(Rc::clone(&log));

        if let Some(store) = hook.store() {
            let counter = Rc::clone(&renders);
            store.subscribe(move |_| counter.set(counter.get() + 1));
            store.add_middleware(middleware);
        }

        Self {
            hook,
            map,
            initial,
            renders,
            log,
        }
    }

    /// Re-bind with the current map, as a component would on re-render
    pub fn render(&mut self) -> (Rc<S>, Rc<BoundActions<S>>) {
        self.hook.bind(self.map.clone(), self.initial.clone())
    }

    /// Swap the action map used by subsequent renders
    pub fn set_map(&mut self, map: ActionMap<S>) {
        self.map = map;
    }

    pub fn state(&mut self) -> Rc<S> {
        self.render().0
    }

    pub fn actions(&mut self) -> Rc<BoundActions<S>> {
        self.render().1
    }

    /// Invoke a payloadless action.
    ///
    /// # Panics
    ///
    /// Panics if the action is unknown or takes a payload.
    pub fn call(&mut self, name: &str) -> bool {
        self.actions()
            .action(name)
            .and_then(|action| action.call())
            .unwrap_or_else(|e| panic!("failed to call {:?}: {}", name, e))
    }

    /// Invoke a payload action.
    ///
    /// # Panics
    ///
    /// Panics if the action is unknown or the payload type is wrong.
    pub fn call_with<P: 'static>(&mut self, name: &str, payload: P) -> bool {
        self.actions()
            .action(name)
            .and_then(|action| action.call_with(payload))
            .unwrap_or_else(|e| panic!("failed to call {:?}: {}", name, e))
    }

    /// Number of store notifications (re-renders) so far
    pub fn renders(&self) -> usize {
        self.renders.get()
    }

    /// Names of all dispatched actions, oldest first
    pub fn dispatched(&self) -> Vec<String> {
        self.log.borrow().names()
    }

    pub fn log(&self) -> Rc<RefCell<ActionLog>> {
        Rc::clone(&self.log)
    }
}

/// Assert that an action with the given name was dispatched.
///
/// # Example
///
/// ```ignore
/// assert_dispatched!(harness, "append");
/// ```
#[macro_export]
macro_rules! assert_dispatched {
    ($harness:expr, $name:expr) => {{
        let names = $harness.dispatched();
        assert!(
            names.iter().any(|n| n == $name),
            "Expected action `{}` to be dispatched, but got: {:?}",
            $name,
            names
        );
    }};
}

/// Assert that no action with the given name was dispatched.
#[macro_export]
macro_rules! assert_not_dispatched {
    ($harness:expr, $name:expr) => {{
        let names = $harness.dispatched();
        assert!(
            !names.iter().any(|n| n == $name),
            "Expected action `{}` NOT to be dispatched, but it was: {:?}",
            $name,
            names
        );
    }};
}
