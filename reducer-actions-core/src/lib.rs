//! Core traits and types for reducer-actions
//!
//! This crate lets a component describe its state transitions as a table of
//! action names to pure update functions, and hands back ready-to-call
//! actions instead of making the caller build and dispatch action records.
//!
//! # Core Concepts
//!
//! - **Action**: Events that describe state changes
//! - **ActionMap**: Name -> update function table, each entry tagged with
//!   whether it takes a payload
//! - **Store**: Single-threaded state container with reducer pattern
//! - **BoundActions**: One callable per action name, dispatching into a store
//! - **ReducerActions**: Per-component hook returning state and bound actions
//!
//! # Basic Example
//!
//! ```
//! use reducer_actions_core::prelude::*;
//!
//! #[derive(Clone, Default)]
//! struct State {
//!     values: Vec<String>,
//! }
//!
//! let map = ActionMap::new()
//!     .action("pop", |state: &State| {
//!         let mut values = state.values.clone();
//!         values.pop();
//!         State { values }
//!     })
//!     .payload_action("append", |state: &State, action: &PayloadAction<String>| {
//!         let mut values = state.values.clone();
//!         values.push(action.payload.clone());
//!         State { values }
//!     });
//!
//! let mut hook = ReducerActions::new();
//! let (_, actions) = hook.bind(map.clone(), State::default());
//!
//! actions.action("append").unwrap().call_with("a".to_string()).unwrap();
//! actions.action("append").unwrap().call_with("b".to_string()).unwrap();
//! actions.action("pop").unwrap().call().unwrap();
//!
//! let (state, _) = hook.bind(map, State::default());
//! assert_eq!(state.values, vec!["a".to_string()]);
//! ```
//!
//! # Typed Actions
//!
//! When the set of actions is closed, an enum with `#[derive(Action)]` and a
//! plain reducer gives exhaustiveness checking instead of name lookups:
//!
//! ```ignore
//! #[derive(Action, Debug)]
//! #[action(dispatch)]
//! enum CounterAction {
//!     Increment,
//!     Add(i32),
//! }
//!
//! fn reducer(state: &i32, action: &CounterAction) -> Option<i32> {
//!     match action {
//!         CounterAction::Increment => Some(state + 1),
//!         CounterAction::Add(n) => Some(state + n),
//!     }
//! }
//!
//! let store = Rc::new(Store::new(0, reducer));
//! let dispatcher = store.dispatcher();
//! dispatcher.increment();
//! dispatcher.add(41);
//! assert_eq!(*store.state(), 42);
//! ```

pub mod action;
pub mod action_map;
pub mod binder;
pub mod error;
pub mod hook;
pub mod logging;
pub mod store;
pub mod testing;

// Core trait exports
pub use action::{Action, NamedAction, PayloadAction};
pub use action_map::{ActionMap, ActionShape, UpdateFn};
pub use error::BindError;

// Binding exports
pub use binder::{bind_actions, BoundAction, BoundActions};
pub use hook::ReducerActions;

// Store exports
pub use store::{ComposedMiddleware, Dispatcher, Middleware, Reducer, Store, SubscriptionId};

// Logging exports
pub use logging::{
    glob_match, ActionLog, ActionLogConfig, ActionLogEntry, ActionLoggerConfig, LoggingMiddleware,
};

// Testing exports
pub use testing::TestHarness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, NamedAction, PayloadAction};
    pub use crate::action_map::{ActionMap, ActionShape};
    pub use crate::binder::{bind_actions, BoundAction, BoundActions};
    pub use crate::error::BindError;
    pub use crate::hook::ReducerActions;
    pub use crate::logging::{ActionLogConfig, ActionLoggerConfig, LoggingMiddleware};
    pub use crate::store::{Dispatcher, Middleware, Store, SubscriptionId};
}
