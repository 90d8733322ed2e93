//! reducer-actions: describe state transitions as named update functions and
//! get back ready-to-call actions
//!
//! Like a Redux reducer, but the caller never builds action records: each
//! entry of an [`ActionMap`] becomes a [`BoundAction`] that dispatches itself.
//!
//! # Example
//! ```
//! use reducer_actions::prelude::*;
//!
//! let map = ActionMap::new()
//!     .action("increment", |n: &i32| n + 1)
//!     .payload_action("add", |n: &i32, action: &PayloadAction<i32>| n + action.payload);
//!
//! let mut hook = ReducerActions::new();
//! let (state, actions) = hook.bind(map.clone(), 0);
//! assert_eq!(*state, 0);
//!
//! actions.action("increment").unwrap().call().unwrap();
//! actions.action("add").unwrap().call_with(10).unwrap();
//!
//! let (state, _) = hook.bind(map, 0);
//! assert_eq!(*state, 11);
//! ```

// Re-export everything from core
pub use reducer_actions_core::*;

// Re-export test assertions
pub use reducer_actions_core::{assert_dispatched, assert_not_dispatched};

// Re-export derive macros
pub use reducer_actions_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use reducer_actions_core::{Action, Middleware};

    // Actions and binding
    pub use reducer_actions_core::{
        bind_actions, ActionMap, ActionShape, BindError, BoundAction, BoundActions, NamedAction,
        PayloadAction, ReducerActions,
    };

    // Store
    pub use reducer_actions_core::{Dispatcher, Store, SubscriptionId};

    // Logging
    pub use reducer_actions_core::{ActionLogConfig, ActionLoggerConfig, LoggingMiddleware};

    // Derive macros
    pub use reducer_actions_macros::Action;
}
