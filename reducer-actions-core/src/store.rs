//! Centralized state store with reducer pattern

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::Action;

/// A reducer function that computes the next state from an action
///
/// Returns `Some(next)` for a transition and `None` to leave state unchanged.
/// The current state is never mutated in place.
pub type Reducer<S, A> = Rc<dyn Fn(&S, &A) -> Option<S>>;

type Listener<S> = Rc<dyn Fn(&S)>;

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Single-threaded state container with Redux-like reducer pattern
///
/// The store holds the current state behind an `Rc` and provides a single
/// point for state transitions through [`Store::dispatch`]. Subscribers are
/// notified after each applied transition.
///
/// Dispatches issued while another dispatch is in flight (from a subscriber
/// or an update function) are queued and applied in FIFO order before the
/// outer `dispatch` returns.
///
/// # Type Parameters
/// * `S` - The state type
/// * `A` - The action type (must implement `Action`)
///
/// # Example
/// ```ignore
/// #[derive(Action, Debug)]
/// enum CounterAction {
///     Increment,
///     Decrement,
/// }
///
/// fn reducer(state: &i32, action: &CounterAction) -> Option<i32> {
///     match action {
///         CounterAction::Increment => Some(state + 1),
///         CounterAction::Decrement => Some(state - 1),
///     }
/// }
///
/// let store = Store::new(0, reducer);
/// store.dispatch(CounterAction::Increment);
/// assert_eq!(*store.state(), 1);
/// ```
pub struct Store<S, A: Action> {
    state: RefCell<Rc<S>>,
    reducer: RefCell<Reducer<S, A>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener<S>)>>,
    next_subscription: Cell<u64>,
    middleware: RefCell<ComposedMiddleware<A>>,
    queue: RefCell<VecDeque<A>>,
    dispatching: Cell<bool>,
}

impl<S, A: Action> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("listeners", &self.listeners.borrow().len())
            .field("queued", &self.queue.borrow().len())
            .field("dispatching", &self.dispatching.get())
            .finish()
    }
}

/// Resets the in-flight flag even if an update function panics
struct DispatchGuard<'a, A> {
    dispatching: &'a Cell<bool>,
    queue: &'a RefCell<VecDeque<A>>,
}

impl<A> Drop for DispatchGuard<'_, A> {
    fn drop(&mut self) {
        self.dispatching.set(false);
        if std::thread::panicking() {
            self.queue.borrow_mut().clear();
        }
    }
}

impl<S: 'static, A: Action> Store<S, A> {
    /// Create a new store with initial state and reducer
    pub fn new<R>(state: S, reducer: R) -> Self
    where
        R: Fn(&S, &A) -> Option<S> + 'static,
    {
        Self {
            state: RefCell::new(Rc::new(state)),
            reducer: RefCell::new(Rc::new(reducer)),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            middleware: RefCell::new(ComposedMiddleware::new()),
            queue: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Add middleware; it sees every action dispatched from now on
    pub fn with_middleware<M: Middleware<A> + 'static>(self, middleware: M) -> Self {
        self.add_middleware(middleware);
        self
    }

    /// Replace the reducer used for subsequent dispatches
    pub fn replace_reducer<R>(&self, reducer: R)
    where
        R: Fn(&S, &A) -> Option<S> + 'static,
    {
        *self.reducer.borrow_mut() = Rc::new(reducer);
    }
}

impl<S, A: Action> Store<S, A> {
    /// Snapshot of the current state
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.state.borrow())
    }

    /// Dispatch an action to the store
    ///
    /// Returns `true` if this action produced a transition. When called
    /// while another dispatch is in flight the action is queued and `false`
    /// is returned; the queued action is applied before the outer dispatch
    /// completes.
    pub fn dispatch(&self, action: A) -> bool {
        self.queue.borrow_mut().push_back(action);
        if self.dispatching.get() {
            tracing::trace!("dispatch queued behind in-flight action");
            return false;
        }

        self.dispatching.set(true);
        let _guard = DispatchGuard {
            dispatching: &self.dispatching,
            queue: &self.queue,
        };

        let mut first = None;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(action) = next else {
                break;
            };
            let changed = self.apply(action);
            first.get_or_insert(changed);
        }
        first.unwrap_or(false)
    }

    fn apply(&self, action: A) -> bool {
        self.middleware.borrow_mut().before(&action);

        let reducer = Rc::clone(&self.reducer.borrow());
        let current = self.state();
        let changed = match reducer(&*current, &action) {
            Some(next) => {
                *self.state.borrow_mut() = Rc::new(next);
                true
            }
            None => false,
        };

        tracing::debug!(action = %action.name(), state_changed = changed, "action applied");
        self.middleware.borrow_mut().after(&action, changed);

        if changed {
            self.notify();
        }
        changed
    }

    fn notify(&self) {
        let state = self.state();
        // Snapshot so listeners may subscribe or unsubscribe while running
        let listeners: Vec<Listener<S>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&*state);
        }
    }

    /// Register a listener called with the new state after each transition
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S) + 'static,
    {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn add_middleware<M: Middleware<A> + 'static>(&self, middleware: M) {
        self.middleware.borrow_mut().add(middleware);
    }

    /// A weak, cloneable handle for dispatching into this store
    pub fn dispatcher(self: &Rc<Self>) -> Dispatcher<S, A> {
        Dispatcher {
            store: Rc::downgrade(self),
        }
    }
}

/// Weak handle used by bound actions and derived dispatch traits
///
/// Dispatching through a handle whose store has been dropped does nothing.
pub struct Dispatcher<S, A: Action> {
    store: Weak<Store<S, A>>,
}

impl<S, A: Action> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Weak::clone(&self.store),
        }
    }
}

impl<S, A: Action> fmt::Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<S, A: Action> Dispatcher<S, A> {
    pub fn dispatch(&self, action: A) -> bool {
        match self.store.upgrade() {
            Some(store) => store.dispatch(action),
            None => {
                tracing::debug!(action = %action.name(), "store dropped, action ignored");
                false
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.store.strong_count() > 0
    }

    pub fn store(&self) -> Option<Rc<Store<S, A>>> {
        self.store.upgrade()
    }
}

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, recording, or other
/// cross-cutting concerns to your store.
pub trait Middleware<A: Action> {
    /// Called before the action is passed to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// Compose multiple middleware into a single middleware
pub struct ComposedMiddleware<A: Action> {
    middlewares: Vec<Box<dyn Middleware<A>>>,
}

impl<A: Action> fmt::Debug for ComposedMiddleware<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<A: Action> Default for ComposedMiddleware<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Action> ComposedMiddleware<A> {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn add<M: Middleware<A> + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<A: Action> Middleware<A> for ComposedMiddleware<A> {
    fn before(&mut self, action: &A) {
        for middleware in &mut self.middlewares {
            middleware.before(action);
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        // Call in reverse order for proper nesting
        for middleware in self.middlewares.iter_mut().rev() {
            middleware.after(action, state_changed);
        }
    }
}
