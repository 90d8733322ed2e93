//! Ready-to-call actions bound to a store
//!
//! [`bind_actions`] turns an [`ActionMap`] into one [`BoundAction`] per name.
//! Calling a bound action builds the [`NamedAction`] record and dispatches
//! it, so callers never construct actions themselves.

use std::any::{type_name, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::action::NamedAction;
use crate::action_map::{ActionMap, ActionShape};
use crate::error::BindError;
use crate::store::{Dispatcher, Store};

/// A zero- or one-argument callable that dispatches one named action
pub struct BoundAction<S> {
    name: Rc<str>,
    shape: ActionShape,
    dispatcher: Dispatcher<S, NamedAction>,
}

impl<S> Clone for BoundAction<S> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            shape: self.shape,
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S> fmt::Debug for BoundAction<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}

impl<S> BoundAction<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ActionShape {
        self.shape
    }

    /// Dispatch a payloadless action.
    ///
    /// Returns whether the store applied a transition.
    pub fn call(&self) -> Result<bool, BindError> {
        if let ActionShape::Payload { type_name, .. } = self.shape {
            return Err(BindError::PayloadRequired {
                action: self.name.to_string(),
                expected: type_name,
            });
        }
        self.dispatch(NamedAction::payloadless(Rc::clone(&self.name)))
    }

    /// Dispatch with `payload`, forwarded unchanged as `PayloadAction<P>`.
    pub fn call_with<P: 'static>(&self, payload: P) -> Result<bool, BindError> {
        match self.shape {
            ActionShape::Payloadless => Err(BindError::UnexpectedPayload {
                action: self.name.to_string(),
            }),
            ActionShape::Payload {
                type_id,
                type_name: expected,
            } if type_id != TypeId::of::<P>() => Err(BindError::PayloadType {
                action: self.name.to_string(),
                expected,
                found: type_name::<P>(),
            }),
            ActionShape::Payload { .. } => {
                self.dispatch(NamedAction::with_payload(Rc::clone(&self.name), payload))
            }
        }
    }

    fn dispatch(&self, action: NamedAction) -> Result<bool, BindError> {
        let store = self.dispatcher.store().ok_or_else(|| BindError::Detached {
            action: self.name.to_string(),
        })?;
        Ok(store.dispatch(action))
    }
}

/// The set of bound actions, one per action name at binding time
pub struct BoundActions<S> {
    actions: BTreeMap<Rc<str>, BoundAction<S>>,
}

impl<S> fmt::Debug for BoundActions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.actions.values()).finish()
    }
}

impl<S> BoundActions<S> {
    pub fn get(&self, name: &str) -> Option<&BoundAction<S>> {
        self.actions.get(name)
    }

    /// Like [`get`](Self::get), but unknown names are an error
    pub fn action(&self, name: &str) -> Result<&BoundAction<S>, BindError> {
        self.get(name)
            .ok_or_else(|| BindError::UnknownAction(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(|name| &**name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundAction<S>> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Whether these actions were bound from a map with the same names and
    /// calling conventions as `map`
    pub fn matches(&self, map: &ActionMap<S>) -> bool {
        self.len() == map.len()
            && map.iter().all(|(name, update)| {
                self.get(name)
                    .is_some_and(|bound| bound.shape == update.shape())
            })
    }
}

/// Bind every action of `map` to `store`.
///
/// The bound actions only remember names and calling conventions; the
/// update function is looked up by the store's reducer at dispatch time.
pub fn bind_actions<S>(map: &ActionMap<S>, store: &Rc<Store<S, NamedAction>>) -> BoundActions<S> {
    let dispatcher = store.dispatcher();
    let actions = map
        .iter()
        .map(|(name, update)| {
            let name: Rc<str> = Rc::from(name);
            let bound = BoundAction {
                name: Rc::clone(&name),
                shape: update.shape(),
                dispatcher: dispatcher.clone(),
            };
            (name, bound)
        })
        .collect();
    BoundActions { actions }
}
