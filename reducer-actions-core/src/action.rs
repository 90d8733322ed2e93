//! Action trait and the records dispatched by bound actions

use std::any::{type_name, Any};
use std::fmt::{self, Debug};
use std::rc::Rc;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions represent intents to change state. They should be:
/// - Debug: For debugging and logging
/// - 'static: So they can be boxed by middleware and queued by the store
///
/// Use `#[derive(Action)]` from `reducer-actions-macros` to implement this
/// trait for a closed enum of actions.
pub trait Action: Debug + 'static {
    /// Get the action name for logging, filtering and lookup
    fn name(&self) -> &str;
}

/// Annotates the second argument of an update function that takes a payload.
///
/// The payload travels wrapped under an explicit `payload` field, so an
/// update function reads it as `action.payload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PayloadAction<P> {
    pub payload: P,
}

impl<P> PayloadAction<P> {
    pub fn new(payload: P) -> Self {
        Self { payload }
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P> From<P> for PayloadAction<P> {
    fn from(payload: P) -> Self {
        Self::new(payload)
    }
}

/// A string-keyed action record built by a bound action.
///
/// The payload, when present, is a boxed [`PayloadAction<P>`]. Callers of the
/// hook API never see this type; it is public so middleware and custom
/// reducers can inspect dispatched actions.
pub struct NamedAction {
    name: Rc<str>,
    payload: Option<Box<dyn Any>>,
    payload_type: Option<&'static str>,
}

impl NamedAction {
    /// An action that carries no payload
    pub fn payloadless(name: impl Into<Rc<str>>) -> Self {
        Self {
            name: name.into(),
            payload: None,
            payload_type: None,
        }
    }

    /// An action carrying `payload`, wrapped as `PayloadAction<P>`
    pub fn with_payload<P: 'static>(name: impl Into<Rc<str>>, payload: P) -> Self {
        Self {
            name: name.into(),
            payload: Some(Box::new(PayloadAction::new(payload))),
            payload_type: Some(type_name::<P>()),
        }
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Type name of the carried payload, if any
    pub fn payload_type(&self) -> Option<&'static str> {
        self.payload_type
    }

    /// Borrow the payload as `PayloadAction<P>` if it has that type
    pub fn payload<P: 'static>(&self) -> Option<&PayloadAction<P>> {
        self.payload.as_deref()?.downcast_ref::<PayloadAction<P>>()
    }

    pub(crate) fn payload_any(&self) -> Option<&dyn Any> {
        self.payload.as_deref()
    }
}

impl Action for NamedAction {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Debug for NamedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedAction")
            .field("name", &self.name)
            .field("payload_type", &self.payload_type)
            .finish()
    }
}
