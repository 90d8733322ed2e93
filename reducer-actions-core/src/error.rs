//! Errors returned when invoking bound actions

use thiserror::Error;

/// Why a bound action could not be dispatched.
///
/// Unknown action names reaching the reducer are not errors: they leave state
/// unchanged. These variants cover calls that never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("no action named `{0}` is bound")]
    UnknownAction(String),

    #[error("action `{action}` takes a payload of type `{expected}`")]
    PayloadRequired {
        action: String,
        expected: &'static str,
    },

    #[error("action `{action}` takes no payload")]
    UnexpectedPayload { action: String },

    #[error("action `{action}` expects a payload of type `{expected}`, got `{found}`")]
    PayloadType {
        action: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("action `{action}` outlived its store")]
    Detached { action: String },
}
