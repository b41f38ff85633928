//! Action layer: every mutation and query the application exposes goes
//! through one of the wrappers here, which normalize validation,
//! authentication, and handler failures into a single tagged result.

pub mod auth;
pub mod events;
pub mod venues;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::future::Future;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::auth::{resolve_principal, AuthContext, Principal};
use crate::database::store::StoreError;
use crate::services::auth_service::AuthError;

/// Fallback shown when a failure carries no message of its own, so callers
/// never receive an empty error string.
pub const GENERIC_ERROR: &str = "An unexpected error occurred";

/// Tagged outcome of an action. Exactly one variant is populated; callers
/// must branch on the tag before touching the value.
///
/// Serializes to `{"success": true, "data": ...}` on the Ok path and
/// `{"success": false, "error": "..."}` on the Err path.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Ok(T),
    Err(String),
}

impl<T> ActionResult<T> {
    pub fn fail(message: impl Into<String>) -> Self {
        ActionResult::Err(message.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ActionResult::Ok(_))
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ActionResult::Ok(value) => Ok(value),
            ActionResult::Err(error) => Err(error),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionResult::Ok(value) => {
                let mut s = serializer.serialize_struct("ActionResult", 2)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("data", value)?;
                s.end()
            }
            ActionResult::Err(error) => {
                let mut s = serializer.serialize_struct("ActionResult", 2)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                s.end()
            }
        }
    }
}

/// The only failure type an action handler may return. The wrapper is the
/// single catch boundary; handlers never recover locally.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Request-shaped failures raised inside a handler ("Event not found").
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ActionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ActionError::Invalid(message.into())
    }
}

/// Join every violation message into one human-readable string. All
/// violations are reported, not just the first.
pub fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for err in field_errors {
            match &err.message {
                Some(msg) => messages.push(msg.to_string()),
                None => messages.push(format!("{} is invalid", field)),
            }
        }
    }
    messages.join(", ")
}

fn shape_failure<T>(err: ActionError) -> ActionResult<T> {
    let message = err.to_string();
    if message.is_empty() {
        ActionResult::fail(GENERIC_ERROR)
    } else {
        ActionResult::fail(message)
    }
}

/// Run an authenticated action: validate the input, resolve the principal
/// from the supplied context, then invoke the handler. Short-circuits on
/// the first failure, in that order.
pub async fn run_action<I, T, F, Fut>(ctx: &AuthContext, input: I, handler: F) -> ActionResult<T>
where
    I: Validate,
    F: FnOnce(I, Principal) -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
{
    if let Err(errors) = input.validate() {
        return ActionResult::fail(flatten_errors(&errors));
    }

    let principal = match resolve_principal(ctx) {
        Ok(principal) => principal,
        Err(unauthorized) => return ActionResult::fail(unauthorized.to_string()),
    };

    match handler(input, principal).await {
        Ok(value) => ActionResult::Ok(value),
        Err(err) => shape_failure(err),
    }
}

/// Variant for operations that take no authenticated principal
/// (registration, login). Same validation and failure shaping.
pub async fn run_open_action<I, T, F, Fut>(input: I, handler: F) -> ActionResult<T>
where
    I: Validate,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
{
    if let Err(errors) = input.validate() {
        return ActionResult::fail(flatten_errors(&errors));
    }

    match handler(input).await {
        Ok(value) => ActionResult::Ok(value),
        Err(err) => shape_failure(err),
    }
}
