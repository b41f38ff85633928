//! HTTP relays over the action layer. Every handler builds the action
//! input, invokes the action, and returns the tagged envelope with status
//! 200; the envelope's `success` flag is the outcome.

pub mod auth;
pub mod events;
pub mod venues;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::actions::ActionResult;
use crate::database::postgres::{PgEventStore, PgUserStore, PgVenueStore};
use crate::services::auth_service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub events: PgEventStore,
    pub venues: PgVenueStore,
    pub auth: AuthService<PgUserStore>,
}

impl AppState {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            events: PgEventStore::new(pool.clone()),
            venues: PgVenueStore::new(pool.clone()),
            auth: AuthService::new(PgUserStore::new(pool)),
        }
    }
}

/// Decode a JSON body into an action input. Shape errors (wrong types,
/// malformed UUIDs) fail the envelope; missing fields default and fall
/// through to schema validation for field-level messages.
pub(crate) fn parse_body<I, T>(value: Value) -> Result<I, ActionResult<T>>
where
    I: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|_| ActionResult::fail("Invalid request body"))
}
