//! Shared helpers for unit tests: fake credential contexts and in-memory
//! stores.

use uuid::Uuid;

use crate::auth::{generate_jwt, AuthContext, Claims};
use crate::database::memory::{InMemoryEventStore, InMemoryVenueStore};
use crate::database::models::Venue;
use crate::database::store::VenueStore;

/// Context carrying a token for `user_id`, minted with the configured
/// secret so it resolves through the real validation path.
pub fn authed_ctx(user_id: Uuid) -> AuthContext {
    let token = generate_jwt(Claims::new(user_id, "test@example.com".to_string()))
        .expect("test token generation");
    AuthContext::bearer(token)
}

pub fn anonymous_ctx() -> AuthContext {
    AuthContext::anonymous()
}

pub fn stores() -> (InMemoryEventStore, InMemoryVenueStore) {
    (InMemoryEventStore::new(), InMemoryVenueStore::new())
}

pub async fn seed_venue(venues: &InMemoryVenueStore, name: &str) -> Venue {
    venues
        .insert(name, Some("1 Main St"))
        .await
        .expect("seed venue")
}
