use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Event, User, Venue};

/// Persistence failures surfaced to the action layer.
///
/// `Conflict` carries a message relayed to callers verbatim. Raw driver
/// errors are logged at the conversion point and display only a generic
/// message; SQL detail never reaches a caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("Database error occurred")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {}", err);
        StoreError::Database(err)
    }
}

/// Fields for a new event record. Ownership is supplied separately by the
/// action layer from the resolved principal.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub sport_type: String,
    pub date_time: DateTime<Utc>,
    pub description: Option<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub name: Option<String>,
    pub sport_type: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// List events owned by `owner`, optionally filtered by a
    /// case-insensitive name substring and an exact sport type, ordered by
    /// scheduled time ascending.
    async fn list(
        &self,
        owner: Uuid,
        name_like: Option<&str>,
        sport_type: Option<&str>,
    ) -> Result<Vec<Event>, StoreError>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Event>, StoreError>;

    async fn insert(&self, owner: Uuid, new: NewEvent) -> Result<Event, StoreError>;

    /// Apply a partial update; returns `None` when no row matched the
    /// id/owner pair. `updated_at` is always refreshed.
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: EventChanges,
    ) -> Result<Option<Event>, StoreError>;

    /// Owner-scoped delete. Not existence-checked; deleting an absent row
    /// succeeds.
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), StoreError>;

    async fn venue_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    async fn clear_venue_links(&self, event_id: Uuid) -> Result<(), StoreError>;

    async fn link_venues(&self, event_id: Uuid, venue_ids: &[Uuid]) -> Result<(), StoreError>;
}

#[async_trait]
pub trait VenueStore: Send + Sync {
    /// All venues, ordered by name. Venues are shared between users.
    async fn list(&self) -> Result<Vec<Venue>, StoreError>;

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<Venue>, StoreError>;

    async fn insert(&self, name: &str, address: Option<&str>) -> Result<Venue, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        address: Option<&str>,
    ) -> Result<Option<Venue>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a credential record. Duplicate emails fail with
    /// `StoreError::Conflict`.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
