use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::venue::Venue;

/// Sport types offered by the scheduling UI. Stored as plain text so ad-hoc
/// sports ("Other") are representable.
pub const SPORT_TYPES: &[&str] = &[
    "Basketball",
    "Football",
    "Soccer",
    "Baseball",
    "Tennis",
    "Golf",
    "Hockey",
    "Volleyball",
    "Swimming",
    "Track & Field",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub sport_type: String,
    pub date_time: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link row joining an event to one of its venues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EventVenue {
    pub id: Uuid,
    pub event_id: Uuid,
    pub venue_id: Uuid,
}

/// Event joined with its venues for list/detail responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWithVenues {
    #[serde(flatten)]
    pub event: Event,
    pub venues: Vec<Venue>,
}
