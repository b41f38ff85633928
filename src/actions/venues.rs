use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{run_action, ActionError, ActionResult};
use crate::auth::AuthContext;
use crate::database::models::Venue;
use crate::database::store::VenueStore;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListVenues {}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVenue {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Venue name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVenue {
    pub id: Uuid,

    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Venue name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,
}

/// Venues are shared between users: no ownership scoping, but callers must
/// still be authenticated.
pub async fn list_venues<V>(
    venues: &V,
    ctx: &AuthContext,
    input: ListVenues,
) -> ActionResult<Vec<Venue>>
where
    V: VenueStore,
{
    run_action(ctx, input, |_input, _principal| async move {
        Ok(venues.list().await?)
    })
    .await
}

pub async fn create_venue<V>(
    venues: &V,
    ctx: &AuthContext,
    input: CreateVenue,
) -> ActionResult<Venue>
where
    V: VenueStore,
{
    run_action(ctx, input, |input, _principal| async move {
        Ok(venues
            .insert(&input.name, Some(input.address.as_str()))
            .await?)
    })
    .await
}

pub async fn update_venue<V>(
    venues: &V,
    ctx: &AuthContext,
    input: UpdateVenue,
) -> ActionResult<Venue>
where
    V: VenueStore,
{
    run_action(ctx, input, |input, _principal| async move {
        venues
            .update(input.id, &input.name, Some(input.address.as_str()))
            .await?
            .ok_or_else(|| ActionError::invalid("Venue not found"))
    })
    .await
}
