use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{parse_body, AppState};
use crate::actions::venues::{self, CreateVenue, ListVenues, UpdateVenue};
use crate::actions::ActionResult;
use crate::auth::AuthContext;
use crate::database::models::Venue;

/// GET /api/venues
pub async fn list(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Json<ActionResult<Vec<Venue>>> {
    Json(venues::list_venues(&state.venues, &ctx, ListVenues::default()).await)
}

/// POST /api/venues
pub async fn create(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(body): Json<Value>,
) -> Json<ActionResult<Venue>> {
    let input: CreateVenue = match parse_body(body) {
        Ok(input) => input,
        Err(result) => return Json(result),
    };

    Json(venues::create_venue(&state.venues, &ctx, input).await)
}

/// PUT /api/venues/:id
pub async fn update(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Json<ActionResult<Venue>> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Json(ActionResult::fail("Invalid venue ID"));
    };

    if let Some(obj) = body.as_object_mut() {
        obj.insert("id".to_string(), json!(id));
    }

    let input: UpdateVenue = match parse_body(body) {
        Ok(input) => input,
        Err(result) => return Json(result),
    };

    Json(venues::update_venue(&state.venues, &ctx, input).await)
}
