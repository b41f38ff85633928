use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{parse_body, AppState};
use crate::actions::events::{
    self, CreateEvent, DeleteEvent, Deleted, GetEvent, SearchEvents, UpdateEvent,
};
use crate::actions::ActionResult;
use crate::auth::AuthContext;
use crate::database::models::{Event, EventWithVenues};

/// GET /api/events?query=&sport_type=
pub async fn list(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(input): Query<SearchEvents>,
) -> Json<ActionResult<Vec<EventWithVenues>>> {
    Json(events::list_events(&state.events, &state.venues, &ctx, input).await)
}

/// GET /api/events/:id
pub async fn get(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> Json<ActionResult<Option<EventWithVenues>>> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Json(ActionResult::fail("Invalid event ID"));
    };

    Json(events::get_event(&state.events, &state.venues, &ctx, GetEvent { id }).await)
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(body): Json<Value>,
) -> Json<ActionResult<Event>> {
    let input: CreateEvent = match parse_body(body) {
        Ok(input) => input,
        Err(result) => return Json(result),
    };

    Json(events::create_event(&state.events, &ctx, input).await)
}

/// PUT /api/events/:id - partial update; the path id wins over any id in
/// the body.
pub async fn update(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Json<ActionResult<Event>> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Json(ActionResult::fail("Invalid event ID"));
    };

    if let Some(obj) = body.as_object_mut() {
        obj.insert("id".to_string(), json!(id));
    }

    let input: UpdateEvent = match parse_body(body) {
        Ok(input) => input,
        Err(result) => return Json(result),
    };

    Json(events::update_event(&state.events, &ctx, input).await)
}

/// DELETE /api/events/:id
pub async fn delete(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> Json<ActionResult<Deleted>> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Json(ActionResult::fail("Invalid event ID"));
    };

    Json(events::delete_event(&state.events, &ctx, DeleteEvent { id }).await)
}
