use axum::{extract::State, response::Json};
use serde_json::Value;

use super::{parse_body, AppState};
use crate::actions::auth::{self, Credentials, ProviderRedirect};
use crate::actions::ActionResult;
use crate::auth::AuthContext;
use crate::services::auth_service::Session;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<ActionResult<()>> {
    let input: Credentials = match parse_body(body) {
        Ok(input) => input,
        Err(result) => return Json(result),
    };

    Json(auth::register(&state.auth, input).await)
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<ActionResult<Session>> {
    let input: Credentials = match parse_body(body) {
        Ok(input) => input,
        Err(result) => return Json(result),
    };

    Json(auth::login(&state.auth, input).await)
}

/// GET /auth/provider - returns the URL the client should redirect to
pub async fn provider(State(state): State<AppState>) -> Json<ActionResult<ProviderRedirect>> {
    Json(auth::login_with_provider(&state.auth).await)
}

/// POST /auth/logout
pub async fn logout(ctx: AuthContext) -> Json<ActionResult<()>> {
    Json(auth::logout(&ctx).await)
}
