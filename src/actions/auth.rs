use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{run_open_action, ActionResult};
use crate::auth::{resolve_principal, AuthContext};
use crate::database::store::UserStore;
use crate::services::auth_service::{AuthService, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Authorize URL the client should redirect to for provider sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRedirect {
    pub url: String,
}

pub async fn register<U>(auth: &AuthService<U>, input: Credentials) -> ActionResult<()>
where
    U: UserStore,
{
    run_open_action(input, |input| async move {
        auth.register(&input.email, &input.password).await?;
        Ok(())
    })
    .await
}

pub async fn login<U>(auth: &AuthService<U>, input: Credentials) -> ActionResult<Session>
where
    U: UserStore,
{
    run_open_action(input, |input| async move {
        Ok(auth.login(&input.email, &input.password).await?)
    })
    .await
}

/// Hand back the external provider's authorize URL; the client performs the
/// redirect. Failure text is relayed as-is.
pub async fn login_with_provider<U>(auth: &AuthService<U>) -> ActionResult<ProviderRedirect>
where
    U: UserStore,
{
    match auth.authorize_url() {
        Ok(url) => ActionResult::Ok(ProviderRedirect { url }),
        Err(err) => ActionResult::fail(err.to_string()),
    }
}

/// Tokens are stateless, so sign-out only acknowledges; nothing is revoked
/// server-side and an already-dead token is not an error.
pub async fn logout(ctx: &AuthContext) -> ActionResult<()> {
    if let Ok(principal) = resolve_principal(ctx) {
        tracing::info!(user_id = %principal.0, "user signed out");
    }
    ActionResult::Ok(())
}
