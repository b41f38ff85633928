use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::convert::Infallible;

use crate::auth::AuthContext;

/// Capture the bearer token from the Authorization header, if any. The
/// token is not validated here; principal resolution happens inside the
/// action wrapper.
#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(bearer_context(&parts.headers))
    }
}

/// Extract a bearer token from request headers
pub fn bearer_context(headers: &HeaderMap) -> AuthContext {
    let Some(header) = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
    else {
        return AuthContext::anonymous();
    };

    let Ok(value) = header.to_str() else {
        return AuthContext::anonymous();
    };

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => AuthContext::bearer(token.trim()),
        _ => AuthContext::anonymous(),
    }
}
