use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::auth::{generate_jwt, Claims};
use crate::config::{self, OAuthConfig};
use crate::database::models::User;
use crate::database::store::{StoreError, UserStore};

/// Failure messages are user-displayable and relayed verbatim by the action
/// layer. Unknown email and wrong password produce the same message.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already registered")]
    EmailTaken,

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Could not authenticate with Google")]
    ProviderUnavailable,

    /// Hashing or token machinery failed; cause is logged at the source.
    #[error("An unexpected error occurred")]
    Credential,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Issued session token plus its lifetime in seconds.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService<U> {
    users: U,
}

impl<U: UserStore> AuthService<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let user = self.users.insert(email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::new(user.id, user.email.clone());
        let expires_in = claims.exp - claims.iat;
        let token = generate_jwt(claims).map_err(|err| {
            tracing::error!("token generation failed: {}", err);
            AuthError::Credential
        })?;

        Ok(Session { token, expires_in })
    }

    /// Authorize URL for the configured external identity provider.
    pub fn authorize_url(&self) -> Result<String, AuthError> {
        build_authorize_url(&config::config().oauth)
    }
}

pub(crate) fn build_authorize_url(oauth: &OAuthConfig) -> Result<String, AuthError> {
    if oauth.client_id.is_empty() {
        return Err(AuthError::ProviderUnavailable);
    }

    let mut url = Url::parse(&oauth.authorize_endpoint).map_err(|err| {
        tracing::error!("bad authorize endpoint {}: {}", oauth.authorize_endpoint, err);
        AuthError::ProviderUnavailable
    })?;

    url.query_pairs_mut()
        .append_pair("client_id", &oauth.client_id)
        .append_pair("redirect_uri", &oauth.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &oauth.scopes);

    Ok(url.into())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            tracing::error!("password hashing failed: {}", err);
            AuthError::Credential
        })
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|err| {
        tracing::error!("stored password hash is unreadable: {}", err);
        AuthError::Credential
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
