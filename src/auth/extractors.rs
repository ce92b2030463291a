use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::{errors::AuthError, repo_types::UserId, services::AuthService};

/// Authenticated caller, resolved from an `Authorization: Bearer` session token.
pub struct AuthUser(pub UserId);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthService: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!("missing or malformed Authorization header");
            AuthError::InvalidToken
        })?;
        let auth = AuthService::from_ref(state);
        let user_id = auth.authenticate(token).await?;
        Ok(AuthUser(user_id))
    }
}
