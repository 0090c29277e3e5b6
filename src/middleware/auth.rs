// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Role, UserAccount},
};

/// The caller resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserAccount);

/// Rejects every request without a valid `Authorization: Bearer` token.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let user = app_state.auth_service.validate_token(bearer.token()).await?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser(UserAccount::from(user)));

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

/// Admin-only guard for handlers.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub UserAccount);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            tracing::warn!("User {} denied an admin-only route", user.name);
            return Err(AppError::Forbidden);
        }
        Ok(RequireAdmin(user))
    }
}
