use axum::{
    extract::{FromRef, FromRequestParts},
    http::HeaderMap,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::Role,
    error::AppError,
    state::AppState,
    token::{AUTH_COOKIE, TokenKeys},
};

/// The principal a verified session token vouches for.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

pub fn ensure_role(user: &AuthUser, role: Role, message: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden(message.to_string()));
    }
    Ok(())
}

pub fn ensure_superadmin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(
        user,
        Role::Superadmin,
        "Unauthorized. Only superadmins can manage admins.",
    )
}

/// Reads the session cookie and verifies it.
pub fn current_principal(headers: &HeaderMap, keys: &TokenKeys) -> Option<AuthUser> {
    let jar = CookieJar::from_headers(headers);
    let token = jar.get(AUTH_COOKIE)?.value().to_string();
    keys.verify(&token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        current_principal(&parts.headers, &state.tokens)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))
    }
}

/// An [`AuthUser`] whose role is superadmin. Extracted before any path or body
/// extractor, so a plain admin is refused before its input is parsed.
#[derive(Debug, Clone)]
pub struct Superadmin(pub AuthUser);

impl<S> FromRequestParts<S> for Superadmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_superadmin(&user)?;
        Ok(Superadmin(user))
    }
}
