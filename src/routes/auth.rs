use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use axum_extra::extract::{
    CookieJar, WithRejection,
    cookie::{Cookie, SameSite},
};
use uuid::Uuid;

use crate::{
    dto::auth::{AdminList, LoginRequest, LoginResponse, MeResponse, RegisterAdminRequest, SessionUser},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Superadmin},
    response::{ApiResponse, Meta},
    services::{admin_service, auth_service},
    state::AppState,
    token::{AUTH_COOKIE, SESSION_DAYS},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/register", post(register).get(list_admins))
        .route("/admin/{id}", delete(delete_admin))
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the auth-token cookie", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid email or password")
    ),
    security(()),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    let session = auth_service::login(&state, payload).await?;
    let jar = jar.add(session_cookie(session.token, state.cookie_secure));
    Ok((
        jar,
        Json(ApiResponse::success(
            "Login successful",
            LoginResponse { user: session.user },
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Cookie cleared"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn logout(
    jar: CookieJar,
    user: AuthUser,
) -> (CookieJar, Json<ApiResponse<serde_json::Value>>) {
    tracing::info!(user_id = %user.user_id, "admin logged out");
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (
        jar,
        Json(ApiResponse::success(
            "Logged out",
            serde_json::json!({}),
            Some(Meta::empty()),
        )),
    )
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current principal", body = ApiResponse<MeResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn me(user: AuthUser) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::success(
        "Current user",
        MeResponse { user },
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = ApiResponse<SessionUser>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Caller is not a superadmin"),
        (status = 409, description = "User with this email already exists")
    ),
    tag = "Admins"
)]
pub async fn register(
    State(state): State<AppState>,
    Superadmin(user): Superadmin,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterAdminRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<SessionUser>>)> {
    let resp = admin_service::register_admin(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/auth/register",
    responses(
        (status = 200, description = "All admins, newest first", body = ApiResponse<AdminList>),
        (status = 403, description = "Caller is not a superadmin")
    ),
    tag = "Admins"
)]
pub async fn list_admins(
    State(state): State<AppState>,
    Superadmin(user): Superadmin,
) -> AppResult<Json<ApiResponse<AdminList>>> {
    let resp = admin_service::list_admins(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/auth/admin/{id}",
    params(
        ("id" = Uuid, Path, description = "Admin ID")
    ),
    responses(
        (status = 200, description = "Admin deleted"),
        (status = 400, description = "Attempted to delete own account"),
        (status = 403, description = "Caller is not a superadmin"),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins"
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    Superadmin(user): Superadmin,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = admin_service::delete_admin(&state, &user, id).await?;
    Ok(Json(resp))
}
