use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::DashboardStats,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard_stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Catalog statistics", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = dashboard_service::dashboard_stats(&state).await?;
    Ok(Json(resp))
}
