use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use sea_orm::{DatabaseBackend, MockDatabase};

use catalog_admin_api::{
    media::MockMediaHost, routes::health::health_check, state::AppState, token::TokenKeys,
};

#[tokio::test]
async fn health_check_returns_ok() {
    let state = AppState {
        orm: Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
        tokens: Arc::new(TokenKeys::new("health-secret")),
        media: Arc::new(MockMediaHost::new()),
        cookie_secure: false,
    };

    let (status, Json(response)) = health_check(State(state)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.message, "Health check");

    let data = response.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "up");
}
