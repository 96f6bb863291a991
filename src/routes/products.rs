use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    dto::products::{ProductEnvelope, ProductList, ProductRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 400, description = "Unknown category or status filter"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<ProductQuery>, AppError>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductEnvelope>),
        (status = 404, description = "Product not found")
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<ApiResponse<ProductEnvelope>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<ProductEnvelope>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Product with this SKU already exists")
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(payload), _): WithRejection<Json<ProductRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductEnvelope>>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<ProductEnvelope>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product with this SKU already exists")
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<ProductRequest>, AppError>,
) -> AppResult<Json<ApiResponse<ProductEnvelope>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully"),
        (status = 404, description = "Product not found")
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}
