use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    routing::post,
};

use crate::{
    dto::upload::{UploadForm, UploadedImage},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::upload_service,
    state::AppState,
};

const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_image))
}

fn no_file() -> AppError {
    AppError::BadRequest("No file provided".into())
}

#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored on the media host", body = ApiResponse<UploadedImage>),
        (status = 400, description = "No file provided"),
        (status = 500, description = "Upload failed")
    ),
    tag = "Upload"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<UploadedImage>>> {
    let mut multipart = multipart.map_err(|_| no_file())?;

    while let Some(field) = multipart.next_field().await.map_err(|_| no_file())? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|_| no_file())?;
        let resp =
            upload_service::upload_image(&state, &user, content_type.as_deref(), &bytes).await?;
        return Ok(Json(resp));
    }

    Err(no_file())
}
