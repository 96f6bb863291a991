use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::{
    dto::upload::UploadedImage,
    error::{AppError, AppResult},
    media::PRODUCT_FOLDER,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub fn to_data_uri(content_type: Option<&str>, bytes: &[u8]) -> String {
    let mime = content_type
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    content_type: Option<&str>,
    bytes: &[u8],
) -> AppResult<ApiResponse<UploadedImage>> {
    if bytes.is_empty() {
        return Err(AppError::BadRequest("No file provided".into()));
    }

    let data_uri = to_data_uri(content_type, bytes);
    let uploaded = state
        .media
        .upload(data_uri, PRODUCT_FOLDER)
        .await
        .map_err(AppError::Upload)?;

    tracing::info!(user_id = %user.user_id, public_id = %uploaded.public_id, size = bytes.len(), "image uploaded");

    Ok(ApiResponse::success(
        "Uploaded",
        uploaded,
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_embeds_mime_and_base64() {
        assert_eq!(
            to_data_uri(Some("image/png"), b"hello"),
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn data_uri_falls_back_to_octet_stream() {
        assert_eq!(
            to_data_uri(None, &[0xff]),
            "data:application/octet-stream;base64,/w=="
        );
    }
}
