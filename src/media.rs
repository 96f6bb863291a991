//! Hosted image storage.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{config::CloudinaryConfig, dto::upload::UploadedImage};

/// Folder every product image is filed under.
pub const PRODUCT_FOLDER: &str = "ecommerce-dashboard/products";

/// Uploads are downscaled to fit inside this box; smaller images are untouched.
const UPLOAD_TRANSFORMATION: &str = "c_limit,h_800,w_800";

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[automock]
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Stores `file` (a data URI) under `folder`.
    async fn upload(&self, file: String, folder: &str) -> Result<UploadedImage, MediaError>;

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

/// Client for Cloudinary's signed upload API.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    config: CloudinaryConfig,
    http: Client,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{API_BASE}/{}/image/{action}", self.config.cloud_name)
    }

    /// Adds `timestamp`, `api_key` and `signature` to the signed parameters and builds the form.
    fn signed_form(&self, mut params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = sign(&params, &self.config.api_secret);

        let mut form: Vec<(&'static str, String)> = params.into_iter().collect();
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));
        form
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        form: Vec<(&'static str, String)>,
    ) -> Result<T, MediaError> {
        let response = self.http.post(self.endpoint(action)).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MediaError::UnexpectedResponse(format!(
                "{action} request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(&self, file: String, folder: &str) -> Result<UploadedImage, MediaError> {
        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        params.insert("transformation", UPLOAD_TRANSFORMATION.to_string());

        let mut form = self.signed_form(params);
        form.push(("file", file));

        let parsed: UploadResponse = self.post("upload", form).await?;
        Ok(UploadedImage {
            url: parsed.secure_url,
            public_id: parsed.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());

        let parsed: DestroyResponse = self.post("destroy", self.signed_form(params)).await?;
        if parsed.result != "ok" {
            tracing::debug!(public_id, result = %parsed.result, "destroy returned non-ok result");
        }
        Ok(())
    }
}

/// Cloudinary request signature: sorted `key=value` pairs joined by `&`, secret appended, hex digest.
pub fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from media host: {0}")]
    UnexpectedResponse(String),
}
