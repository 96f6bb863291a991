use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub cloudinary: CloudinaryConfig,
    pub host: String,
    pub port: u16,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let cloudinary = CloudinaryConfig {
            cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            api_key: required("CLOUDINARY_API_KEY")?,
            api_secret: required("CLOUDINARY_API_SECRET")?,
        };
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            database_url,
            jwt_secret,
            cloudinary,
            host,
            port,
            cookie_secure,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} is not set"))
}

/// Only `DATABASE_URL` is needed by the maintenance binaries.
pub fn database_url() -> anyhow::Result<String> {
    required("DATABASE_URL")
}
