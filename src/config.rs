use std::env;
use std::path::PathBuf;

/// Runtime configuration, loaded once at startup and passed into the router.
/// `DATABASE_URL` is required; everything else has a development default.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    /// Prefix prepended to storage-relative image paths when serving data.
    pub public_base_url: String,
    /// Directory that holds the `productImages/` storage tree.
    pub storage_root: PathBuf,
    /// Returned in place of a missing thumbnail.
    pub fallback_image_url: String,
    /// Per-file upload cap in bytes.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, env::VarError> {
        let database_url = env::var("DATABASE_URL")?;
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let fallback_image_url = env::var("FALLBACK_IMAGE_URL")
            .unwrap_or_else(|_| format!("{public_base_url}/placeholder.png"));

        Ok(AppConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_owned()),
            database_url,
            public_base_url,
            storage_root: env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "./public".to_owned())
                .into(),
            fallback_image_url,
            max_upload_bytes: env::var("FILE_SIZE_LIMIT")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(5 * 1024 * 1024),
        })
    }
}
