//! Upload staging: drains a multipart product form, writes accepted image
//! files under `<storage_root>/productImages/` with unique names, and hands
//! the handler the scalar fields plus the staged storage-relative paths.
//!
//! A rejected file (bad type, over the size cap) fails the whole request
//! before anything touches the database.

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs as tokio_fs;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::media::lifecycle::GALLERY_LIMIT;

pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const GALLERY_FIELD: &str = "additional_images";

/// URL prefix under which staged files are stored and served.
pub const IMAGE_URL_PREFIX: &str = "/productImages";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A parsed product form: whichever scalar fields the caller sent, plus the
/// staged files as storage-relative paths.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f32>,
    pub stock_quantity: Option<i32>,
    pub category_id: Option<i32>,
    /// Gallery paths the caller wants to keep, raw as sent (JSON or CSV).
    pub existing_additional_images: Option<String>,
    pub staged_thumbnail: Option<String>,
    pub staged_gallery: Vec<String>,
}

impl ProductForm {
    /// Whether the form carries anything a PATCH could apply.
    pub fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.price.is_some()
            || self.stock_quantity.is_some()
            || self.category_id.is_some()
            || self.existing_additional_images.is_some()
            || self.staged_thumbnail.is_some()
            || !self.staged_gallery.is_empty()
    }
}

pub async fn collect_product_form(
    multipart: &mut Multipart,
    config: &AppConfig,
) -> Result<ProductForm, ApiError> {
    let image_dir = config.storage_root.join("productImages");
    tokio_fs::create_dir_all(&image_dir).await?;

    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Media(format!("Malformed multipart body: {err}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            THUMBNAIL_FIELD => {
                if form.staged_thumbnail.is_none() {
                    form.staged_thumbnail = Some(stage_image_file(field, &image_dir, config).await?);
                } else {
                    // only one thumbnail slot; drain the extra part
                    let _ = field.bytes().await;
                }
            }
            GALLERY_FIELD => {
                if form.staged_gallery.len() < GALLERY_LIMIT {
                    form.staged_gallery
                        .push(stage_image_file(field, &image_dir, config).await?);
                } else {
                    let _ = field.bytes().await;
                }
            }
            "name" => form.name = Some(text_field(field).await?),
            "description" => form.description = Some(text_field(field).await?),
            "price" => {
                let raw = text_field(field).await?;
                let price = raw.trim().parse::<f32>().map_err(|_| {
                    ApiError::Validation(format!("Invalid price: {raw}"))
                })?;
                form.price = Some(price);
            }
            "stock_quantity" => {
                let raw = text_field(field).await?;
                let quantity = raw.trim().parse::<i32>().map_err(|_| {
                    ApiError::Validation(format!("Invalid stock quantity: {raw}"))
                })?;
                form.stock_quantity = Some(quantity);
            }
            "category_id" => {
                let raw = text_field(field).await?;
                let id = raw.trim().parse::<i32>().map_err(|_| {
                    ApiError::Validation(format!("Invalid category id: {raw}"))
                })?;
                form.category_id = Some(id);
            }
            "existing_additional_images" => {
                form.existing_additional_images = Some(text_field(field).await?);
            }
            _ => {
                // unknown fields are ignored, but must still be drained
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}

async fn text_field(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| ApiError::Media(format!("Failed to read form field: {err}")))
}

/// Validates and writes one uploaded image, returning its storage-relative
/// path. The stored name is `<uuid>-<original name>` with whitespace
/// collapsed, so the extension survives for content-type guessing.
async fn stage_image_file(
    field: Field<'_>,
    image_dir: &Path,
    config: &AppConfig,
) -> Result<String, ApiError> {
    let original_name = field.file_name().unwrap_or("image").to_owned();

    let content_type = field
        .content_type()
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Media("Content type is not set".to_owned()))?;
    if !is_allowed_content_type(&content_type) {
        return Err(ApiError::Media(format!(
            "Only image files are allowed, got {content_type}"
        )));
    }
    if !has_allowed_extension(&original_name) {
        return Err(ApiError::Media(format!(
            "Only image files are allowed, got {original_name}"
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|err| ApiError::Media(format!("Failed to read file bytes: {err}")))?;
    if data.len() > config.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge);
    }

    let safe_name = WHITESPACE_RE.replace_all(&original_name, "-");
    let file_name = format!("{}-{}", Uuid::new_v4(), safe_name);
    tokio_fs::write(image_dir.join(&file_name), &data).await?;

    Ok(format!("{IMAGE_URL_PREFIX}/{file_name}"))
}

fn is_allowed_content_type(content_type: &str) -> bool {
    // `image/jpg` is nonstandard but some clients still send it
    matches!(
        content_type,
        "image/jpeg" | "image/jpg" | "image/png" | "image/gif"
    )
}

fn has_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "jpeg" | "jpg" | "png" | "gif"
            )
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_image_types_only() {
        assert!(is_allowed_content_type("image/jpeg"));
        assert!(is_allowed_content_type("image/jpg"));
        assert!(is_allowed_content_type("image/png"));
        assert!(is_allowed_content_type("image/gif"));
        assert!(!is_allowed_content_type("text/plain"));
        assert!(!is_allowed_content_type("application/pdf"));
    }

    #[test]
    fn checks_the_file_extension_too() {
        assert!(has_allowed_extension("photo.JPG"));
        assert!(has_allowed_extension("a b.jpeg"));
        assert!(has_allowed_extension("x.gif"));
        assert!(!has_allowed_extension("payload.exe"));
        assert!(!has_allowed_extension("no_extension"));
    }

    #[test]
    fn empty_form_has_no_updates() {
        let form = ProductForm::default();
        assert!(!form.has_updates());

        let form = ProductForm {
            existing_additional_images: Some("[]".to_owned()),
            ..Default::default()
        };
        assert!(form.has_updates());
    }
}
