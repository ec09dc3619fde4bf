use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio_util::io::ReaderStream;

use crate::api::AppState;
use crate::error::ApiError;

/// Static passthrough for the product image storage directory.
pub fn public_image_router(state: AppState) -> Router {
    Router::new()
        .route("/productImages/:file", get(serve_image))
        .layer(Extension(state))
}

async fn serve_image(
    Path(file): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    if file.contains("..") {
        return Err(ApiError::NotFound("Not found".to_owned()));
    }

    let path = state.config.storage_root.join("productImages").join(&file);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::NotFound("Not found".to_owned()))?;

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );

    Ok((headers, body))
}
