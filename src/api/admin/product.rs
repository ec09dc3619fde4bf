use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    prelude::DateTimeUtc, ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use serde_json::json;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::entities::{
    category::Entity as CategoryEntity,
    product::{self, Entity as ProductEntity},
};
use crate::error::ApiError;
use crate::media::codec::{decode_image_list, encode_image_list, to_public_url};
use crate::media::lifecycle::{plan_create, plan_delete, plan_update, spawn_file_deletions};
use crate::media::upload::collect_product_form;

//ROUTERS
pub fn admin_product_router(state: AppState) -> Router {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/:id",
            patch(update_product).delete(delete_product),
        )
        .layer(Extension(state))
}

//ROUTES
async fn create_product(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = collect_product_form(&mut multipart, &state.config).await?;

    let name = match form.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(ApiError::Validation("Missing required fields".to_owned())),
    };
    let price = form
        .price
        .ok_or_else(|| ApiError::Validation("Missing required fields".to_owned()))?;
    if !price.is_finite() || price <= 0.0 {
        return Err(ApiError::Validation(
            "Price must be greater than zero".to_owned(),
        ));
    }
    let stock_quantity = form
        .stock_quantity
        .ok_or_else(|| ApiError::Validation("Missing required fields".to_owned()))?;
    if stock_quantity < 0 {
        return Err(ApiError::Validation(
            "Stock quantity must not be negative".to_owned(),
        ));
    }
    let category_id = form
        .category_id
        .ok_or_else(|| ApiError::Validation("Missing required fields".to_owned()))?;

    let txn = state.db.begin().await?;
    ensure_category_exists(&txn, category_id).await?;

    let plan = plan_create(form.staged_thumbnail, form.staged_gallery);

    let now = Utc::now();
    let new_product = product::ActiveModel {
        name: Set(name),
        description: Set(form.description),
        price: Set(price),
        stock_quantity: Set(stock_quantity),
        thumbnail_url: Set(plan.thumbnail_url),
        additional_images: Set(encode_image_list(&plan.gallery)),
        category_id: Set(category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = ProductEntity::insert(new_product).exec(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product added successfully",
            "id": result.last_insert_id
        })),
    ))
}

async fn update_product(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = collect_product_form(&mut multipart, &state.config).await?;

    if !form.has_updates() {
        return Err(ApiError::Validation("Nothing to update".to_owned()));
    }

    let txn = state.db.begin().await?;
    let current = ProductEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No product with {id} id was found")))?;

    let current_gallery = decode_image_list(Some(&current.additional_images));
    let retained = decode_image_list(form.existing_additional_images.as_deref());
    let plan = plan_update(
        current.thumbnail_url.as_deref(),
        &current_gallery,
        &retained,
        form.staged_thumbnail,
        form.staged_gallery,
    );

    let mut active: product::ActiveModel = current.into();
    if let Some(name) = form.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Product name is required".to_owned()));
        }
        active.name = Set(name);
    }
    if let Some(description) = form.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = form.price {
        if !price.is_finite() || price < 0.0 {
            return Err(ApiError::Validation(
                "Price must not be negative".to_owned(),
            ));
        }
        active.price = Set(price);
    }
    if let Some(stock_quantity) = form.stock_quantity {
        if stock_quantity < 0 {
            return Err(ApiError::Validation(
                "Stock quantity must not be negative".to_owned(),
            ));
        }
        active.stock_quantity = Set(stock_quantity);
    }
    if let Some(category_id) = form.category_id {
        ensure_category_exists(&txn, category_id).await?;
        active.category_id = Set(category_id);
    }

    // the media slots are always rewritten, the plan recomputed them
    active.thumbnail_url = Set(plan.thumbnail_url.clone());
    active.additional_images = Set(encode_image_list(&plan.gallery));
    active.updated_at = Set(Utc::now());

    active.update(&txn).await?;
    txn.commit().await?;

    // row is persisted; file cleanup is best-effort and detached
    spawn_file_deletions(&state.config.storage_root, plan.to_delete);

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Product updated successfully" })),
    ))
}

async fn delete_product(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let current = ProductEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No product with {id} id was found")))?;

    let gallery = decode_image_list(Some(&current.additional_images));
    let doomed = plan_delete(current.thumbnail_url.as_deref(), &gallery);

    let active: product::ActiveModel = current.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    spawn_file_deletions(&state.config.storage_root, doomed);

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Product deleted successfully" })),
    ))
}

async fn list_products(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = ProductEntity::find()
        .order_by_desc(product::Column::CreatedAt)
        .all(state.db.as_ref())
        .await?;

    let response: Vec<ProductResponse> = products
        .into_iter()
        .map(|model| ProductResponse::new(model, &state.config))
        .collect();

    Ok((StatusCode::OK, Json(response)))
}

async fn ensure_category_exists<C: ConnectionTrait>(
    conn: &C,
    category_id: i32,
) -> Result<(), ApiError> {
    match CategoryEntity::find_by_id(category_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::Validation(format!(
            "No category with {category_id} id was found"
        ))),
    }
}

//STRUCTS
#[derive(Serialize)]
struct ProductResponse {
    id: i32,
    name: String,
    description: Option<String>,
    price: f32,
    stock_quantity: i32,
    category_id: i32,
    /// Public URL; the fallback image when the product has no thumbnail.
    thumbnail_url: String,
    additional_images: Vec<String>,
    created_at: DateTimeUtc,
    updated_at: DateTimeUtc,
}

impl ProductResponse {
    fn new(model: product::Model, config: &AppConfig) -> ProductResponse {
        let base = &config.public_base_url;
        let fallback = &config.fallback_image_url;
        let gallery = decode_image_list(Some(&model.additional_images));

        ProductResponse {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock_quantity: model.stock_quantity,
            category_id: model.category_id,
            thumbnail_url: to_public_url(model.thumbnail_url.as_deref(), base, fallback),
            additional_images: gallery
                .iter()
                .map(|path| to_public_url(Some(path), base, fallback))
                .collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
