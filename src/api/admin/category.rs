use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::entities::category::{self, Entity as CategoryEntity};
use crate::error::ApiError;

//ROUTERS
pub fn admin_category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", post(create_category).get(list_categories))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .layer(Extension(state))
}

//ROUTES
async fn create_category(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.required_name()?;

    let now = Utc::now();
    let new_category = category::ActiveModel {
        name: Set(name),
        description: Set(payload.description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = CategoryEntity::insert(new_category)
        .exec(state.db.as_ref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category added successfully",
            "id": result.last_insert_id
        })),
    ))
}

async fn update_category(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload.required_name()?;

    let txn = state.db.begin().await?;
    let current = CategoryEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No category with {id} id was found")))?;

    let mut active: category::ActiveModel = current.into();
    active.name = Set(name);
    active.description = Set(payload.description);
    active.updated_at = Set(Utc::now());

    active.update(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Category updated successfully" })),
    ))
}

async fn delete_category(
    Path(id): Path<i32>,
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let txn = state.db.begin().await?;
    let current = CategoryEntity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No category with {id} id was found")))?;

    let active: category::ActiveModel = current.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Category deleted successfully" })),
    ))
}

async fn list_categories(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = CategoryEntity::find()
        .order_by_desc(category::Column::CreatedAt)
        .all(state.db.as_ref())
        .await?;

    Ok((StatusCode::OK, Json(categories)))
}

//STRUCTS
#[derive(Deserialize)]
struct CategoryPayload {
    name: Option<String>,
    description: Option<String>,
}

impl CategoryPayload {
    fn required_name(&self) -> Result<String, ApiError> {
        match &self.name {
            Some(name) if !name.trim().is_empty() => Ok(name.clone()),
            _ => Err(ApiError::Validation("Category name is required".to_owned())),
        }
    }
}
