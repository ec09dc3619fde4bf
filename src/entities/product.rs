use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::category::Entity as Category;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub price: f32,
    pub stock_quantity: i32,
    /// Storage-relative path, e.g. `/productImages/<name>`.
    pub thumbnail_url: Option<String>,
    /// JSON array of storage-relative paths; legacy rows may hold a
    /// comma-separated string instead. Decoded via `media::codec`.
    #[sea_orm(column_type = "Text")]
    pub additional_images: String,
    pub category_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Category",
        from = "crate::entities::product::Column::CategoryId",
        to = "crate::entities::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict",
    )]
    Category,
}

impl ActiveModelBehavior for ActiveModel {}
