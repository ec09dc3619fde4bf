pub mod category;
pub mod product;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};

use crate::entities::{category::Entity as CategoryEntity, product::Entity as ProductEntity};

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut create_categories = schema.create_table_from_entity(CategoryEntity);
    let mut create_products = schema.create_table_from_entity(ProductEntity);

    db.execute(backend.build(create_categories.if_not_exists()))
        .await?;
    db.execute(backend.build(create_products.if_not_exists()))
        .await?;

    Ok(())
}
