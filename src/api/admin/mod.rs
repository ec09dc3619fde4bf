pub mod category;
pub mod product;

use axum::Router;

use crate::api::AppState;

use category::admin_category_router;
use product::admin_product_router;

pub fn admin_api_router(state: AppState) -> Router {
    let admin_category_router = admin_category_router(state.clone());
    let admin_product_router = admin_product_router(state);

    Router::new()
        .nest("/", admin_category_router)
        .nest("/", admin_product_router)
}
