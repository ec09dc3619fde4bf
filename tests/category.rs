use reqwest::{Client, StatusCode};
use serde_json::json;
use tokio;

/// Helper function to get the base URL of the API
fn api_base_url() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

async fn create_category(client: &Client) -> i64 {
    let response = client
        .post(format!("{}/admin/categories", api_base_url()))
        .json(&json!({
            "name": format!("Category {}", uuid::Uuid::new_v4()),
            "description": "A test category"
        }))
        .send()
        .await
        .expect("Failed to send create category request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Category added successfully");
    body["id"].as_i64().expect("Id not found in response")
}

#[tokio::test]
async fn test_create_category() {
    let client = Client::new();
    create_category(&client).await;
}

#[tokio::test]
async fn test_create_category_requires_name() {
    let client = Client::new();

    let response = client
        .post(format!("{}/admin/categories", api_base_url()))
        .json(&json!({ "description": "no name" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Category name is required");
}

#[tokio::test]
async fn test_update_category() {
    let client = Client::new();
    let category_id = create_category(&client).await;

    let response = client
        .put(format!("{}/admin/categories/{}", api_base_url(), category_id))
        .json(&json!({
            "name": format!("Renamed {}", uuid::Uuid::new_v4())
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Category updated successfully");
}

#[tokio::test]
async fn test_update_category_not_found() {
    let client = Client::new();

    let response = client
        .put(format!("{}/admin/categories/{}", api_base_url(), 9_999_999))
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_category() {
    let client = Client::new();
    let category_id = create_category(&client).await;

    let response = client
        .delete(format!("{}/admin/categories/{}", api_base_url(), category_id))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/admin/categories/{}", api_base_url(), category_id))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_categories() {
    let client = Client::new();
    create_category(&client).await;

    let response = client
        .get(format!("{}/admin/categories", api_base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.is_array());
}
