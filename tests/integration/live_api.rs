//! API integration tests against a running server
//!
//! Needs the server on localhost:8000 with both stores reachable and a user
//! created via `seed_books --user testuser:t18$V3Y9]lE)`.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8000/api";

/// Helper to get an access token for the seeded user
async fn get_access_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth-token/", BASE_URL))
        .json(&json!({
            "username": "testuser",
            "password": "t18$V3Y9]lE)"
        }))
        .send()
        .await
        .expect("Failed to send token request");

    let body: Value = response.json().await.expect("Failed to parse token response");
    body["access"].as_str().expect("No access token in response").to_string()
}

async fn create_book(client: &Client, token: &str, published_date: &str, price: &str) -> Value {
    let response = client
        .post(format!("{}/books/", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "published_date": published_date,
            "gender": "Fiction",
            "price": price
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth-token/", BASE_URL))
        .json(&json!({
            "username": "testuser",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_refresh_token() {
    let client = Client::new();

    let response = client
        .post(format!("{}/token/", BASE_URL))
        .json(&json!({
            "username": "testuser",
            "password": "t18$V3Y9]lE)"
        }))
        .send()
        .await
        .expect("Failed to send request");
    let pair: Value = response.json().await.expect("Failed to parse response");

    let response = client
        .post(format!("{}/token/refresh/", BASE_URL))
        .json(&json!({ "refresh": pair["refresh"] }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let access = body["access"].as_str().expect("No access token in response");

    let response = client
        .get(format!("{}/books/", BASE_URL))
        .bearer_auth(access)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_book() {
    let client = Client::new();
    let token = get_access_token(&client).await;

    let created = create_book(&client, &token, "2020-01-01", "19.99").await;
    let id = created["id"].as_i64().expect("No id in response");

    let response = client
        .get(format!("{}/books/{}/", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched, created);
    assert_eq!(fetched["price"], "19.99");
}

#[tokio::test]
#[ignore]
async fn test_get_missing_book() {
    let client = Client::new();
    let token = get_access_token(&client).await;

    let response = client
        .get(format!("{}/books/{}/", BASE_URL, i64::MAX))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_update_and_delete_book() {
    let client = Client::new();
    let token = get_access_token(&client).await;

    let created = create_book(&client, &token, "2018-06-15", "12.50").await;
    let id = created["id"].as_i64().expect("No id in response");

    let response = client
        .patch(format!("{}/books/{}/", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "price": "15.00" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let patched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(patched["price"], "15.00");
    assert_eq!(patched["title"], created["title"]);

    let response = client
        .delete(format!("{}/books/{}/", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/{}/", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_page_size_is_clamped() {
    let client = Client::new();
    let token = get_access_token(&client).await;

    let response = client
        .get(format!("{}/books/?page_size=50", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["page_size"], 10);
    assert!(body["results"].as_array().unwrap().len() <= 10);
}

#[tokio::test]
#[ignore]
async fn test_avg_price_by_year() {
    let client = Client::new();
    let token = get_access_token(&client).await;

    // Use a year nothing else in the catalog falls into
    for price in ["10.00", "20.00", "30.00"] {
        create_book(&client, &token, "1901-03-01", price).await;
    }

    let response = client
        .get(format!("{}/books/avg-price/1901/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!([{ "year": 1901, "avg_price": "20.00" }]));
}
