mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

#[tokio::test]
async fn test_shorten_generates_code() {
    let app = common::spawn_app();
    let token = app.register("alice").await;

    let body = app.shorten(&token, "https://example.com/page", None).await;

    let code = body["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["shortUrl"], format!("{}/{}", common::BASE_URL, code));
    assert_eq!(body["originalUrl"], "https://example.com/page");
    assert_eq!(body["clicks"], 0);
    assert!(body["id"].is_i64());
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_shorten_with_custom_code() {
    let app = common::spawn_app();
    let token = app.register("alice").await;

    let body = app
        .shorten(&token, "https://example.com/promo", Some("promo-2025"))
        .await;

    assert_eq!(body["shortCode"], "promo-2025");
}

#[tokio::test]
async fn test_shorten_empty_custom_code_generates_one() {
    let app = common::spawn_app();
    let token = app.register("alice").await;

    let body = app.shorten(&token, "https://example.com", Some("")).await;

    assert_eq!(body["shortCode"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_custom_code_conflict_keeps_existing_mapping() {
    let app = common::spawn_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    app.shorten(&alice, "https://alice.example.com", Some("taken"))
        .await;

    let response = app
        .server
        .post("/url/shorten")
        .add_header("Authorization", common::bearer(&bob))
        .json(&json!({ "originalUrl": "https://bob.example.com", "customCode": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let redirect = app.server.get("/taken").await;
    assert_eq!(redirect.status_code(), StatusCode::FOUND);
    assert_eq!(redirect.header("location"), "https://alice.example.com/");
}

#[tokio::test]
async fn test_shorten_rejects_invalid_input() {
    let app = common::spawn_app();
    let token = app.register("alice").await;

    for body in [
        json!({ "originalUrl": "ftp://example.com/file" }),
        json!({ "originalUrl": "not a url" }),
        json!({ "originalUrl": "https://example.com", "customCode": "a b" }),
        json!({ "originalUrl": "https://example.com", "customCode": "health" }),
    ] {
        app.server
            .post("/url/shorten")
            .add_header("Authorization", common::bearer(&token))
            .json(&body)
            .await
            .assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_shorten_daily_quota() {
    let mut settings = common::test_settings();
    settings.shorten_daily_limit = 2;
    let app = common::spawn_app_with(Arc::new(common::CountingCache::default()), settings);
    let token = app.register("alice").await;

    app.shorten(&token, "https://example.com/1", None).await;
    app.shorten(&token, "https://example.com/2", None).await;

    let response = app
        .server
        .post("/url/shorten")
        .add_header("Authorization", common::bearer(&token))
        .json(&json!({ "originalUrl": "https://example.com/3" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    // The quota is per user.
    let other = app.register("bob").await;
    app.shorten(&other, "https://example.com/4", None).await;
}

#[tokio::test]
async fn test_my_urls_lists_only_own_urls_with_clicks() {
    let app = common::spawn_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let first = app.shorten(&alice, "https://example.com/a", Some("first")).await;
    app.shorten(&alice, "https://example.com/b", Some("second")).await;
    app.shorten(&bob, "https://example.com/c", Some("bobs")).await;

    let first_id = first["id"].as_i64().unwrap();
    app.seed_click(first_id, chrono::Utc::now(), None).await;
    app.seed_click(first_id, chrono::Utc::now(), None).await;

    let response = app
        .server
        .get("/url/my-urls")
        .add_header("Authorization", common::bearer(&alice))
        .await;

    response.assert_status_ok();
    let urls: Vec<Value> = response.json();
    assert_eq!(urls.len(), 2);

    let codes: Vec<&str> = urls.iter().map(|u| u["shortCode"].as_str().unwrap()).collect();
    assert!(codes.contains(&"first"));
    assert!(codes.contains(&"second"));

    let first = urls.iter().find(|u| u["shortCode"] == "first").unwrap();
    assert_eq!(first["clicks"], 2);
}

#[tokio::test]
async fn test_get_url_by_id() {
    let app = common::spawn_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let created = app.shorten(&alice, "https://example.com", Some("mine")).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .get(&format!("/url/{id}"))
        .add_header("Authorization", common::bearer(&alice))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["shortCode"], "mine");

    app.server
        .get(&format!("/url/{id}"))
        .add_header("Authorization", common::bearer(&bob))
        .await
        .assert_status_forbidden();

    app.server
        .get("/url/99999")
        .add_header("Authorization", common::bearer(&alice))
        .await
        .assert_status_forbidden();

    app.server
        .get("/url/not-a-number")
        .add_header("Authorization", common::bearer(&alice))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_url() {
    let app = common::spawn_app();
    let alice = app.register("alice").await;

    let created = app.shorten(&alice, "https://example.com", Some("gone")).await;
    let id = created["id"].as_i64().unwrap();

    app.server
        .delete(&format!("/url/{id}"))
        .add_header("Authorization", common::bearer(&alice))
        .await
        .assert_status_ok();

    app.server.get("/gone").await.assert_status_not_found();

    app.server
        .delete(&format!("/url/{id}"))
        .add_header("Authorization", common::bearer(&alice))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_url_not_owned_is_forbidden_and_row_intact() {
    let app = common::spawn_app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let created = app.shorten(&alice, "https://example.com", Some("keep")).await;
    let id = created["id"].as_i64().unwrap();

    app.server
        .delete(&format!("/url/{id}"))
        .add_header("Authorization", common::bearer(&bob))
        .await
        .assert_status_forbidden();

    let redirect = app.server.get("/keep").await;
    assert_eq!(redirect.status_code(), StatusCode::FOUND);
}
