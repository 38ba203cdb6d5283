mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use common::{achievement, TestApp};

#[tokio::test]
async fn create_returns_201_with_rendered_record() -> Result<()> {
    let app = TestApp::new();
    let res = app
        .post("/api/v1/achievements", 1, achievement("Green Commuter", "sustainability", 50))
        .await?;

    assert_eq!(res.status, StatusCode::CREATED);
    let data = &res.body["data"];
    assert_eq!(data["id"], 1);
    assert_eq!(data["name"], "Green Commuter");
    assert_eq!(data["points"], 50);
    assert_eq!(data["usage_count"], 0);
    assert!(data["created_at"].is_string());
    assert_eq!(data["created_at"], data["updated_at"]);
    Ok(())
}

#[tokio::test]
async fn show_returns_record_or_404() -> Result<()> {
    let app = TestApp::new();
    app.create("tags", 1, json!({"name": "outdoors"})).await?;

    let res = app.get("/api/v1/tags/1", 1).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], "outdoors");

    let res = app.get("/api/v1/tags/99", 1).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/v1/tags/not-a-number", 1).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn put_and_patch_are_partial_updates() -> Result<()> {
    let app = TestApp::new();
    app.create("tags", 1, json!({"name": "music", "color": "#112233"})).await?;

    let res = app.put("/api/v1/tags/1", 1, json!({"name": "live music"})).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], "live music");
    assert_eq!(res.body["data"]["color"], "#112233");

    let res = app.patch("/api/v1/tags/1", 1, json!({"is_featured": true})).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["name"], "live music");
    assert_eq!(res.body["data"]["is_featured"], true);
    Ok(())
}

#[tokio::test]
async fn update_cannot_overwrite_system_fields() -> Result<()> {
    let app = TestApp::new();
    let created = app.create("tags", 1, json!({"name": "art"})).await?;

    let res = app
        .put("/api/v1/tags/1", 1, json!({"id": 50, "created_at": "2000-01-01T00:00:00Z"}))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["id"], 1);
    assert_eq!(res.body["data"]["created_at"], created["created_at"]);
    Ok(())
}

#[tokio::test]
async fn delete_returns_204_then_404() -> Result<()> {
    let app = TestApp::new();
    app.create("tags", 1, json!({"name": "food"})).await?;

    let res = app.delete("/api/v1/tags/1", 1).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_null());

    let res = app.get("/api/v1/tags/1", 1).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.delete("/api/v1/tags/1", 1).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_resource_is_404() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/v1/spaceships", 1).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.post("/api/v1/spaceships", 1, json!({"name": "x"})).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/tags")
        .header(header::AUTHORIZATION, format!("Bearer {}", common::token(1)?))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))?;

    let res = app.send(request).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["message"].is_string());

    let res = app.post("/api/v1/tags", 1, json!(["not", "an", "object"])).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn relations_are_embedded_and_hidden_fields_dropped() -> Result<()> {
    let app = TestApp::new();
    app.create("organizations", 1, json!({"name": "Friends of Parks", "type": "nonprofit"})).await?;
    app.create("venues", 1, json!({"name": "Town Hall", "address": "Main St 1"})).await?;
    let event = app
        .create(
            "events",
            1,
            json!({
                "title": "Cleanup",
                "venue_id": 1,
                "organization_id": 1,
                "starts_at": "2024-06-01T09:00:00Z",
                "ends_at": "2024-06-01T11:15:00Z",
            }),
        )
        .await?;

    assert_eq!(event["venue"], json!({"id": 1, "name": "Town Hall", "address": "Main St 1"}));
    assert_eq!(event["organization"]["name"], "Friends of Parks");
    assert_eq!(event["duration_minutes"], 135);

    app.seed("reports", json!({"title": "Q1", "type": "activity", "user_id": 4, "file_path": "/secret/q1.pdf"}))
        .await?;
    let res = app.get("/api/v1/reports/1", 4).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["data"].get("file_path").is_none());
    Ok(())
}
