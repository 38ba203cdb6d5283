mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{pluck, TestApp};

const ALICE: i64 = 1;
const BOB: i64 = 2;

async fn with_sync_logs() -> Result<TestApp> {
    let app = TestApp::new();
    app.create("sync_logs", ALICE, json!({"source": "calendar", "status": "pending"})).await?;
    app.create("sync_logs", BOB, json!({"source": "contacts", "status": "pending"})).await?;
    app.create("sync_logs", ALICE, json!({"source": "photos", "status": "pending", "user_id": BOB})).await?;
    Ok(app)
}

#[tokio::test]
async fn owner_is_always_the_caller() -> Result<()> {
    let app = with_sync_logs().await?;

    let res = app.get("/api/v1/sync_logs/3", ALICE).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["user_id"], ALICE);
    Ok(())
}

#[tokio::test]
async fn lists_only_show_own_records() -> Result<()> {
    let app = with_sync_logs().await?;

    let res = app.get("/api/v1/sync_logs?sort=created_at", ALICE).await?;
    assert_eq!(pluck(&res.body, "source"), vec![json!("calendar"), json!("photos")]);
    assert_eq!(res.body["meta"]["total"], 2);

    // The owner filter cannot be widened from the query string
    let res = app.get(&format!("/api/v1/sync_logs?user_id={}", BOB), ALICE).await?;
    assert_eq!(res.body["meta"]["total"], 2);
    Ok(())
}

#[tokio::test]
async fn foreign_records_look_missing() -> Result<()> {
    let app = with_sync_logs().await?;

    assert_eq!(app.get("/api/v1/sync_logs/2", ALICE).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put("/api/v1/sync_logs/2", ALICE, json!({"status": "failed"})).await?.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete("/api/v1/sync_logs/2", ALICE).await?.status, StatusCode::NOT_FOUND);

    // Bob's record is untouched
    let res = app.get("/api/v1/sync_logs/2", BOB).await?;
    assert_eq!(res.body["data"]["status"], "pending");
    Ok(())
}

#[tokio::test]
async fn owner_cannot_be_reassigned() -> Result<()> {
    let app = with_sync_logs().await?;

    let res = app.patch("/api/v1/sync_logs/1", ALICE, json!({"user_id": BOB, "source": "mail"})).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["user_id"], ALICE);
    assert_eq!(res.body["data"]["source"], "mail");
    Ok(())
}

#[tokio::test]
async fn nested_actions_respect_ownership() -> Result<()> {
    let app = TestApp::new();
    app.create("reports", ALICE, json!({"title": "Impact", "type": "impact"})).await?;

    let res = app.action("/api/v1/reports/1/download", BOB).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.action("/api/v1/reports/1/download", ALICE).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"message": "Report download started"}));
    Ok(())
}

#[tokio::test]
async fn per_user_uniqueness_is_scoped_by_owner() -> Result<()> {
    let app = TestApp::new();
    app.create("achievements", ALICE, json!({"name": "First Steps", "category": "engagement"})).await?;

    app.create("user_achievements", ALICE, json!({"achievement_id": 1, "status": "locked"})).await?;
    app.create("user_achievements", BOB, json!({"achievement_id": 1, "status": "locked"})).await?;

    let res = app
        .post("/api/v1/user_achievements", ALICE, json!({"achievement_id": 1, "status": "in_progress"}))
        .await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["achievement_id"], json!(["The achievement id has already been taken."]));
    Ok(())
}
