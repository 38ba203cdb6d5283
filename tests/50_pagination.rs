mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{pluck, TestApp};

async fn with_tags(count: usize) -> Result<TestApp> {
    let app = TestApp::new();
    for i in 1..=count {
        app.seed("tags", json!({ "name": format!("tag-{:02}", i) })).await?;
    }
    Ok(app)
}

#[tokio::test]
async fn default_page_uses_configured_size() -> Result<()> {
    let app = with_tags(20).await?;
    let res = app.get("/api/v1/tags", 1).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().map(Vec::len), Some(15));
    assert_eq!(
        res.body["meta"],
        json!({"current_page": 1, "last_page": 2, "per_page": 15, "total": 20})
    );
    Ok(())
}

#[tokio::test]
async fn pages_do_not_overlap() -> Result<()> {
    let app = with_tags(7).await?;

    let first = app.get("/api/v1/tags?per_page=3&page=1", 1).await?;
    let second = app.get("/api/v1/tags?per_page=3&page=2", 1).await?;
    let third = app.get("/api/v1/tags?per_page=3&page=3", 1).await?;

    assert_eq!(pluck(&first.body, "name"), vec![json!("tag-01"), json!("tag-02"), json!("tag-03")]);
    assert_eq!(pluck(&second.body, "name"), vec![json!("tag-04"), json!("tag-05"), json!("tag-06")]);
    assert_eq!(pluck(&third.body, "name"), vec![json!("tag-07")]);
    assert_eq!(third.body["meta"]["last_page"], 3);
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() -> Result<()> {
    let app = with_tags(2).await?;
    let res = app.get("/api/v1/tags?page=9", 1).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], json!([]));
    assert_eq!(res.body["meta"]["total"], 2);
    assert_eq!(res.body["meta"]["current_page"], 9);
    Ok(())
}

#[tokio::test]
async fn empty_collection_has_one_page() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/v1/tags", 1).await?;
    assert_eq!(res.body["meta"]["last_page"], 1);
    assert_eq!(res.body["meta"]["total"], 0);
    Ok(())
}

#[tokio::test]
async fn oversized_per_page_is_rejected_not_clamped() -> Result<()> {
    let app = with_tags(1).await?;
    let res = app.get("/api/v1/tags?per_page=101", 1).await?;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        res.body["errors"]["per_page"],
        json!(["The per page field must not be greater than 100."])
    );
    Ok(())
}

#[tokio::test]
async fn every_bad_parameter_is_reported() -> Result<()> {
    let app = with_tags(1).await?;
    let res = app.get("/api/v1/tags?page=0&per_page=abc&sort=nope", 1).await?;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = res.body["errors"].as_object().cloned().unwrap_or_default();
    assert!(errors.contains_key("page"));
    assert!(errors.contains_key("per_page"));
    assert!(errors.contains_key("sort"));
    assert_eq!(res.body["message"], "The page field must be at least 1. (and 2 more errors)");
    Ok(())
}
