mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{achievement, pluck, TestApp};

async fn seeded() -> Result<TestApp> {
    let app = TestApp::new();
    app.create("achievements", 1, achievement("Bike Week", "sustainability", 30)).await?;
    app.create("achievements", 1, achievement("Neighbour", "social", 10)).await?;
    app.create("achievements", 1, achievement("Solar Pioneer", "sustainability", 80)).await?;
    app.create("achievements", 1, json!({"name": "Explorer", "category": "exploration", "points": 50, "is_active": false}))
        .await?;
    Ok(app)
}

#[tokio::test]
async fn equality_filter_selects_category() -> Result<()> {
    let app = seeded().await?;
    let res = app.get("/api/v1/achievements?category=sustainability", 1).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(pluck(&res.body, "name"), vec![json!("Bike Week"), json!("Solar Pioneer")]);
    assert_eq!(res.body["meta"]["total"], 2);
    Ok(())
}

#[tokio::test]
async fn range_filter_is_inclusive() -> Result<()> {
    let app = seeded().await?;
    let res = app.get("/api/v1/achievements?points_min=30&points_max=50", 1).await?;

    assert_eq!(pluck(&res.body, "name"), vec![json!("Bike Week"), json!("Explorer")]);
    Ok(())
}

#[tokio::test]
async fn boolean_filter_and_malformed_values() -> Result<()> {
    let app = seeded().await?;

    let res = app.get("/api/v1/achievements?is_active=false", 1).await?;
    assert_eq!(pluck(&res.body, "name"), vec![json!("Explorer")]);

    // Not a boolean: the filter is ignored
    let res = app.get("/api/v1/achievements?is_active=maybe", 1).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["meta"]["total"], 4);
    Ok(())
}

#[tokio::test]
async fn search_matches_any_declared_column_case_insensitively() -> Result<()> {
    let app = seeded().await?;
    let res = app.get("/api/v1/achievements?search=SOLAR", 1).await?;
    assert_eq!(pluck(&res.body, "name"), vec![json!("Solar Pioneer")]);

    let res = app.get("/api/v1/achievements?search=", 1).await?;
    assert_eq!(res.body["meta"]["total"], 4);
    Ok(())
}

#[tokio::test]
async fn undeclared_parameters_are_ignored() -> Result<()> {
    let app = seeded().await?;
    let res = app.get("/api/v1/achievements?icon=star&category=", 1).await?;
    assert_eq!(res.body["meta"]["total"], 4);
    Ok(())
}

#[tokio::test]
async fn date_range_filter_uses_whole_days() -> Result<()> {
    let app = TestApp::new();
    app.create("challenges", 1, json!({"name": "Spring", "difficulty": "easy", "starts_at": "2024-03-10T08:00:00Z"}))
        .await?;
    app.create("challenges", 1, json!({"name": "Summer", "difficulty": "hard", "starts_at": "2024-06-21T18:30:00Z"}))
        .await?;

    let res = app.get("/api/v1/challenges?starts_at_from=2024-06-01&starts_at_to=2024-06-21", 1).await?;
    assert_eq!(pluck(&res.body, "name"), vec![json!("Summer")]);
    Ok(())
}

#[tokio::test]
async fn sort_parameter_orders_and_is_validated() -> Result<()> {
    let app = seeded().await?;

    let res = app.get("/api/v1/achievements?sort=-points", 1).await?;
    assert_eq!(pluck(&res.body, "points"), vec![json!(80), json!(50), json!(30), json!(10)]);

    let res = app.get("/api/v1/achievements?sort=icon", 1).await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["sort"], json!(["The selected sort is invalid."]));
    Ok(())
}
