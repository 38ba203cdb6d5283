mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{achievement, TestApp};

#[tokio::test]
async fn required_fields_are_reported_with_laravel_messages() -> Result<()> {
    let app = TestApp::new();
    let res = app.post("/api/v1/achievements", 1, json!({"description": "no name"})).await?;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["name"], json!(["The name field is required."]));
    assert_eq!(res.body["errors"]["category"], json!(["The category field is required."]));
    assert_eq!(res.body["message"], "The category field is required. (and 1 more error)");
    Ok(())
}

#[tokio::test]
async fn blank_strings_count_as_missing() -> Result<()> {
    let app = TestApp::new();
    let res = app.post("/api/v1/tags", 1, json!({"name": "   "})).await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["name"], json!(["The name field is required."]));

    app.create("tags", 1, json!({"name": "parks", "slug": "parks"})).await?;

    // Omitted on update is fine, blanked is not
    let res = app.patch("/api/v1/tags/1", 1, json!({"is_featured": true})).await?;
    assert_eq!(res.status, StatusCode::OK);
    let res = app.put("/api/v1/tags/1", 1, json!({"name": ""})).await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["name"], json!(["The name field is required."]));

    // Optional fields may be cleared
    let res = app.put("/api/v1/tags/1", 1, json!({"slug": ""})).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["data"]["slug"].is_null());
    Ok(())
}

#[tokio::test]
async fn format_and_enum_rules() -> Result<()> {
    let app = TestApp::new();
    let res = app
        .post(
            "/api/v1/venues",
            1,
            json!({
                "name": "Dock",
                "email": "not-an-email",
                "website": "ftp://example.com",
                "latitude": 120,
                "capacity": "lots",
            }),
        )
        .await?;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &res.body["errors"];
    assert_eq!(errors["email"], json!(["The email field must be a valid email address."]));
    assert_eq!(errors["website"], json!(["The website field must be a valid URL."]));
    assert_eq!(errors["latitude"], json!(["The latitude field must not be greater than 90."]));
    assert_eq!(errors["capacity"], json!(["The capacity field must be an integer."]));

    let res = app.post("/api/v1/achievements", 1, achievement("Odd", "cooking", 5)).await?;
    assert_eq!(res.body["errors"]["category"], json!(["The selected category is invalid."]));
    Ok(())
}

#[tokio::test]
async fn numeric_strings_are_normalized() -> Result<()> {
    let app = TestApp::new();
    let created = app
        .create("achievements", 1, json!({"name": "Str", "category": "social", "points": "25", "is_active": "1"}))
        .await?;
    assert_eq!(created["points"], 25);
    assert_eq!(created["is_active"], true);
    Ok(())
}

#[tokio::test]
async fn category_parent_must_exist() -> Result<()> {
    let app = TestApp::new();
    let res = app.post("/api/v1/categories", 1, json!({"name": "Orphan", "parent_id": 42})).await?;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["parent_id"], json!(["The selected parent id is invalid."]));

    app.create("categories", 1, json!({"name": "Root"})).await?;
    let child = app.create("categories", 1, json!({"name": "Leaf", "parent_id": 1})).await?;
    assert_eq!(child["parent"], json!({"id": 1, "name": "Root", "slug": null}));
    Ok(())
}

#[tokio::test]
async fn unique_fields_exclude_the_record_itself() -> Result<()> {
    let app = TestApp::new();
    app.create("categories", 1, json!({"name": "Parks", "slug": "parks"})).await?;

    let res = app.post("/api/v1/categories", 1, json!({"name": "Parks 2", "slug": "parks"})).await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["slug"], json!(["The slug has already been taken."]));

    let res = app.put("/api/v1/categories/1", 1, json!({"slug": "parks", "name": "Parks!"})).await?;
    assert_eq!(res.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn scoped_uniqueness_allows_duplicates_across_scopes() -> Result<()> {
    let app = TestApp::new();
    app.create("countries", 1, json!({"name": "Spain", "code": "ES"})).await?;
    app.create("countries", 1, json!({"name": "Chile", "code": "CL"})).await?;

    app.create("cities", 1, json!({"name": "Valencia", "slug": "valencia", "country_id": 1})).await?;
    app.create("cities", 1, json!({"name": "Valencia", "slug": "valencia", "country_id": 2})).await?;

    let res = app
        .post("/api/v1/cities", 1, json!({"name": "Valencia", "slug": "valencia", "country_id": 1}))
        .await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.body["errors"]["slug"].is_array());
    Ok(())
}

#[tokio::test]
async fn end_must_not_precede_start() -> Result<()> {
    let app = TestApp::new();
    let res = app
        .post(
            "/api/v1/events",
            1,
            json!({"title": "Backwards", "starts_at": "2024-06-02T10:00:00Z", "ends_at": "2024-06-01T10:00:00Z"}),
        )
        .await?;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        res.body["errors"]["ends_at"],
        json!(["The ends at field must be a date after or equal to starts at."])
    );

    // On update the stored start is compared
    app.create("events", 1, json!({"title": "Fine", "starts_at": "2024-06-02T10:00:00Z"})).await?;
    let res = app.patch("/api/v1/events/1", 1, json!({"ends_at": "2024-06-01T00:00:00Z"})).await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn moving_only_the_start_past_the_stored_end_is_rejected() -> Result<()> {
    let app = TestApp::new();
    app.create(
        "events",
        1,
        json!({"title": "Meetup", "starts_at": "2024-06-01T10:00:00Z", "ends_at": "2024-06-02T10:00:00Z"}),
    )
    .await?;

    let res = app.patch("/api/v1/events/1", 1, json!({"starts_at": "2024-06-05T10:00:00Z"})).await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        res.body["errors"]["ends_at"],
        json!(["The ends at field must be a date after or equal to starts at."])
    );

    let res = app.get("/api/v1/events/1", 1).await?;
    assert_eq!(res.body["data"]["starts_at"], "2024-06-01T10:00:00Z");
    assert_eq!(res.body["data"]["duration_minutes"], 1440);
    Ok(())
}

#[tokio::test]
async fn moving_a_record_into_a_taken_scope_is_rejected() -> Result<()> {
    let app = TestApp::new();
    app.create("countries", 1, json!({"name": "Spain", "code": "ES"})).await?;
    app.create("countries", 1, json!({"name": "Chile", "code": "CL"})).await?;
    app.create("cities", 1, json!({"name": "Valencia", "slug": "valencia", "country_id": 1})).await?;
    app.create("cities", 1, json!({"name": "Valencia", "slug": "valencia", "country_id": 2})).await?;

    let res = app.patch("/api/v1/cities/2", 1, json!({"country_id": 1})).await?;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["errors"]["slug"], json!(["The slug has already been taken."]));

    let res = app.get("/api/v1/cities/2", 1).await?;
    assert_eq!(res.body["data"]["country_id"], 2);
    Ok(())
}

#[tokio::test]
async fn timezone_rule() -> Result<()> {
    let app = TestApp::new();
    let ok = app
        .create("countries", 1, json!({"name": "Peru", "code": "PE", "timezone": "America/Lima"}))
        .await?;
    assert_eq!(ok["timezone"], "America/Lima");

    let res = app
        .post("/api/v1/countries", 1, json!({"name": "Nowhere", "code": "NW", "timezone": "Mars/Olympus"}))
        .await?;
    assert_eq!(res.body["errors"]["timezone"], json!(["The timezone field must be a valid timezone."]));
    Ok(())
}
