#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use agora_api::auth::{generate_jwt, Claims};
use agora_api::database::{MemoryStore, Record, Store};
use agora_api::{app, resources, AppState};

/// The full router over a fresh in-memory store
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone() as Arc<dyn Store>, resources::catalog());
        Self { router: app(state), store }
    }

    /// Inserts a row directly, bypassing validation and observers
    pub async fn seed(&self, table: &str, row: Value) -> Result<Record> {
        let record = row.as_object().cloned().unwrap_or_default();
        Ok(self.store.insert(table, record).await?)
    }

    pub async fn request(&self, method: Method, uri: &str, user: Option<i64>, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(id)?));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, user: i64) -> Result<TestResponse> {
        self.request(Method::GET, uri, Some(user), None).await
    }

    pub async fn post(&self, uri: &str, user: i64, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, Some(user), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: i64, body: Value) -> Result<TestResponse> {
        self.request(Method::PUT, uri, Some(user), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, user: i64, body: Value) -> Result<TestResponse> {
        self.request(Method::PATCH, uri, Some(user), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: i64) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, Some(user), None).await
    }

    /// Nested action with no body
    pub async fn action(&self, uri: &str, user: i64) -> Result<TestResponse> {
        self.request(Method::POST, uri, Some(user), None).await
    }

    /// Creates through the API and returns the rendered record
    pub async fn create(&self, resource: &str, user: i64, body: Value) -> Result<Value> {
        let res = self.post(&format!("/api/v1/{}", resource), user, body).await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create {} failed: {} {}", resource, res.status, res.body);
        Ok(res.body["data"].clone())
    }
}

pub fn token(user_id: i64) -> Result<String> {
    Ok(generate_jwt(&Claims::new(user_id))?)
}

pub fn achievement(name: &str, category: &str, points: i64) -> Value {
    json!({ "name": name, "category": category, "points": points })
}

/// `["a", "b"]` from a list response's `data[*].field`
pub fn pluck(body: &Value, field: &str) -> Vec<Value> {
    body["data"]
        .as_array()
        .map(|rows| rows.iter().map(|r| r[field].clone()).collect())
        .unwrap_or_default()
}
