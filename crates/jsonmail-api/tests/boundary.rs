//! # Boundary Integration Tests
//!
//! Drives a test-only Axum router through `oneshot` to check what a client
//! sees: malformed bodies, failed validation rules, and missing resources
//! all arrive as JSON:API error documents with the right status.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::{header, Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceExt;

use jsonmail_api::extractors::{extract_validated_json, Validate, MALFORMED_BODY_CODE};
use jsonmail_api::AppError;
use jsonmail_core::{ErrorObject, ErrorObjectList, ResourceNotFoundError};

#[derive(Debug, Deserialize, Serialize)]
struct NewAccount {
    name: String,
    inbox_port: u32,
}

impl Validate for NewAccount {
    fn validate(&self) -> ErrorObjectList {
        let mut errors = ErrorObjectList::new();
        if self.name.trim().is_empty() {
            errors.push(
                ErrorObject::new("REQUIRED", "Name is required")
                    .with_source("/data/attributes/name"),
            );
        }
        if self.inbox_port == 0 || self.inbox_port > 65_535 {
            errors.push(
                ErrorObject::new("OUT_OF_RANGE", "Port out of range")
                    .with_detail(format!("{} is not a valid port", self.inbox_port))
                    .with_source("/data/attributes/inbox_port"),
            );
        }
        errors
    }
}

async fn create_account(
    body: Result<Json<NewAccount>, JsonRejection>,
) -> Result<Json<NewAccount>, AppError> {
    let account = extract_validated_json(body)?;
    Ok(Json(account))
}

async fn get_account(Path(id): Path<String>) -> Result<Json<Value>, AppError> {
    if id == "dev" {
        return Ok(Json(json!({"id": "dev"})));
    }
    Err(ResourceNotFoundError::new(format!("mail account {id}")).into())
}

fn test_app() -> Router {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account))
}

/// Helper: send a request and return status, content type and JSON body.
async fn send(request: Request<Body>) -> (StatusCode, String, Value) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, content_type, body)
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/accounts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn valid_account_is_echoed() {
    let (status, _, body) = send(post_json(r#"{"name":"dev","inbox_port":993}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "dev", "inbox_port": 993}));
}

#[tokio::test]
async fn failed_rules_render_as_errors_array() {
    let (status, content_type, body) = send(post_json(r#"{"name":" ","inbox_port":0}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/vnd.api+json");
    assert_eq!(
        body,
        json!({
            "errors": [
                {
                    "code": "REQUIRED",
                    "title": "Name is required",
                    "source": "/data/attributes/name",
                },
                {
                    "code": "OUT_OF_RANGE",
                    "title": "Port out of range",
                    "detail": "0 is not a valid port",
                    "source": "/data/attributes/inbox_port",
                },
            ]
        })
    );
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (status, _, body) = send(post_json(r#"{"name": "dev""#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["code"], MALFORMED_BODY_CODE);
    assert!(errors[0]["detail"].is_string());
    assert!(errors[0].get("source").is_none());
}

#[tokio::test]
async fn missing_account_is_not_found() {
    let request = Request::builder()
        .uri("/accounts/42")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"errors": [{"code": "NOT_FOUND", "title": "Not Found", "detail": "mail account 42"}]})
    );
}

#[tokio::test]
async fn existing_account_is_found() {
    let request = Request::builder()
        .uri("/accounts/dev")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "dev");
}
