//! Request builders shared by the HTTP tests. Every call identifies the
//! caller with the `X-User-Id` header, as Keycloak is disabled in tests.
use crate::common::auth::USER_ID_HEADER;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({"error": "Invalid JSON response"}))
    };

    if status.is_server_error() {
        eprintln!("HTTP Error - Status: {status}, Body: {body:?}");
    }

    (status, body)
}

/// Sends one request as `user_id`; `body` is sent as JSON when given
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Uuid,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, user_id.to_string());
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    extract_response_body(response).await
}

/// Creates an incubator for `user_id` and returns the response body
/// (incubator fields plus `trays`)
pub async fn create_test_incubator(
    app: &Router,
    user_id: Uuid,
    trays_amt: i32,
    capacity_per_tray: i32,
) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/incubators",
        user_id,
        Some(json!({
            "model": "Test incubator",
            "trays_amt": trays_amt,
            "capacity_per_tray": capacity_per_tray
        })),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to create test incubator: {body:?}"
    );
    body
}

/// Stores the chicken species (21 days, 37.5-38.0 °C, 45-55 % humidity)
pub async fn upsert_chicken(app: &Router) -> Value {
    let (status, body) = send(
        app,
        "PUT",
        "/api/species/chicken",
        Uuid::new_v4(),
        Some(json!({
            "name": "Chicken",
            "incubation_days": 21,
            "temp_min": 37.5,
            "temp_max": 38.0,
            "humidity_min": 45,
            "humidity_max": 55
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Failed to upsert species: {body:?}");
    body
}

pub fn id_of(body: &Value) -> Uuid {
    Uuid::parse_str(body["id"].as_str().expect("response has no id")).unwrap()
}
