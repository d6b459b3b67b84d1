use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{create_test_incubator, id_of, send, upsert_chicken};
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_get_and_patch_tray() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let incubator = create_test_incubator(&app, user_id, 2, 10).await;
    let uri = format!("/api/trays/{}", id_of(&incubator["trays"][0]));

    let (status, body) = send(&app, "GET", &uri, user_id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["floor"], 1);

    let (status, body) = send(&app, "PATCH", &uri, user_id, Some(json!({"capacity": 30}))).await;
    assert_eq!(status, StatusCode::OK, "{body:?}");
    assert_eq!(body["capacity"], 30);
    assert_eq!(body["floor"], 1);

    let (status, body) = send(&app, "PATCH", &uri, user_id, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["capacity"], 30);

    let (status, body) = send(&app, "PATCH", &uri, user_id, Some(json!({"floor": 2}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_RESOURCE");

    let (status, body) = send(&app, "PATCH", &uri, user_id, Some(json!({"capacity": -1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_foreign_or_unknown_tray_is_not_found() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    let incubator = create_test_incubator(&app, owner, 1, 10).await;
    let uri = format!("/api/trays/{}", id_of(&incubator["trays"][0]));

    let (status, _) = send(&app, "GET", &uri, Uuid::new_v4(), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, Uuid::new_v4(), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &format!("/api/trays/{}", Uuid::new_v4()), owner, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_tray_is_restricted_by_batches() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    upsert_chicken(&app).await;
    let incubator = create_test_incubator(&app, user_id, 2, 10).await;
    let busy = format!("/api/trays/{}", id_of(&incubator["trays"][0]));
    let empty = format!("/api/trays/{}", id_of(&incubator["trays"][1]));

    let (status, body) = send(
        &app,
        "POST",
        &format!("{busy}/batches"),
        user_id,
        Some(json!({
            "species_id": "chicken",
            "eggs_qty": 10,
            "start_at": "2025-03-01",
            "expected_hatch_at": "2025-03-22"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body:?}");

    let (status, body) = send(&app, "DELETE", &busy, user_id, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "REFERENCE_VIOLATION");

    let (status, _) = send(&app, "DELETE", &empty, user_id, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &empty, user_id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
