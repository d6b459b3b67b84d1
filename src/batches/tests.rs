use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{create_test_incubator, id_of, send, upsert_chicken};
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

fn chicken_batch(eggs_qty: i32) -> Value {
    json!({
        "species_id": "chicken",
        "eggs_qty": eggs_qty,
        "start_at": "2025-03-01",
        "expected_hatch_at": "2025-03-22",
        "notes": "from the neighbour's flock"
    })
}

#[tokio::test]
async fn test_chicken_scenario_end_to_end() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();

    let species = upsert_chicken(&app).await;
    assert_eq!(species["id"], "chicken");
    assert_eq!(species["incubation_days"], 21);

    let incubator = create_test_incubator(&app, user_id, 3, 24).await;
    let tray_id = id_of(&incubator["trays"][0]);
    let batches_uri = format!("/api/trays/{tray_id}/batches");

    let (status, batch) = send(&app, "POST", &batches_uri, user_id, Some(chicken_batch(24))).await;
    assert_eq!(status, StatusCode::CREATED, "{batch:?}");
    assert_eq!(batch["status"], "incubating");
    assert_eq!(batch["tray_id"], tray_id.to_string());
    assert_eq!(batch["expected_hatch_at"], "2025-03-22");
    let batch_uri = format!("/api/batches/{}", id_of(&batch));

    let (status, listed) = send(&app, "GET", &batches_uri, user_id, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("{batch_uri}/status"),
        user_id,
        Some(json!({"status": "hatched"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated:?}");
    assert_eq!(updated["status"], "hatched");

    let (_, fetched) = send(&app, "GET", &batch_uri, user_id, None).await;
    assert_eq!(fetched["status"], "hatched");
    assert_eq!(fetched["notes"], "from the neighbour's flock");

    let (status, _) = send(&app, "DELETE", &batch_uri, user_id, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &batch_uri, user_id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_of_unknown_batch_is_not_found() {
    let app = setup_test_app().await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/batches/{}/status", Uuid::new_v4()),
        Uuid::new_v4(),
        Some(json!({"status": "failed"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_status_value_is_rejected() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    upsert_chicken(&app).await;
    let incubator = create_test_incubator(&app, user_id, 1, 24).await;
    let (_, batch) = send(
        &app,
        "POST",
        &format!("/api/trays/{}/batches", id_of(&incubator["trays"][0])),
        user_id,
        Some(chicken_batch(12)),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/batches/{}/status", id_of(&batch)),
        user_id,
        Some(json!({"status": "sold"})),
    )
    .await;
    assert!(status.is_client_error());

    let (_, fetched) = send(&app, "GET", &format!("/api/batches/{}", id_of(&batch)), user_id, None).await;
    assert_eq!(fetched["status"], "incubating");
}

#[tokio::test]
async fn test_batch_of_another_user_is_hidden() {
    let app = setup_test_app().await;
    let owner = Uuid::new_v4();
    upsert_chicken(&app).await;
    let incubator = create_test_incubator(&app, owner, 1, 24).await;
    let (_, batch) = send(
        &app,
        "POST",
        &format!("/api/trays/{}/batches", id_of(&incubator["trays"][0])),
        owner,
        Some(chicken_batch(12)),
    )
    .await;
    let batch_uri = format!("/api/batches/{}", id_of(&batch));

    let stranger = Uuid::new_v4();
    let (status, _) = send(&app, "GET", &batch_uri, stranger, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        "PUT",
        &format!("{batch_uri}/status"),
        stranger,
        Some(json!({"status": "archived"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_batch_validation_and_unknown_species() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    upsert_chicken(&app).await;
    let incubator = create_test_incubator(&app, user_id, 1, 24).await;
    let uri = format!("/api/trays/{}/batches", id_of(&incubator["trays"][0]));

    let (status, body) = send(&app, "POST", &uri, user_id, Some(chicken_batch(0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let mut emu = chicken_batch(4);
    emu["species_id"] = json!("emu");
    let (status, body) = send(&app, "POST", &uri, user_id, Some(emu)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "REFERENCE_VIOLATION");
}
