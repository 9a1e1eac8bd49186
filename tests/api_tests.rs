mod common;
use common::{row, seed_users, setup_test_db, test_state};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use checkin_station::api;
use checkin_station::core::engine;
use checkin_station::models::checkin::Source;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_kiosk_checkin_success_envelope() {
    let db_path = setup_test_db("api_kiosk_success");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/checkin")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("badge_id=E100"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["name"], "Ada Lovelace");
    assert_eq!(v["table_number"], 5);
    assert!(v["time"].is_string());
}

#[tokio::test]
async fn test_kiosk_unknown_badge_is_uniform_200() {
    let db_path = setup_test_db("api_kiosk_unknown");
    let state = test_state(&db_path);

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/checkin")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("badge_id=nope"))
                .unwrap(),
        )
        .await
        .unwrap();

    // The kiosk screen branches on the envelope, not on status codes
    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["success"], false);
    assert!(
        v["message"]
            .as_str()
            .unwrap()
            .contains("not recognized")
    );
}

#[tokio::test]
async fn test_kiosk_blank_badge_is_rejected_in_envelope() {
    let db_path = setup_test_db("api_kiosk_blank");
    let state = test_state(&db_path);

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/checkin")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("badge_id=%20%20"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["success"], false);
}

#[tokio::test]
async fn test_admin_manual_checkin_uses_status_codes() {
    let db_path = setup_test_db("api_admin_checkin");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;

    let response = api::router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/checkin/E100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["success"], true);

    // Unknown badge is a 404 on the admin surface
    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/checkin/E999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_checkout_roundtrip() {
    let db_path = setup_test_db("api_admin_checkout");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;
    engine::check_in(&state, "E100", Source::Kiosk).await.unwrap();

    let response = api::router(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/checkout/E100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .uri("/admin/users?search=E100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let v = body_json(response).await;
    assert_eq!(v[0]["is_checked_in"], false);
    assert!(v[0]["last_checkin"].is_string());
}

#[tokio::test]
async fn test_admin_history_search() {
    let db_path = setup_test_db("api_history_search");
    let state = test_state(&db_path);
    seed_users(
        &state,
        &[
            row("Ada", "Lovelace", "E100", 5),
            row("Grace", "Hopper", "E101", 3),
        ],
    )
    .await;
    engine::check_in(&state, "E100", Source::Kiosk).await.unwrap();
    engine::check_in(&state, "E101", Source::Kiosk).await.unwrap();

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .uri("/admin/history?search=ada")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let v = body_json(response).await;
    let entries = v.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["employee_id"], "E100");
    assert_eq!(entries[0]["source"], "kiosk");
}

#[tokio::test]
async fn test_admin_tables_endpoint() {
    let db_path = setup_test_db("api_tables");
    let state = test_state(&db_path);
    seed_users(
        &state,
        &[
            row("Ada", "Lovelace", "E100", 5),
            row("Grace", "Hopper", "E101", 5),
        ],
    )
    .await;

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .uri("/admin/tables")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let v = body_json(response).await;
    assert_eq!(v[0]["table_number"], 5);
    assert_eq!(v[0]["user_count"], 2);
}

#[tokio::test]
async fn test_admin_create_user() {
    let db_path = setup_test_db("api_create_user");
    let state = test_state(&db_path);

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"first_name":"Ada","last_name":"Lovelace","employee_id":"E100","table_number":5}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["user"]["employee_id"], "E100");
    assert_eq!(v["user"]["is_checked_in"], false);
}

#[tokio::test]
async fn test_bulk_delete_gated_by_phrase() {
    let db_path = setup_test_db("api_bulk_delete");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;

    let response = api::router(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"confirm":"delete everything"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"confirm":"DELETE ALL USERS"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["deleted"], 1);
}

#[tokio::test]
async fn test_clear_history_endpoint() {
    let db_path = setup_test_db("api_clear_history");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;
    engine::check_in(&state, "E100", Source::Kiosk).await.unwrap();

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/clear-history")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"confirm":"CLEAR HISTORY"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["deleted"], 1);
}

#[tokio::test]
async fn test_import_multipart_roster() {
    let db_path = setup_test_db("api_import");
    let state = test_state(&db_path);

    let boundary = "roster-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"roster.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         first_name,last_name,employee_id,table_number\r\n\
         Ada,Lovelace,E100,5\r\n\
         Grace,Hopper,,3\r\n\
         --{boundary}--\r\n"
    );

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/import")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let v = body_json(response).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["imported"], 1);
    assert_eq!(v["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_rejects_non_csv_files() {
    let db_path = setup_test_db("api_import_bad_ext");
    let state = test_state(&db_path);

    let boundary = "roster-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"roster.pdf\"\r\n\r\n\
         not a roster\r\n\
         --{boundary}--\r\n"
    );

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/import")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_roster_csv_download() {
    let db_path = setup_test_db("api_export_csv");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .uri("/admin/export?kind=roster&format=csv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(content_type, "text/csv");
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(disposition.contains("roster.csv"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("First Name,Last Name,Employee ID,Table Number"));
    assert!(text.contains("Ada,Lovelace,E100,5"));
}

#[tokio::test]
async fn test_export_defaults_to_history_xlsx() {
    let db_path = setup_test_db("api_export_default");
    let state = test_state(&db_path);
    seed_users(&state, &[row("Ada", "Lovelace", "E100", 5)]).await;
    engine::check_in(&state, "E100", Source::Kiosk).await.unwrap();

    let response = api::router(state)
        .oneshot(
            Request::builder()
                .uri("/admin/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(disposition.contains("checkin_history.xlsx"));

    // XLSX payloads are zip archives
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
