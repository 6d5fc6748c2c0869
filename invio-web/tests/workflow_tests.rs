//! End-to-end workflow tests
//!
//! Drive upload → review → confirm through the real router against stub
//! extraction/ingestion/cleanup servers bound on ephemeral local ports.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use invio_common::config::ServiceConfig;
use invio_web::models::{KEY_EDITED_FIELDS, KEY_EXTRACTION_RESPONSE, KEY_UPLOADED_FILE};
use invio_web::storage::RecordStore;
use invio_web::{build_router, AppState};

/// Stub webhook answering every POST with a fixed status and body.
fn fixed_stub(status: StatusCode, reply: Value) -> Router {
    Router::new().route(
        "/",
        post(move || {
            let reply = reply.clone();
            async move { (status, Json(reply)) }
        }),
    )
}

/// Stub webhook that records every POSTed JSON body.
fn capture_stub(captured: Arc<Mutex<Vec<Value>>>, status: StatusCode) -> Router {
    Router::new().route(
        "/",
        post(move |Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                captured.lock().unwrap().push(body);
                (status, Json(serde_json::json!({ "status": "ok" })))
            }
        }),
    )
}

async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn test_state(
    dir: &tempfile::TempDir,
    extraction_url: String,
    ingestion_url: String,
    cleanup_url: String,
) -> AppState {
    let config = ServiceConfig {
        root_folder: dir.path().to_path_buf(),
        port: 0,
        extraction_url,
        ingestion_url,
        cleanup_url,
        max_upload_bytes: 10 * 1024 * 1024,
    };
    AppState::new(config, RecordStore::open(dir.path())).unwrap()
}

fn upload_request() -> Request<Body> {
    let boundary = "invio-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"acme-invoice.pdf\"\r\n\
          Content-Type: application/pdf\r\n\r\n",
    );
    body.extend_from_slice(b"%PDF-1.4 fake invoice content");
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn extraction_reply() -> Value {
    serde_json::json!([{
        "invoiceNumber": "INV-2024-001",
        "invoiceDate": "2024-10-17",
        "vendorName": "Acme Corp",
        "vendorAddress": "123 Business St, City, State 12345",
        "totalAmount": "1250.00",
        "taxAmount": "125.00",
        "description": "Professional services rendered",
        "resumeUrl": "https://hooks.example/resume/abc"
    }])
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_flow_submits_persists_and_clears() {
    let extraction = spawn_stub(fixed_stub(StatusCode::OK, extraction_reply())).await;
    let submissions = Arc::new(Mutex::new(Vec::new()));
    let ingestion = spawn_stub(capture_stub(submissions.clone(), StatusCode::OK)).await;
    let cleanup = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, extraction, ingestion, cleanup);
    let app = build_router(state.clone());

    // Upload: transient scope ends up with exactly file + raw response.
    let response = app.clone().oneshot(upload_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let upload = body_json(response).await;
    assert_eq!(upload["stage"], "UPLOADED");
    assert_eq!(upload["fieldsExtracted"], true);
    assert_eq!(upload["next"], "/upload-invoice/review");

    assert_eq!(state.transient.len().await, 2);
    assert!(state.transient.contains(KEY_UPLOADED_FILE).await);
    assert!(state.transient.contains(KEY_EXTRACTION_RESPONSE).await);

    // Review: extracted values are editable, tracking key is filtered.
    let response = app.clone().oneshot(get("/api/session/review")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let review = body_json(response).await;
    assert_eq!(review["file"]["name"], "acme-invoice.pdf");
    let fields = review["fields"].as_array().unwrap();
    assert!(fields
        .iter()
        .any(|f| f["key"] == "invoiceNumber" && f["value"] == "INV-2024-001"));
    assert!(fields
        .iter()
        .any(|f| f["key"] == "invoiceNumber" && f["label"] == "Invoice Number"));
    assert!(fields.iter().all(|f| f["key"] != "resumeUrl"));

    // Two sequential edits both survive (non-destructive updates).
    let response = app
        .clone()
        .oneshot(json_post("/api/session/review", r#"{"vendorName":"A"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .clone()
        .oneshot(json_post("/api/session/review", r#"{"totalAmount":"10"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/session/confirm")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let confirm = body_json(response).await;
    let fields = confirm["fields"].as_array().unwrap();
    assert!(fields
        .iter()
        .any(|f| f["key"] == "vendorName" && f["value"] == "A"));
    assert!(fields
        .iter()
        .any(|f| f["key"] == "totalAmount" && f["value"] == "10"));
    assert!(fields
        .iter()
        .any(|f| f["key"] == "invoiceNumber" && f["value"] == "INV-2024-001"));

    // Submit: ingestion gets the array-of-one payload with tracking key,
    // exactly one record is persisted, transient scope is empty.
    let response = app
        .clone()
        .oneshot(empty_post("/api/session/submit"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let submit = body_json(response).await;
    assert_eq!(submit["next"], "/search-invoice");

    let sent = submissions.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    let payload = sent[0].as_array().unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0]["vendorName"], "A");
    assert_eq!(payload[0]["totalAmount"], "10");
    assert_eq!(payload[0]["resumeUrl"], "https://hooks.example/resume/abc");
    assert_eq!(payload[0]["fileName"], "acme-invoice.pdf");

    assert!(state.transient.is_empty().await);
    let records = state.records.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields.vendor_name, "A");
    assert_eq!(records[0].id, submit["id"].as_str().unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_file_type_sentinel_writes_nothing() {
    let extraction = spawn_stub(fixed_stub(
        StatusCode::OK,
        serde_json::json!({ "code": 199 }),
    ))
    .await;
    let ingestion = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;
    let cleanup = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, extraction, ingestion, cleanup);
    let app = build_router(state.clone());

    let response = app.clone().oneshot(upload_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_FILE_TYPE");

    // No partial transient state, no saved records.
    assert!(state.transient.is_empty().await);
    assert!(state.records.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn extraction_server_error_writes_nothing() {
    let extraction = spawn_stub(fixed_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "message": "boom" }),
    ))
    .await;
    let ingestion = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;
    let cleanup = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, extraction, ingestion, cleanup);
    let app = build_router(state.clone());

    let response = app.clone().oneshot(upload_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");

    assert!(state.transient.is_empty().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn ingestion_failure_keeps_the_attempt_for_retry() {
    let extraction = spawn_stub(fixed_stub(StatusCode::OK, extraction_reply())).await;
    let ingestion = spawn_stub(fixed_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "message": "ingest down" }),
    ))
    .await;
    let cleanup = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, extraction, ingestion, cleanup);
    let app = build_router(state.clone());

    let response = app.clone().oneshot(upload_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .clone()
        .oneshot(json_post("/api/session/review", r#"{"vendorName":"A"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_post("/api/session/submit"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // The attempt survives for a manual retry; nothing was persisted.
    assert!(state.transient.contains(KEY_UPLOADED_FILE).await);
    assert!(state.transient.contains(KEY_EDITED_FIELDS).await);
    assert!(state.records.list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_attempt_notifies_cleanup_and_leaves_no_record() {
    let extraction = spawn_stub(fixed_stub(StatusCode::OK, extraction_reply())).await;
    let ingestion = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;
    let cancellations = Arc::new(Mutex::new(Vec::new()));
    let cleanup = spawn_stub(capture_stub(cancellations.clone(), StatusCode::OK)).await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, extraction, ingestion, cleanup);
    let app = build_router(state.clone());

    let response = app.clone().oneshot(upload_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_post("/api/session/cancel"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["next"], "/upload-invoice");

    // Transient scope is gone and the durable list is untouched.
    assert!(state.transient.is_empty().await);
    assert!(state.records.list().await.unwrap().is_empty());

    // The cleanup notice is fire-and-forget; give it a moment to land.
    let mut notified = Vec::new();
    for _ in 0..20 {
        notified = cancellations.lock().unwrap().clone();
        if !notified.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0]["resumeUrl"], "https://hooks.example/resume/abc");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_matches_case_insensitive_substrings() {
    let extraction = spawn_stub(fixed_stub(StatusCode::OK, extraction_reply())).await;
    let ingestion = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;
    let cleanup = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, extraction, ingestion, cleanup);
    let app = build_router(state.clone());

    // Drive one full flow so a "Acme Corp" record exists.
    app.clone().oneshot(upload_request()).await.unwrap();
    app.clone()
        .oneshot(json_post("/api/session/review", "{}"))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(empty_post("/api/session/submit"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for (query, expected) in [("acme", 1), ("ACME%20CO", 1), ("acmex", 0), ("", 1)] {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/invoices?q={}", query)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json.as_array().unwrap().len(),
            expected,
            "query {:?} should match {} records",
            query,
            expected
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn inspect_update_and_download_round_trip() {
    let extraction = spawn_stub(fixed_stub(StatusCode::OK, extraction_reply())).await;
    let ingestion = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;
    let cleanup = spawn_stub(fixed_stub(StatusCode::OK, serde_json::json!({}))).await;

    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&dir, extraction, ingestion, cleanup);
    let app = build_router(state.clone());

    app.clone().oneshot(upload_request()).await.unwrap();
    app.clone()
        .oneshot(json_post("/api/session/review", "{}"))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(empty_post("/api/session/submit"))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    // Inspect
    let response = app
        .clone()
        .oneshot(get(&format!("/api/invoices/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["fileName"], "acme-invoice.pdf");

    // Update one field; the others keep their values.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/invoices/{}", id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"description":"Updated note"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = state.records.find(&id).await.unwrap().unwrap();
    assert_eq!(updated.fields.description, "Updated note");
    assert_eq!(updated.fields.vendor_name, "Acme Corp");

    // Download serves the fixed projection as an attachment.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/invoices/{}/download", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"INV-2024-001"));
    let projection = body_json(response).await;
    assert_eq!(projection["invoiceNumber"], "INV-2024-001");
    assert_eq!(projection["description"], "Updated note");
    // The projection is fixed: no tracking keys, no id.
    assert!(projection.get("resumeUrl").is_none());
    assert!(projection.get("id").is_none());
}
