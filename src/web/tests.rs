//! Router tests against a stubbed licensing API

use super::server::build_router;
use super::state::AppState;
use crate::licensing::client::tests::{one_processed_athlete, StubApi};
use crate::licensing::LicenseClient;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with_logo(logo_path: PathBuf) -> (Router, Arc<AtomicUsize>) {
    let (api, calls) = StubApi::new(one_processed_athlete);
    let client = Arc::new(LicenseClient::new(Box::new(api)));
    (build_router(AppState::new(client, logo_path)), calls)
}

fn app() -> (Router, Arc<AtomicUsize>) {
    app_with_logo(PathBuf::from("/nonexistent/fcoc-logo.png"))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_index_without_document_shows_form_only() {
    let (app, calls) = app();
    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Consulta llicencia FCOC"));
    assert!(body.contains("Entra DNI/NIE: "));
    assert!(!body.contains("Num. llicències trobades"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_index_blank_document_makes_no_call() {
    let (app, calls) = app();
    let (status, body) = get(app, "/?tipus=PASSAPORT&document=+++").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Entra PASSAPORT: "));
    assert!(!body.contains("Num. llicències trobades"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_index_renders_processed_athlete() {
    let (app, calls) = app();
    let (status, body) = get(app, "/?tipus=DNI%2FNIE&document=12345678Z").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p>Num. llicències trobades: 1</p>"));
    assert!(body.contains("<p>Codi: OR-0001</p>"));
    assert!(body.contains("<p>Esportista: Garcia Vila, Marta</p>"));
    assert!(body.contains("<p>Club: Orientació Vallès</p>"));
    assert!(body.contains("<p>Tipus: 2025 | Competició | Sènior</p>"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_repeated_lookups_hit_cache() {
    let (app, calls) = app();
    for _ in 0..3 {
        let (status, _) = get(app.clone(), "/?tipus=DNI%2FNIE&document=12345678Z").await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_api_licenses_json() {
    let (app, _) = app();
    let (status, body) = get(app, "/api/licenses?tipus=DNI%2FNIE&document=12345678Z").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["queried"], true);
    assert_eq!(json["found"], 1);
    assert_eq!(json["licenses"][0]["code"], "OR-0001");
    assert_eq!(json["licenses"][0]["modality_id"], 1);
    assert_eq!(json["blocks"][0]["kind"], "detail");
}

#[tokio::test]
async fn test_api_licenses_blank_document() {
    let (app, calls) = app();
    let (status, body) = get(app, "/api/licenses?tipus=CATSALUT").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["queried"], false);
    assert_eq!(json["found"], 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_api_licenses_unknown_selector() {
    let (app, calls) = app();
    let (status, body) = get(app, "/api/licenses?tipus=CARNET&document=12345678Z").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["queried"], true);
    assert_eq!(json["found"], 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_logo_is_404() {
    let (app, _) = app();
    let (status, _) = get(app, "/logo.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logo_is_served() {
    let path = std::env::temp_dir().join(format!("fcoc-logo-{}.png", std::process::id()));
    std::fs::write(&path, b"\x89PNG fake").unwrap();

    let (app, _) = app_with_logo(path.clone());
    let response = app
        .oneshot(Request::builder().uri("/logo.png").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"\x89PNG fake");
}
