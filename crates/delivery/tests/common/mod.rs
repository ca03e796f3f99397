//! In-process HTTP endpoints for exercising the reqwest clients.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Everything the fake endpoints received.
#[derive(Clone, Default)]
pub struct Captured {
    pub json_bodies: Arc<Mutex<Vec<Value>>>,
    pub form_fields: Arc<Mutex<Vec<(String, String)>>>,
    pub accept_headers: Arc<Mutex<Vec<String>>>,
}

impl Captured {
    pub fn json_bodies(&self) -> Vec<Value> {
        self.json_bodies.lock().unwrap().clone()
    }

    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.form_fields.lock().unwrap().clone()
    }

    pub fn accept_headers(&self) -> Vec<String> {
        self.accept_headers.lock().unwrap().clone()
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Form relay fake:
///
/// - `POST /json`: records the JSON body, answers `{"ok": true}`.
/// - `POST /empty`: records the JSON body, answers 200 with no body.
/// - `POST /multipart`: records every text field.
/// - `POST /fail`: answers 500.
pub fn relay_router(captured: Captured) -> Router {
    Router::new()
        .route("/json", post(accept_json))
        .route("/empty", post(accept_json_empty))
        .route("/multipart", post(accept_multipart))
        .route("/fail", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .with_state(captured)
}

/// Token service fake:
///
/// - `POST /token`: answers `{"token": "tok-<siteKey>-<action>"}`.
/// - `POST /blank`: answers `{"token": ""}`.
/// - `POST /down`: answers 503.
pub fn token_router() -> Router {
    Router::new()
        .route("/token", post(issue_token))
        .route("/blank", post(|| async { Json(json!({ "token": "" })) }))
        .route("/down", post(|| async { StatusCode::SERVICE_UNAVAILABLE }))
}

fn record_accept(captured: &Captured, headers: &HeaderMap) {
    if let Some(accept) = headers.get("accept").and_then(|v| v.to_str().ok()) {
        captured.accept_headers.lock().unwrap().push(accept.to_string());
    }
}

async fn accept_json(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record_accept(&captured, &headers);
    captured.json_bodies.lock().unwrap().push(body);
    Json(json!({ "ok": true }))
}

async fn accept_json_empty(
    State(captured): State<Captured>,
    Json(body): Json<Value>,
) -> StatusCode {
    captured.json_bodies.lock().unwrap().push(body);
    StatusCode::OK
}

async fn accept_multipart(
    State(captured): State<Captured>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    record_accept(&captured, &headers);
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap();
        captured.form_fields.lock().unwrap().push((name, value));
    }
    Json(json!({ "ok": true }))
}

async fn issue_token(Json(body): Json<Value>) -> Json<Value> {
    let site_key = body["siteKey"].as_str().unwrap_or_default();
    let action = body["action"].as_str().unwrap_or_default();
    Json(json!({ "token": format!("tok-{site_key}-{action}") }))
}
