//! HTTP request handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use super::models::{EndpointStatus, StatusResponse};
use crate::proxy::store::SnapshotStore;

const XML_CONTENT_TYPE: &str = "application/xml";

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    store: SnapshotStore,
    endpoints: Arc<[String]>,
}

impl AppState {
    pub fn new(store: SnapshotStore, endpoints: &[String]) -> Self {
        Self {
            store,
            endpoints: endpoints.into(),
        }
    }
}

/// Cached device reply for one endpoint path
///
/// Nothing cached yet answers 503 with an empty body; scraper errors are
/// never surfaced here, stale data keeps being served instead.
pub async fn cached(state: AppState, endpoint: String) -> Response {
    match state.store.get(&endpoint) {
        Some(body) => ([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
            Bytes::new(),
        )
            .into_response(),
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let links: String = state
        .endpoints
        .iter()
        .map(|e| format!("      <li><a href=\"{0}\">{0}</a></li>\n", e))
        .collect();

    Html(format!(
        r#"<!doctype html>
<html>
  <head>
    <title>Modem Proxy</title>
  </head>
  <body>
    <p>Cached modem endpoints:</p>
    <ul>
{}    </ul>
  </body>
</html>
"#,
        links
    ))
}

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "modem-proxy"
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let endpoints: Vec<EndpointStatus> = state
        .endpoints
        .iter()
        .map(|endpoint| match state.store.snapshot(endpoint) {
            Some(snapshot) => EndpointStatus {
                endpoint: endpoint.clone(),
                cached: true,
                bytes: snapshot.body.len(),
                updated_at: snapshot.updated_at.format(&Rfc3339).ok(),
            },
            None => EndpointStatus {
                endpoint: endpoint.clone(),
                cached: false,
                bytes: 0,
                updated_at: None,
            },
        })
        .collect();

    Json(StatusResponse {
        cached: endpoints.iter().filter(|e| e.cached).count(),
        endpoints,
    })
}
