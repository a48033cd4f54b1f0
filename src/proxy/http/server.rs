//! HTTP server setup and management

use axum::{
    extract::State,
    routing::get,
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use super::handlers::{self, AppState};
use crate::proxy::store::SnapshotStore;

pub const INDEX_PATH: &str = "/html/index.html";

/// Routes: one per endpoint path, plus index, `/status` and `/health`
pub fn router(store: SnapshotStore, endpoints: &[String]) -> Router {
    let mut app = Router::new()
        .route(INDEX_PATH, get(handlers::index))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health));

    for endpoint in endpoints {
        let key = endpoint.clone();
        app = app.route(
            endpoint,
            get(move |State(state): State<AppState>| handlers::cached(state, key.clone())),
        );
    }

    app.with_state(AppState::new(store, endpoints))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve until `shutdown` is cancelled
pub async fn start(
    addr: &str,
    store: SnapshotStore,
    endpoints: &[String],
    shutdown: CancellationToken,
) -> crate::Result<()> {
    let app = router(store, endpoints);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "HTTP server listening on http://{}{}",
        listener.local_addr()?,
        INDEX_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
