//! HTTP surface of the proxy.

use crate::client::{FileFetcher, FALLBACK_CONTENT_TYPE};
use crate::error::ProxyError;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chronicle_common::Result as ChronicleResult;
use chronicle_config::ConfigCache;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the proxy handlers.
#[derive(Clone)]
pub struct ProxyState {
    /// Live configuration; limits are read per request.
    pub config: Arc<ConfigCache>,
    /// Upstream client.
    pub fetcher: FileFetcher,
}

impl ProxyState {
    /// State over `config` with a fresh upstream client.
    pub fn new(config: Arc<ConfigCache>) -> ChronicleResult<Self> {
        Ok(Self {
            config,
            fetcher: FileFetcher::new()?,
        })
    }
}

/// Routes: `GET /api/files/:id` and `GET /health`.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/files/:id", get(fetch_file))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn fetch_file(State(state): State<ProxyState>, Path(id): Path<String>) -> Result<Response, ProxyError> {
    let config = state.config.get();
    let file = state.fetcher.fetch(&config.proxy, &id).await?;

    info!(id = %id, bytes = file.body.len(), "Served file");
    let content_type = file
        .content_type
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
    Ok(([(header::CONTENT_TYPE, content_type)], file.body).into_response())
}
