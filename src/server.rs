//! HTTP server assembly: shared state, middleware stack, and serve loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::routes;
use crate::services::{SearchProvider, TextGenerator};

/// Application state shared across handlers. Built once at startup;
/// nothing in it is mutated afterwards.
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    /// Absent when no search key was configured; dependent endpoints fail
    /// on first use instead of at startup.
    pub search: Option<Arc<dyn SearchProvider>>,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        search: Option<Arc<dyn SearchProvider>>,
    ) -> Self {
        Self { generator, search }
    }

    /// Search provider, or a config error for endpoints that need one.
    pub fn search(&self) -> Result<&dyn SearchProvider, ApiError> {
        self.search.as_deref().ok_or_else(|| {
            ApiError::Config("SERPAPI_KEY is not set in environment variables".to_string())
        })
    }
}

/// Build the full application router with middleware applied.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .with_state(state)
        // The frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
}

/// Bind and serve until the process is stopped.
pub async fn run(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
