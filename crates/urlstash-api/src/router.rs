//! Router construction and server host for the API.

use std::io;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::handlers::{cancel, health, submit};
use crate::state::ApiState;

/// Axum router wrapper that hosts the download endpoints.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Wire the routes onto shared state.
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        let router = Router::new()
            .route("/api/v1/downloads", post(submit))
            .route("/api/v1/downloads/cancel", post(cancel))
            .route("/healthz", get(health))
            .layer(TraceLayer::new_for_http())
            .with_state(state);
        Self { router }
    }

    /// The bare router, for embedding in tests.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve requests on `listener` until the process stops.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if serving fails.
    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        axum::serve(listener, self.router).await
    }
}
