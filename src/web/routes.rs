use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

// API Routes - REST API consumed by the front end
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest(
            "/api",
            Router::new()
                // Schema design from a business description
                .route("/business-model/schema", post(handlers::api::generate_schema))

                // Natural language to SQL, or query optimization
                .route("/translate", post(handlers::api::translate))

                // System status
                .route("/status", get(handlers::api::system_status))
        )
}
