pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::records::handlers;
use crate::state::AppState;
use crate::stats::handlers::handle_get_stats;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Records
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list)
                .post(handlers::handle_submit)
                .delete(handlers::handle_delete_by_key),
        )
        .route("/api/v1/resumes/import", post(handlers::handle_import))
        .route("/api/v1/resumes/export", post(handlers::handle_export))
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get)
                .put(handlers::handle_replace)
                .delete(handlers::handle_delete),
        )
        // Statistics
        .route("/api/v1/stats", get(handle_get_stats))
        .with_state(state)
}
