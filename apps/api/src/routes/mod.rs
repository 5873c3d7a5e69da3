pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::worksheet::handlers;

async fn not_found(uri: Uri) -> Result<(), AppError> {
    Err(AppError::NotFound(format!("No route for {}", uri.path())))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Worksheet API
        .route("/process", post(handlers::handle_process))
        .route("/process/pdf", post(handlers::handle_process_pdf))
        .fallback(not_found)
        .with_state(state)
}
