pub mod error;
mod questions;

pub use error::ApiError;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::database::QuestionStore;

/// Builds the HTTP surface over `store`. Question routes live under
/// `/api/questions`; `/health` answers plain `ok`.
pub fn create_app<S: QuestionStore>(store: Arc<S>) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new().nest("/questions", questions::create_router::<S>()),
        )
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .with_state(store)
}
