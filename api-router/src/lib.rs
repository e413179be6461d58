use api_state::ApiState;
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use routes::{
    courses::list_courses, index::root, liveness::health, query::query, readiness::ready,
};

pub mod api_state;
pub mod error;
mod routes;

/// Router for the question-answering API.
pub fn api_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/courses", get(list_courses))
        .route("/query", post(query))
}
