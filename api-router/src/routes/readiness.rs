use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Readiness probe: returns 200 if the course root is reachable, else 503.
/// Also reports how many course indexes are warmed in memory.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    match state.corpus.discover_courses().await {
        Ok(course_ids) => {
            let warmed = state.corpus.registry().len().await;
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "courses_discovered": course_ids.len(),
                    "indexes_warmed": warmed
                })),
            )
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "reason": e.to_string()
            })),
        ),
    }
}
