use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Service banner with the available endpoints.
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "service": "course-tutor",
            "endpoints": {
                "query": "POST /query",
                "courses": "GET /courses",
                "health": "GET /health",
                "ready": "GET /ready"
            }
        })),
    )
}
