use axum::{extract::State, response::IntoResponse, Json};
use retrieval_pipeline::get_answer_with_sources;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Deserialize, Debug)]
pub struct QueryRequest {
    pub query: String,
    pub course_id: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Answers a student question against one course's materials.
///
/// The course defaults to the configured course when the request omits one.
pub async fn query(
    State(state): State<ApiState>,
    Json(payload): Json<QueryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.query.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "query must not be empty".to_string(),
        ));
    }

    let course_id = payload
        .course_id
        .as_deref()
        .unwrap_or(&state.config.default_course_id);

    info!(course_id, "processing query");

    let answer = get_answer_with_sources(
        &state.corpus,
        &state.llm,
        course_id,
        &payload.query,
        state.config.retrieval_top_k,
    )
    .await?;

    Ok(Json(QueryResponse {
        answer: answer.content,
        sources: answer.sources,
    }))
}
