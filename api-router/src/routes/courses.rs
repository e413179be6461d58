use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Serialize, Debug)]
pub struct CourseSummary {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub chapters: Vec<String>,
}

/// Lists every course found under the course root, with metadata where the
/// course directory carries a metadata file.
pub async fn list_courses(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let course_ids = state.corpus.discover_courses().await?;

    let mut courses = Vec::with_capacity(course_ids.len());
    for course_id in course_ids {
        let metadata = state.corpus.metadata(&course_id).await?;
        let (title, description, chapters) = match metadata {
            Some(m) => (Some(m.title), Some(m.description), m.chapters),
            None => (None, None, Vec::new()),
        };
        courses.push(CourseSummary {
            id: course_id,
            title,
            description,
            chapters,
        });
    }

    Ok(Json(courses))
}
