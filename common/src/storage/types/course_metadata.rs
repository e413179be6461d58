use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Course descriptor kept in the reserved metadata file of each course
/// directory. The metadata file is never chunked or indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseMetadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<String>,
}

impl CourseMetadata {
    /// Reads the metadata file inside `course_dir`, if one exists.
    pub async fn load(course_dir: &Path, file_name: &str) -> Result<Option<Self>, AppError> {
        let path = course_dir.join(file_name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::DocumentRead {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
