use std::path::Path;

use common::{error::AppError, storage::types::document::Document};
use tracing::debug;

/// Lists the course ids under `root`: every immediate subdirectory is a
/// course. A missing root is treated as "no courses yet", not an error.
pub async fn discover_courses(root: &Path) -> Result<Vec<String>, AppError> {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut course_ids = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            course_ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    course_ids.sort();
    Ok(course_ids)
}

/// Reads every eligible content file in a course directory.
///
/// Eligible means: a regular file with the configured content extension that
/// is not the reserved metadata file. A read failure on any eligible file
/// aborts the whole course load and names the offending file; other courses
/// are unaffected because each course is processed independently.
pub async fn load_documents(
    course_id: &str,
    course_dir: &Path,
    document_extension: &str,
    metadata_file_name: &str,
) -> Result<Vec<Document>, AppError> {
    let mut entries = tokio::fs::read_dir(course_dir).await?;
    let mut documents = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let source_name = entry.file_name().to_string_lossy().into_owned();
        if source_name == metadata_file_name {
            continue;
        }
        let extension_matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(document_extension));
        if !extension_matches {
            debug!(course_id, source_name, "skipping non-content file");
            continue;
        }

        let path = entry.path();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::DocumentRead {
                path: path.display().to_string(),
                source: e,
            })?;

        documents.push(Document::new(course_id.to_string(), source_name, text));
    }

    documents.sort_by(|a, b| a.source_name.cmp(&b.source_name));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write(dir: &Path, name: &str, content: &str) {
        tokio::fs::write(dir.join(name), content)
            .await
            .expect("write fixture");
    }

    #[tokio::test]
    async fn discovery_lists_subdirectories_sorted() {
        let root = tempfile::tempdir().expect("tempdir");
        for course in ["psych-101", "bio-101", "chem-200"] {
            tokio::fs::create_dir(root.path().join(course))
                .await
                .expect("create course dir");
        }
        write(root.path(), "stray-file.md", "not a course").await;

        let courses = discover_courses(root.path()).await.expect("discover");
        assert_eq!(courses, vec!["bio-101", "chem-200", "psych-101"]);
    }

    #[tokio::test]
    async fn discovery_of_missing_root_is_empty() {
        let root = tempfile::tempdir().expect("tempdir");
        let missing = root.path().join("does-not-exist");
        let courses = discover_courses(&missing).await.expect("discover");
        assert!(courses.is_empty());
    }

    #[tokio::test]
    async fn loading_skips_metadata_and_foreign_extensions() {
        let root = tempfile::tempdir().expect("tempdir");
        write(root.path(), "chapter1.md", "# Chapter one").await;
        write(root.path(), "chapter2.md", "# Chapter two").await;
        write(root.path(), "metadata.json", r#"{"title":"t","description":"d"}"#).await;
        write(root.path(), "notes.txt", "scratch notes").await;

        let documents = load_documents("psych-101", root.path(), "md", "metadata.json")
            .await
            .expect("load documents");

        let names: Vec<&str> = documents
            .iter()
            .map(|doc| doc.source_name.as_str())
            .collect();
        assert_eq!(names, vec!["chapter1.md", "chapter2.md"]);
        assert!(documents.iter().all(|doc| doc.course_id == "psych-101"));
    }

    #[tokio::test]
    async fn empty_course_directory_loads_zero_documents() {
        let root = tempfile::tempdir().expect("tempdir");
        let documents = load_documents("empty-101", root.path(), "md", "metadata.json")
            .await
            .expect("load documents");
        assert!(documents.is_empty());
    }
}
