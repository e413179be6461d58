use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use common::{
    error::AppError,
    storage::{
        index::{index_path, CourseIndex},
        registry::IndexRegistry,
        types::course_metadata::CourseMetadata,
    },
    utils::{config::AppConfig, embedding::EmbeddingProvider},
};
use tracing::{debug, error, info, warn};

use crate::{
    chunker::{split_document, ChunkingConfig},
    corpus,
};

/// Owns the mapping from course id to index.
///
/// Decides build-vs-load per course: a cached index wins, then a persisted
/// one, and only when neither exists (or the persisted copy is unusable) are
/// the course's documents re-read, re-chunked and re-embedded. The embedding
/// provider is pinned here so index build and query time always share one
/// embedding space.
pub struct CorpusManager {
    course_root: PathBuf,
    index_root: PathBuf,
    document_extension: String,
    metadata_file_name: String,
    chunking: ChunkingConfig,
    embedder: EmbeddingProvider,
    registry: Arc<IndexRegistry>,
}

impl CorpusManager {
    pub fn new(
        config: &AppConfig,
        embedder: EmbeddingProvider,
        registry: Arc<IndexRegistry>,
    ) -> Result<Self, AppError> {
        let chunking = ChunkingConfig::new(config.chunk_target_size, config.chunk_overlap)?;
        Ok(Self {
            course_root: PathBuf::from(&config.course_data_path),
            index_root: PathBuf::from(&config.index_data_path),
            document_extension: config.document_extension.clone(),
            metadata_file_name: config.metadata_file_name.clone(),
            chunking,
            embedder,
            registry,
        })
    }

    pub fn embedder(&self) -> &EmbeddingProvider {
        &self.embedder
    }

    pub fn registry(&self) -> &Arc<IndexRegistry> {
        &self.registry
    }

    pub async fn discover_courses(&self) -> Result<Vec<String>, AppError> {
        corpus::discover_courses(&self.course_root).await
    }

    pub async fn metadata(&self, course_id: &str) -> Result<Option<CourseMetadata>, AppError> {
        CourseMetadata::load(&self.course_root.join(course_id), &self.metadata_file_name).await
    }

    /// Returns the course's index, building it on first access.
    ///
    /// Build-and-persist for one course id is serialized behind a per-course
    /// lock; queries against an already cached index never wait on it.
    pub async fn ensure_index(&self, course_id: &str) -> Result<Arc<CourseIndex>, AppError> {
        if let Some(index) = self.registry.get(course_id).await {
            return Ok(index);
        }

        let build_lock = self.registry.build_lock(course_id).await;
        let _guard = build_lock.lock().await;

        // Another caller may have finished while we waited for the lock.
        if let Some(index) = self.registry.get(course_id).await {
            return Ok(index);
        }

        let path = index_path(&self.index_root, course_id);
        match CourseIndex::load(&path).await {
            Ok(index) if index.embedding_fingerprint == self.embedder.fingerprint() => {
                info!(
                    course_id,
                    vector_count = index.len(),
                    "loaded persisted course index"
                );
                let index = Arc::new(index);
                self.registry.insert(course_id, Arc::clone(&index)).await;
                return Ok(index);
            }
            Ok(index) => {
                warn!(
                    course_id,
                    persisted = %index.embedding_fingerprint,
                    active = %self.embedder.fingerprint(),
                    "persisted index was built in a different embedding space; rebuilding"
                );
            }
            Err(AppError::IndexNotFound(_)) => {
                debug!(course_id, "no persisted index; building from documents");
            }
            Err(AppError::IndexCorrupt(reason)) => {
                warn!(course_id, reason, "persisted index unreadable; rebuilding");
            }
            Err(e) => return Err(e),
        }

        let index = match self.build_and_persist(course_id, &path).await {
            Ok(index) => Arc::new(index),
            Err(e) => {
                // A bogus course id must not pin a lock entry forever.
                if matches!(e, AppError::CourseNotFound(_)) {
                    self.registry.discard_build_lock(course_id).await;
                }
                return Err(e);
            }
        };
        self.registry.insert(course_id, Arc::clone(&index)).await;
        Ok(index)
    }

    async fn build_and_persist(
        &self,
        course_id: &str,
        path: &std::path::Path,
    ) -> Result<CourseIndex, AppError> {
        let course_dir = self.course_root.join(course_id);
        let is_course = match tokio::fs::metadata(&course_dir).await {
            Ok(metadata) => metadata.is_dir(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if !is_course {
            return Err(AppError::CourseNotFound(course_id.to_string()));
        }

        let started = Instant::now();
        let documents = corpus::load_documents(
            course_id,
            &course_dir,
            &self.document_extension,
            &self.metadata_file_name,
        )
        .await?;

        let mut chunks = Vec::new();
        for document in &documents {
            chunks.extend(split_document(document, &self.chunking));
        }

        info!(
            course_id,
            document_count = documents.len(),
            chunk_count = chunks.len(),
            "building course index"
        );

        let index = CourseIndex::build(course_id, chunks, &self.embedder).await?;
        index.persist(path).await?;

        info!(
            course_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "course index built and persisted"
        );
        Ok(index)
    }

    /// Builds or loads every discovered course at startup. A failing course
    /// is logged and skipped so the rest of the corpus stays available.
    pub async fn warm_all(&self) -> Result<(), AppError> {
        let course_ids = self.discover_courses().await?;
        let results = futures::future::join_all(
            course_ids
                .iter()
                .map(|course_id| self.ensure_index(course_id)),
        )
        .await;

        for (course_id, result) in course_ids.iter().zip(results) {
            if let Err(e) = result {
                error!(course_id, error = %e, "failed to prepare course index");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::storage::index::index_path;

    struct Fixture {
        manager: CorpusManager,
        _course_root: tempfile::TempDir,
        _index_root: tempfile::TempDir,
        course_root_path: PathBuf,
        index_root_path: PathBuf,
    }

    async fn fixture(dimension: usize) -> Fixture {
        let course_root = tempfile::tempdir().expect("course root");
        let index_root = tempfile::tempdir().expect("index root");
        let config = AppConfig {
            course_data_path: course_root.path().display().to_string(),
            index_data_path: index_root.path().display().to_string(),
            chunk_target_size: 100,
            chunk_overlap: 20,
            ..AppConfig::default()
        };
        let embedder = EmbeddingProvider::new_hashed(dimension).expect("hashed provider");
        let manager = CorpusManager::new(&config, embedder, Arc::new(IndexRegistry::new()))
            .expect("corpus manager");
        let course_root_path = course_root.path().to_path_buf();
        let index_root_path = index_root.path().to_path_buf();
        Fixture {
            manager,
            _course_root: course_root,
            _index_root: index_root,
            course_root_path,
            index_root_path,
        }
    }

    async fn add_course(fixture: &Fixture, course_id: &str, files: &[(&str, &str)]) {
        let dir = fixture.course_root_path.join(course_id);
        tokio::fs::create_dir_all(&dir).await.expect("course dir");
        for (name, content) in files {
            tokio::fs::write(dir.join(name), content)
                .await
                .expect("write course file");
        }
    }

    #[tokio::test]
    async fn first_access_builds_persists_and_caches() {
        let fixture = fixture(32).await;
        add_course(
            &fixture,
            "psych-101",
            &[("chapter1.md", "Psychology is the study of mind and behavior.")],
        )
        .await;

        let index = fixture
            .manager
            .ensure_index("psych-101")
            .await
            .expect("ensure index");
        assert_eq!(index.course_id, "psych-101");
        assert_eq!(index.len(), 1);

        let persisted = index_path(&fixture.index_root_path, "psych-101");
        assert!(persisted.exists(), "index file should be persisted");

        // Second call must hit the cache and hand back the same Arc.
        let again = fixture
            .manager
            .ensure_index("psych-101")
            .await
            .expect("cached index");
        assert!(Arc::ptr_eq(&index, &again));
    }

    #[tokio::test]
    async fn unknown_course_is_reported_as_not_found() {
        let fixture = fixture(32).await;
        let result = fixture.manager.ensure_index("never-taught-101").await;
        assert!(matches!(result, Err(AppError::CourseNotFound(id)) if id == "never-taught-101"));
    }

    #[tokio::test]
    async fn failed_lookup_of_a_bogus_course_leaves_no_lock_entry() {
        let fixture = fixture(32).await;
        add_course(&fixture, "real-101", &[("a.md", "Real course content.")]).await;

        for _ in 0..3 {
            let result = fixture.manager.ensure_index("ghost-course").await;
            assert!(matches!(result, Err(AppError::CourseNotFound(_))));
        }
        assert_eq!(fixture.manager.registry().build_lock_count().await, 0);

        // A real build keeps its lock entry.
        fixture
            .manager
            .ensure_index("real-101")
            .await
            .expect("ensure index");
        assert_eq!(fixture.manager.registry().build_lock_count().await, 1);
    }

    #[tokio::test]
    async fn empty_course_directory_builds_an_empty_index() {
        let fixture = fixture(32).await;
        add_course(&fixture, "silent-101", &[]).await;

        let index = fixture
            .manager
            .ensure_index("silent-101")
            .await
            .expect("ensure index");
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn corrupt_persisted_index_triggers_rebuild() {
        let fixture = fixture(32).await;
        add_course(&fixture, "bio-101", &[("cells.md", "Cells divide by mitosis.")]).await;

        let path = index_path(&fixture.index_root_path, "bio-101");
        tokio::fs::create_dir_all(path.parent().expect("parent"))
            .await
            .expect("index dir");
        tokio::fs::write(&path, b"{ definitely broken")
            .await
            .expect("write corrupt index");

        let index = fixture
            .manager
            .ensure_index("bio-101")
            .await
            .expect("rebuild after corruption");
        assert_eq!(index.len(), 1);

        // The rebuild must have replaced the corrupt file with a loadable one.
        let reloaded = CourseIndex::load(&path).await.expect("reload");
        assert_eq!(reloaded.len(), 1);
    }

    #[tokio::test]
    async fn fingerprint_mismatch_triggers_rebuild() {
        let fixture = fixture(32).await;
        add_course(&fixture, "chem-200", &[("atoms.md", "Atoms bond into molecules.")]).await;

        // Persist an index from a different embedding space.
        let other_embedder = EmbeddingProvider::new_hashed(8).expect("hashed provider");
        let foreign = CourseIndex::build("chem-200", Vec::new(), &other_embedder)
            .await
            .expect("foreign index");
        let path = index_path(&fixture.index_root_path, "chem-200");
        foreign.persist(&path).await.expect("persist foreign");

        let index = fixture
            .manager
            .ensure_index("chem-200")
            .await
            .expect("rebuild after mismatch");
        assert_eq!(
            index.embedding_fingerprint,
            fixture.manager.embedder().fingerprint()
        );
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn unreadable_document_aborts_only_that_course() {
        let fixture = fixture(32).await;
        add_course(&fixture, "broken-101", &[]).await;
        // read_to_string chokes on invalid UTF-8 and must name the file.
        tokio::fs::write(
            fixture.course_root_path.join("broken-101").join("bad.md"),
            [0xff, 0xfe, 0xfd],
        )
        .await
        .expect("write invalid utf-8");
        add_course(&fixture, "healthy-101", &[("notes.md", "All fine here.")]).await;

        let result = fixture.manager.ensure_index("broken-101").await;
        match result {
            Err(AppError::DocumentRead { path, .. }) => assert!(path.contains("bad.md")),
            other => panic!("expected DocumentRead error, got {other:?}"),
        }

        let healthy = fixture
            .manager
            .ensure_index("healthy-101")
            .await
            .expect("healthy course unaffected");
        assert_eq!(healthy.len(), 1);
    }

    #[tokio::test]
    async fn warm_all_prepares_every_course_and_skips_failures() {
        let fixture = fixture(32).await;
        add_course(&fixture, "psych-101", &[("a.md", "Conditioning and learning.")]).await;
        add_course(&fixture, "bio-101", &[("b.md", "Genetics and heredity.")]).await;
        add_course(&fixture, "broken-101", &[]).await;
        tokio::fs::write(
            fixture.course_root_path.join("broken-101").join("bad.md"),
            [0xff],
        )
        .await
        .expect("write invalid utf-8");

        fixture.manager.warm_all().await.expect("warm all");

        let warmed = fixture.manager.registry().course_ids().await;
        assert_eq!(warmed, vec!["bio-101".to_string(), "psych-101".to_string()]);
    }

    #[tokio::test]
    async fn courses_are_indexed_in_isolation() {
        let fixture = fixture(32).await;
        add_course(&fixture, "psych-101", &[("mind.md", "Cognition and memory.")]).await;
        add_course(&fixture, "bio-101", &[("life.md", "Evolution by natural selection.")]).await;

        let psych = fixture.manager.ensure_index("psych-101").await.expect("psych");
        let bio = fixture.manager.ensure_index("bio-101").await.expect("bio");

        assert!(psych
            .vectors
            .iter()
            .all(|entry| entry.chunk.course_id == "psych-101"));
        assert!(bio
            .vectors
            .iter()
            .all(|entry| entry.chunk.course_id == "bio-101"));
    }
}
