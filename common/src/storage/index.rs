use std::cmp::Ordering;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    error::AppError, storage::types::chunk::Chunk, utils::embedding::EmbeddingProvider,
};

/// Bumped whenever the persisted layout changes incompatibly.
const FORMAT_VERSION: u32 = 1;

/// A chunk paired with the vector that represents it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A retrieval hit: the chunk plus its cosine similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// The vector index for one course.
///
/// Built wholesale from the course's current document set and never patched
/// incrementally; a rebuild replaces the entire index. Queries are read-only,
/// so a built index can be shared behind an `Arc` and queried concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseIndex {
    format_version: u32,
    pub course_id: String,
    /// Embedding space that produced `vectors`; see
    /// [`EmbeddingProvider::fingerprint`].
    pub embedding_fingerprint: String,
    pub built_at: DateTime<Utc>,
    pub vectors: Vec<EmbeddedChunk>,
}

impl CourseIndex {
    /// Embeds every chunk and assembles the index. All-or-nothing: any
    /// embedding failure leaves no partial index behind.
    pub async fn build(
        course_id: &str,
        chunks: Vec<Chunk>,
        embedder: &EmbeddingProvider,
    ) -> Result<Self, AppError> {
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = embedder.embed_batch(texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(AppError::Embedding(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let expected_dim = embedder.dimension();
        for (chunk, embedding) in chunks.iter().zip(&embeddings) {
            if embedding.len() != expected_dim {
                return Err(AppError::Embedding(format!(
                    "embedding for {}#{} has dimension {}, expected {}",
                    chunk.source_name,
                    chunk.sequence_index,
                    embedding.len(),
                    expected_dim
                )));
            }
        }

        let vectors = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
            .collect::<Vec<_>>();

        debug!(
            course_id,
            vector_count = vectors.len(),
            "built course index"
        );

        Ok(Self {
            format_version: FORMAT_VERSION,
            course_id: course_id.to_string(),
            embedding_fingerprint: embedder.fingerprint(),
            built_at: Utc::now(),
            vectors,
        })
    }

    /// Writes the index to `path` atomically: the payload goes to a temporary
    /// file in the destination directory and is renamed into place, so a
    /// concurrent [`load`](Self::load) never observes a half-written index.
    pub async fn persist(&self, path: &Path) -> Result<(), AppError> {
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "index path {} has no parent directory",
                    path.display()
                ))
            })?;
        tokio::fs::create_dir_all(&parent).await?;

        let bytes = serde_json::to_vec(self)?;
        let destination = path.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            let mut tmp = NamedTempFile::new_in(&parent)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&destination).map_err(|e| AppError::Io(e.error))?;
            Ok(())
        })
        .await??;

        Ok(())
    }

    /// Reconstructs an index persisted by [`persist`](Self::persist).
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::IndexNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let index: Self = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::IndexCorrupt(format!("{}: {e}", path.display())))?;

        if index.format_version != FORMAT_VERSION {
            return Err(AppError::IndexCorrupt(format!(
                "{}: unsupported format version {}",
                path.display(),
                index.format_version
            )));
        }

        Ok(index)
    }

    /// Returns the `k` chunks nearest to `query_vector` by cosine similarity,
    /// best first. Ties are broken by ascending sequence index, then source
    /// name, so repeated queries always return the same ordering.
    pub fn query(&self, query_vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>, AppError> {
        if k == 0 {
            return Err(AppError::InvalidArgument(
                "retrieval requires k > 0".to_string(),
            ));
        }

        let mut hits: Vec<ScoredChunk> = self
            .vectors
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query_vector, &entry.embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.sequence_index.cmp(&b.chunk.sequence_index))
                .then_with(|| a.chunk.source_name.cmp(&b.chunk.source_name))
        });
        hits.truncate(k);

        Ok(hits)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Cosine similarity with guards against non-finite values and zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

/// Course-scoped location of the persisted index inside `index_root`.
pub fn index_path(index_root: &Path, course_id: &str) -> PathBuf {
    index_root.join(course_id).join("index.json")
}
