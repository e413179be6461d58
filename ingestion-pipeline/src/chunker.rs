use common::{
    error::AppError,
    storage::types::{chunk::Chunk, document::Document},
};

/// Window geometry for document splitting, measured in characters.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    target_size: usize,
    overlap: usize,
}

impl ChunkingConfig {
    /// The overlap must be strictly smaller than the target size so every
    /// window advances and splitting terminates.
    pub fn new(target_size: usize, overlap: usize) -> Result<Self, AppError> {
        if target_size == 0 {
            return Err(AppError::InvalidArgument(
                "chunk target size must be positive".to_string(),
            ));
        }
        if overlap >= target_size {
            return Err(AppError::InvalidArgument(format!(
                "chunk overlap ({overlap}) must be smaller than target size ({target_size})"
            )));
        }
        Ok(Self {
            target_size,
            overlap,
        })
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Characters each successive window advances by.
    fn step(&self) -> usize {
        self.target_size - self.overlap
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_size: 1000,
            overlap: 200,
        }
    }
}

/// Splits a document into overlapping fixed-size windows.
///
/// The geometry is fully deterministic: every chunk except possibly the last
/// spans exactly `target_size` characters, consecutive chunks share exactly
/// `overlap` characters, and stripping the overlap from all chunks after the
/// first reconstructs the original text. Cuts always fall on `char`
/// boundaries. A document shorter than the target size becomes a single
/// chunk; whitespace-only documents produce no chunks at all.
pub fn split_document(document: &Document, config: &ChunkingConfig) -> Vec<Chunk> {
    let text = &document.text;
    if text.trim().is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, including the end of the text.
    let mut offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    offsets.push(text.len());
    let total_chars = offsets.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + config.target_size()).min(total_chars);
        let window = &text[offsets[start]..offsets[end]];
        chunks.push(Chunk::new(
            document.course_id.clone(),
            document.source_name.clone(),
            window.to_string(),
            chunks.len(),
        ));
        if end == total_chars {
            break;
        }
        start += config.step();
    }

    chunks
}
