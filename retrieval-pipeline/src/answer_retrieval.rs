use std::collections::BTreeSet;

use common::{
    error::AppError, storage::index::ScoredChunk, utils::llm::GenerationProvider,
};
use ingestion_pipeline::CorpusManager;
use tracing::{debug, instrument};

/// A grounded answer plus the deduplicated set of files it drew from.
#[derive(Debug)]
pub struct Answer {
    pub content: String,
    pub sources: Vec<String>,
}

/// Orchestrates query processing and returns an answer with its sources.
///
/// The question is embedded with the corpus manager's own provider — the one
/// that built the course index — retrieval runs against the course's cached
/// index, and the generation capability turns the retrieved passages plus the
/// question into free text. Generation failures propagate untouched; this
/// component never retries.
#[instrument(skip_all, fields(course_id, k))]
pub async fn get_answer_with_sources(
    corpus: &CorpusManager,
    llm: &GenerationProvider,
    course_id: &str,
    question: &str,
    k: usize,
) -> Result<Answer, AppError> {
    let index = corpus.ensure_index(course_id).await?;

    let query_vector = corpus.embedder().embed(question).await?;
    let hits = index.query(&query_vector, k)?;
    debug!(course_id, hit_count = hits.len(), "retrieved passages");

    let prompt = build_prompt(question, &hits);
    let content = llm.generate(&prompt).await?;

    let sources: BTreeSet<String> = hits
        .iter()
        .map(|hit| hit.chunk.source_name.clone())
        .collect();

    Ok(Answer {
        content,
        sources: sources.into_iter().collect(),
    })
}

/// Assembles the generation prompt: retrieved passages in retrieval order,
/// each labelled with its source file, followed by the question.
pub fn build_prompt(question: &str, hits: &[ScoredChunk]) -> String {
    let mut context = String::new();
    for hit in hits {
        context.push_str(&format!("[source: {}]\n{}\n\n", hit.chunk.source_name, hit.chunk.text));
    }

    format!(
        r#"Course Material:
==================
{context}
Student Question:
==================
{question}
"#
    )
}
