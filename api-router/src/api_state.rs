use std::sync::Arc;

use common::utils::{config::AppConfig, llm::GenerationProvider};
use ingestion_pipeline::CorpusManager;

#[derive(Clone)]
pub struct ApiState {
    pub corpus: Arc<CorpusManager>,
    pub llm: Arc<GenerationProvider>,
    pub config: AppConfig,
}

impl ApiState {
    pub fn new(
        config: &AppConfig,
        corpus: Arc<CorpusManager>,
        llm: Arc<GenerationProvider>,
    ) -> Self {
        Self {
            corpus,
            llm,
            config: config.clone(),
        }
    }
}
