use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use async_openai::{types::CreateEmbeddingRequestArgs, Client};
use fastembed::{EmbeddingModel, ModelTrait, TextEmbedding, TextInitOptions};
use tokio::sync::Mutex;

use crate::{error::AppError, utils::config::AppConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    OpenAI,
    FastEmbed,
    Hashed,
}

impl Default for EmbeddingBackend {
    fn default() -> Self {
        Self::Hashed
    }
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "hashed" => Ok(Self::Hashed),
            "fastembed" | "fast-embed" | "fast" => Ok(Self::FastEmbed),
            other => Err(anyhow!(
                "unknown embedding backend '{other}'. Expected 'openai', 'hashed', or 'fastembed'."
            )),
        }
    }
}

/// Produces fixed-dimension vectors for passages and queries.
///
/// The backend is selected once from configuration at startup; an index built
/// with one backend must be queried with the same backend, which is why the
/// provider exposes a [`fingerprint`](Self::fingerprint) that is stored next
/// to the vectors it produced.
#[derive(Clone)]
pub struct EmbeddingProvider {
    inner: EmbeddingInner,
}

#[derive(Clone)]
enum EmbeddingInner {
    OpenAI {
        client: Arc<Client<async_openai::config::OpenAIConfig>>,
        model: String,
        dimensions: u32,
    },
    Hashed {
        dimension: usize,
    },
    FastEmbed {
        model: Arc<Mutex<TextEmbedding>>,
        model_name: EmbeddingModel,
        dimension: usize,
    },
}

impl EmbeddingProvider {
    pub fn backend_label(&self) -> &'static str {
        match self.inner {
            EmbeddingInner::Hashed { .. } => "hashed",
            EmbeddingInner::FastEmbed { .. } => "fastembed",
            EmbeddingInner::OpenAI { .. } => "openai",
        }
    }

    pub fn dimension(&self) -> usize {
        match &self.inner {
            EmbeddingInner::Hashed { dimension } => *dimension,
            EmbeddingInner::FastEmbed { dimension, .. } => *dimension,
            EmbeddingInner::OpenAI { dimensions, .. } => *dimensions as usize,
        }
    }

    pub fn model_code(&self) -> Option<String> {
        match &self.inner {
            EmbeddingInner::FastEmbed { model_name, .. } => Some(model_name.to_string()),
            EmbeddingInner::OpenAI { model, .. } => Some(model.clone()),
            EmbeddingInner::Hashed { .. } => None,
        }
    }

    /// Identifies the embedding space of this provider. Two providers with
    /// the same fingerprint produce mutually comparable vectors.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}/{}/{}",
            self.backend_label(),
            self.model_code().unwrap_or_else(|| "-".to_string()),
            self.dimension()
        )
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        match &self.inner {
            EmbeddingInner::Hashed { dimension } => Ok(hashed_embedding(text, *dimension)),
            EmbeddingInner::FastEmbed { model, .. } => {
                let mut guard = model.lock().await;
                let mut embeddings = guard
                    .embed(vec![text.to_owned()], None)
                    .map_err(|e| AppError::Embedding(format!("fastembed failed: {e}")))?;
                if embeddings.is_empty() {
                    return Err(AppError::Embedding(
                        "fastembed returned no embedding for input".to_string(),
                    ));
                }
                Ok(embeddings.remove(0))
            }
            EmbeddingInner::OpenAI {
                client,
                model,
                dimensions,
            } => {
                let request = CreateEmbeddingRequestArgs::default()
                    .model(model.clone())
                    .input([text])
                    .dimensions(*dimensions)
                    .build()
                    .map_err(|e| AppError::Embedding(e.to_string()))?;

                let response = client
                    .embeddings()
                    .create(request)
                    .await
                    .map_err(|e| AppError::Embedding(e.to_string()))?;

                let embedding = response
                    .data
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        AppError::Embedding("No embedding data received from API".into())
                    })?
                    .embedding;

                Ok(embedding)
            }
        }
    }

    pub async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        match &self.inner {
            EmbeddingInner::Hashed { dimension } => Ok(texts
                .into_iter()
                .map(|text| hashed_embedding(&text, *dimension))
                .collect()),
            EmbeddingInner::FastEmbed { model, .. } => {
                let mut guard = model.lock().await;
                guard
                    .embed(texts, None)
                    .map_err(|e| AppError::Embedding(format!("fastembed batch failed: {e}")))
            }
            EmbeddingInner::OpenAI {
                client,
                model,
                dimensions,
            } => {
                let request = CreateEmbeddingRequestArgs::default()
                    .model(model.clone())
                    .input(texts)
                    .dimensions(*dimensions)
                    .build()
                    .map_err(|e| AppError::Embedding(e.to_string()))?;

                let response = client
                    .embeddings()
                    .create(request)
                    .await
                    .map_err(|e| AppError::Embedding(e.to_string()))?;

                Ok(response
                    .data
                    .into_iter()
                    .map(|item| item.embedding)
                    .collect())
            }
        }
    }

    /// Builds the provider selected by `embedding_backend` in the config.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        match EmbeddingBackend::from_str(&config.embedding_backend)? {
            EmbeddingBackend::Hashed => Self::new_hashed(config.embedding_dimensions as usize),
            EmbeddingBackend::FastEmbed => {
                Self::new_fastembed(Some(config.embedding_model.clone())).await
            }
            EmbeddingBackend::OpenAI => {
                let client = Arc::new(Client::with_config(
                    async_openai::config::OpenAIConfig::new()
                        .with_api_key(&config.openai_api_key)
                        .with_api_base(&config.openai_base_url),
                ));
                Self::new_openai(
                    client,
                    config.embedding_model.clone(),
                    config.embedding_dimensions,
                )
            }
        }
    }

    pub fn new_openai(
        client: Arc<Client<async_openai::config::OpenAIConfig>>,
        model: String,
        dimensions: u32,
    ) -> Result<Self> {
        Ok(EmbeddingProvider {
            inner: EmbeddingInner::OpenAI {
                client,
                model,
                dimensions,
            },
        })
    }

    pub async fn new_fastembed(model_override: Option<String>) -> Result<Self> {
        let model_name = if let Some(code) = model_override {
            EmbeddingModel::from_str(&code).map_err(|err| anyhow!(err))?
        } else {
            EmbeddingModel::default()
        };

        let options = TextInitOptions::new(model_name.clone()).with_show_download_progress(true);
        let model_name_for_task = model_name.clone();
        let model_name_code = model_name.to_string();

        let (model, dimension) = tokio::task::spawn_blocking(move || -> Result<_> {
            let model =
                TextEmbedding::try_new(options).context("initialising FastEmbed text model")?;
            let info = EmbeddingModel::get_model_info(&model_name_for_task)
                .ok_or_else(|| anyhow!("FastEmbed model metadata missing for {model_name_code}"))?;
            Ok((model, info.dim))
        })
        .await
        .context("joining FastEmbed initialisation task")??;

        Ok(EmbeddingProvider {
            inner: EmbeddingInner::FastEmbed {
                model: Arc::new(Mutex::new(model)),
                model_name,
                dimension,
            },
        })
    }

    pub fn new_hashed(dimension: usize) -> Result<Self> {
        Ok(EmbeddingProvider {
            inner: EmbeddingInner::Hashed {
                dimension: dimension.max(1),
            },
        })
    }
}

// Helper functions for hashed embeddings
fn hashed_embedding(text: &str, dimension: usize) -> Vec<f32> {
    let dim = dimension.max(1);
    let mut vector = vec![0.0f32; dim];
    if text.is_empty() {
        return vector;
    }

    let mut token_count = 0f32;
    for token in tokens(text) {
        token_count += 1.0;
        let idx = bucket(&token, dim);
        vector[idx] += 1.0;
    }

    if token_count == 0.0 {
        return vector;
    }

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }

    vector
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
}

fn bucket(token: &str, dimension: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    (hasher.finish() as usize) % dimension
}
