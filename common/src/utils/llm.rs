use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_openai::{
    types::{
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::{error::AppError, utils::config::AppConfig};

/// System prompt sent ahead of every tutoring request.
pub const TUTOR_SYSTEM_PROMPT: &str = "You are a helpful course tutor. Answer the student's \
question using only the provided course material. If the material does not contain the answer, \
say so instead of guessing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationBackend {
    OpenAI,
    Echo,
}

impl std::str::FromStr for GenerationBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "echo" => Ok(Self::Echo),
            other => Err(anyhow!(
                "unknown generation backend '{other}'. Expected 'openai' or 'echo'."
            )),
        }
    }
}

/// Turns a fully assembled prompt into free-text output.
///
/// Selected once from configuration at startup. The `echo` backend returns
/// the prompt verbatim and exists for offline operation and tests.
#[derive(Clone)]
pub struct GenerationProvider {
    inner: GenerationInner,
    timeout: Duration,
}

#[derive(Clone)]
enum GenerationInner {
    OpenAI {
        client: Arc<Client<async_openai::config::OpenAIConfig>>,
        model: String,
        temperature: f32,
    },
    Echo,
}

impl GenerationProvider {
    pub fn backend_label(&self) -> &'static str {
        match self.inner {
            GenerationInner::OpenAI { .. } => "openai",
            GenerationInner::Echo => "echo",
        }
    }

    /// Builds the provider selected by `generation_backend` in the config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.generation_timeout_secs);
        match config.generation_backend.parse::<GenerationBackend>()? {
            GenerationBackend::Echo => Ok(Self::new_echo(timeout)),
            GenerationBackend::OpenAI => {
                let client = Arc::new(Client::with_config(
                    async_openai::config::OpenAIConfig::new()
                        .with_api_key(&config.openai_api_key)
                        .with_api_base(&config.openai_base_url),
                ));
                Ok(Self::new_openai(client, config.chat_model.clone(), timeout))
            }
        }
    }

    pub fn new_openai(
        client: Arc<Client<async_openai::config::OpenAIConfig>>,
        model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            inner: GenerationInner::OpenAI {
                client,
                model,
                temperature: 0.7,
            },
            timeout,
        }
    }

    pub fn new_echo(timeout: Duration) -> Self {
        Self {
            inner: GenerationInner::Echo,
            timeout,
        }
    }

    /// Completes `prompt`. A call that exceeds the configured timeout fails
    /// with a generation error rather than hanging the caller.
    pub async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        Self::bounded(self.timeout, self.generate_inner(prompt)).await
    }

    async fn bounded<F>(limit: Duration, task: F) -> Result<String, AppError>
    where
        F: Future<Output = Result<String, AppError>>,
    {
        match tokio::time::timeout(limit, task).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Generation(format!(
                "generation timed out after {}s",
                limit.as_secs()
            ))),
        }
    }

    async fn generate_inner(&self, prompt: &str) -> Result<String, AppError> {
        match &self.inner {
            GenerationInner::Echo => Ok(prompt.to_string()),
            GenerationInner::OpenAI {
                client,
                model,
                temperature,
            } => {
                let request = CreateChatCompletionRequestArgs::default()
                    .model(model.clone())
                    .temperature(*temperature)
                    .messages([
                        ChatCompletionRequestSystemMessage::from(TUTOR_SYSTEM_PROMPT).into(),
                        ChatCompletionRequestUserMessage::from(prompt).into(),
                    ])
                    .build()
                    .map_err(|e| AppError::Generation(e.to_string()))?;

                let response = client
                    .chat()
                    .create(request)
                    .await
                    .map_err(|e| AppError::Generation(e.to_string()))?;

                response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .ok_or_else(|| {
                        AppError::Generation("No content found in model response".into())
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[tokio::test]
    async fn echo_backend_returns_prompt_verbatim() {
        let provider = GenerationProvider::new_echo(Duration::from_secs(5));
        let output = provider.generate("What is a neuron?").await.expect("generate");
        assert_eq!(output, "What is a neuron?");
    }

    #[tokio::test]
    async fn generation_exceeding_the_timeout_fails_as_a_generation_error() {
        let result = GenerationProvider::bounded(
            Duration::from_millis(10),
            std::future::pending::<Result<String, AppError>>(),
        )
        .await;

        match result {
            Err(AppError::Generation(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected a generation timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generation_finishing_within_the_timeout_passes_through() {
        let output = GenerationProvider::bounded(
            Duration::from_secs(5),
            std::future::ready(Ok("done".to_string())),
        )
        .await
        .expect("bounded result");
        assert_eq!(output, "done");
    }

    #[test]
    fn backend_parsing_rejects_unknown_labels() {
        assert!(GenerationBackend::from_str("echo").is_ok());
        assert!(GenerationBackend::from_str("openai").is_ok());
        assert!(GenerationBackend::from_str("markov").is_err());
    }
}
