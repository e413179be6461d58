use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_generation_backend")]
    pub generation_backend: String,
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
    #[serde(default = "default_embedding_backend")]
    pub embedding_backend: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: u32,
    #[serde(default = "default_course_data_path")]
    pub course_data_path: String,
    #[serde(default = "default_index_data_path")]
    pub index_data_path: String,
    #[serde(default = "default_chunk_target_size")]
    pub chunk_target_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_retrieval_top_k")]
    pub retrieval_top_k: usize,
    #[serde(default = "default_course_id")]
    pub default_course_id: String,
    #[serde(default = "default_metadata_file_name")]
    pub metadata_file_name: String,
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
    #[serde(default = "default_seed_sample_course")]
    pub seed_sample_course: bool,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_generation_backend() -> String {
    "echo".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    30
}

fn default_embedding_backend() -> String {
    "hashed".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> u32 {
    384
}

fn default_course_data_path() -> String {
    "./courses".to_string()
}

fn default_index_data_path() -> String {
    "./indexes".to_string()
}

fn default_chunk_target_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_retrieval_top_k() -> usize {
    4
}

fn default_course_id() -> String {
    "intro-to-psychology".to_string()
}

fn default_metadata_file_name() -> String {
    "metadata.json".to_string()
}

fn default_document_extension() -> String {
    "md".to_string()
}

fn default_seed_sample_course() -> bool {
    true
}

fn default_http_port() -> u16 {
    3000
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: default_base_url(),
            chat_model: default_chat_model(),
            generation_backend: default_generation_backend(),
            generation_timeout_secs: default_generation_timeout_secs(),
            embedding_backend: default_embedding_backend(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: default_embedding_dimensions(),
            course_data_path: default_course_data_path(),
            index_data_path: default_index_data_path(),
            chunk_target_size: default_chunk_target_size(),
            chunk_overlap: default_chunk_overlap(),
            retrieval_top_k: default_retrieval_top_k(),
            default_course_id: default_course_id(),
            metadata_file_name: default_metadata_file_name(),
            document_extension: default_document_extension(),
            seed_sample_course: default_seed_sample_course(),
            http_port: default_http_port(),
        }
    }
}
