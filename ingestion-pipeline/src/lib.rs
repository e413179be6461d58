#![allow(clippy::missing_docs_in_private_items)]

pub mod chunker;
pub mod corpus;
pub mod pipeline;
pub mod seed;

pub use chunker::{split_document, ChunkingConfig};
pub use pipeline::CorpusManager;
