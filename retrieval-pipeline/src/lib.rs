#![allow(clippy::missing_docs_in_private_items)]

pub mod answer_retrieval;

pub use answer_retrieval::{get_answer_with_sources, Answer};
