pub mod chunk;
pub mod course_metadata;
pub mod document;
