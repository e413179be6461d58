use serde::{Deserialize, Serialize};

/// A size-bounded passage cut from a [`Document`](super::document::Document).
///
/// Carries enough provenance to attribute an answer back to the file it came
/// from. Serialized as part of the persisted course index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub course_id: String,
    pub source_name: String,
    pub text: String,
    pub sequence_index: usize,
}

impl Chunk {
    pub fn new(
        course_id: String,
        source_name: String,
        text: String,
        sequence_index: usize,
    ) -> Self {
        Self {
            course_id,
            source_name,
            text,
            sequence_index,
        }
    }
}
