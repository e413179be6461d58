/// A single course file read into memory, prior to chunking.
///
/// Documents are transient: they are superseded by the chunks derived from
/// them and are never persisted on their own.
#[derive(Debug, Clone)]
pub struct Document {
    pub course_id: String,
    pub source_name: String,
    pub text: String,
}

impl Document {
    pub fn new(course_id: String, source_name: String, text: String) -> Self {
        Self {
            course_id,
            source_name,
            text,
        }
    }
}
