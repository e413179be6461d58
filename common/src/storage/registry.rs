use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::storage::index::CourseIndex;

/// Process-wide cache of built course indexes.
///
/// Created once at startup and passed explicitly to the components that need
/// it. Reads on the cache are concurrent; the per-course build locks ensure
/// at most one build-and-persist sequence is in flight per course while
/// builds for different courses proceed in parallel.
#[derive(Debug, Default)]
pub struct IndexRegistry {
    indexes: RwLock<HashMap<String, Arc<CourseIndex>>>,
    build_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, course_id: &str) -> Option<Arc<CourseIndex>> {
        self.indexes.read().await.get(course_id).cloned()
    }

    pub async fn insert(&self, course_id: &str, index: Arc<CourseIndex>) {
        self.indexes
            .write()
            .await
            .insert(course_id.to_string(), index);
    }

    /// The lock guarding build-and-persist for one course. Callers hold it
    /// across the whole load-or-build critical section; queries against
    /// already-cached indexes never touch it.
    pub async fn build_lock(&self, course_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.build_locks.lock().await;
        Arc::clone(
            locks
                .entry(course_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Removes a course's build lock entry. Callers that fail a build for a
    /// course id that does not exist use this to keep the lock map bounded by
    /// the set of real courses; lookups of bogus ids would otherwise pin an
    /// entry forever.
    pub async fn discard_build_lock(&self, course_id: &str) {
        self.build_locks.lock().await.remove(course_id);
    }

    pub async fn build_lock_count(&self) -> usize {
        self.build_locks.lock().await.len()
    }

    pub async fn course_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.indexes.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.indexes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.indexes.read().await.is_empty()
    }
}
