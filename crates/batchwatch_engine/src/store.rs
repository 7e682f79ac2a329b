use std::sync::{Arc, Mutex, PoisonError};

use batchwatch_core::JobMetric;

/// Latest snapshot of the monitored job. Every write replaces the whole
/// snapshot; readers never observe a partial update.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    latest: Arc<Mutex<Option<Arc<JobMetric>>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Arc<JobMetric>> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn replace(&self, job: JobMetric) -> Arc<JobMetric> {
        let job = Arc::new(job);
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(job.clone());
        job
    }
}
