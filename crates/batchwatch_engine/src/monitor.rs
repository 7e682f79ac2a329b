use std::io::Write;
use std::sync::Arc;

use batchwatch_core::{JobId, Msg, StopReason};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::admin::AdminApi;
use crate::resolver::{resolve_job, Resolution};
use crate::subscriber::{DisplayRoute, Subscriber};
use crate::{Cancellation, MonitorError, SnapshotStore, StructuredEmitter};

/// Monitors one job on one target. Owns the cancellation shared by the feed
/// and whichever renderer is active.
pub struct Monitor {
    api: Arc<dyn AdminApi>,
    target: String,
    job_id: JobId,
    store: SnapshotStore,
    cancel: Cancellation,
}

impl Monitor {
    pub fn new(api: Arc<dyn AdminApi>, target: impl Into<String>, job_id: JobId) -> Self {
        Self {
            api,
            target: target.into(),
            job_id,
            store: SnapshotStore::new(),
            cancel: Cancellation::new(),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn cancellation(&self) -> Cancellation {
        self.cancel.clone()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub async fn resolve(&self) -> Result<Resolution, MonitorError> {
        resolve_job(self.api.as_ref(), &self.target, &self.job_id).await
    }

    /// Emits one JSON line per tick into `out` and returns once the feed is
    /// cancelled, either by a terminal tick or from outside.
    pub async fn run_structured<W: Write + Send>(&self, out: W) -> Result<W, MonitorError> {
        let emitter = StructuredEmitter::new(out, self.cancel.clone());
        let subscriber = Subscriber::new(
            self.job_id.clone(),
            self.store.clone(),
            emitter,
            self.cancel.clone(),
        );
        subscriber.run(self.api.as_ref(), &self.target).await?;
        Ok(subscriber.into_route().into_inner())
    }

    /// Starts the feed in the background, forwarding every tick to `tx`.
    pub fn spawn_display_feed(
        &self,
        tx: mpsc::UnboundedSender<Msg>,
    ) -> JoinHandle<Result<(), MonitorError>> {
        let api = self.api.clone();
        let target = self.target.clone();
        let subscriber = Subscriber::new(
            self.job_id.clone(),
            self.store.clone(),
            DisplayRoute::new(tx, self.cancel.clone()),
            self.cancel.clone(),
        );
        tokio::spawn(async move { subscriber.run(api.as_ref(), &target).await })
    }

    /// Stops the feed; safe to call any number of times.
    pub fn shutdown(&self) {
        self.cancel.cancel(StopReason::Shutdown);
    }
}
