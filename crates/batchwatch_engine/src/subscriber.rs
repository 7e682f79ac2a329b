use batchwatch_core::{FeedLookup, JobId, JobOutcome, Msg, RealtimeMetrics, StopReason};
use tokio::sync::mpsc;
use watch_logging::{watch_debug, watch_info, watch_trace};

use crate::admin::{AdminApi, MetricsOptions, MetricsSink};
use crate::{Cancellation, MonitorError, SnapshotStore};

/// What the subscriber concluded about one feed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    NoAggregation,
    JobMissing,
    Snapshot { outcome: Option<JobOutcome> },
}

/// Where delivered ticks go: the structured emitter or the live display.
pub trait SnapshotRoute: Send + Sync {
    fn route(&self, metrics: &RealtimeMetrics, tick: Tick);
}

/// Forwards every tick to the live display queue; the display applies its
/// own absence checks. A closed queue means the display is gone, which
/// stops the feed.
#[derive(Debug, Clone)]
pub struct DisplayRoute {
    tx: mpsc::UnboundedSender<Msg>,
    cancel: Cancellation,
}

impl DisplayRoute {
    pub fn new(tx: mpsc::UnboundedSender<Msg>, cancel: Cancellation) -> Self {
        Self { tx, cancel }
    }
}

impl SnapshotRoute for DisplayRoute {
    fn route(&self, metrics: &RealtimeMetrics, _tick: Tick) {
        if self.tx.send(Msg::Metrics(Box::new(metrics.clone()))).is_err() {
            watch_debug!("display queue closed; stopping the feed");
            self.cancel.cancel(StopReason::Shutdown);
        }
    }
}

/// Feed consumer for one job. Sole writer of the snapshot store.
pub struct Subscriber<R> {
    job_id: JobId,
    store: SnapshotStore,
    route: R,
    cancel: Cancellation,
}

impl<R: SnapshotRoute> Subscriber<R> {
    pub fn new(job_id: JobId, store: SnapshotStore, route: R, cancel: Cancellation) -> Self {
        Self {
            job_id,
            store,
            route,
            cancel,
        }
    }

    pub fn into_route(self) -> R {
        self.route
    }

    /// Runs the feed until a terminal condition or an outside cancel.
    ///
    /// Cancellation is the normal way out and is not an error; a feed the
    /// server closes cleanly also trips the cancellation so that every
    /// waiter wakes up.
    pub async fn run(&self, api: &dyn AdminApi, target: &str) -> Result<(), MonitorError> {
        let options = MetricsOptions::batch_job(self.job_id.clone());
        match api.metrics(&options, self, self.cancel.token()).await {
            Ok(()) => {
                watch_info!("metrics feed for job {} closed by server", self.job_id);
                self.cancel.cancel(StopReason::FeedClosed);
                Ok(())
            }
            Err(err) if err.is_cancelled() || self.cancel.is_cancelled() => {
                watch_debug!("metrics feed for job {} stopped: {}", self.job_id, err);
                Ok(())
            }
            Err(source) => Err(MonitorError::Subscribe {
                target: target.to_string(),
                source,
            }),
        }
    }
}

impl<R: SnapshotRoute> MetricsSink for Subscriber<R> {
    fn deliver(&self, metrics: RealtimeMetrics) {
        if self.cancel.is_cancelled() {
            watch_trace!("dropping tick for job {} after cancel", self.job_id);
            return;
        }

        match metrics.lookup(&self.job_id) {
            FeedLookup::NoAggregation => {
                self.route.route(&metrics, Tick::NoAggregation);
                self.cancel.cancel(StopReason::FeedAbsent);
            }
            FeedLookup::JobMissing => {
                self.route.route(&metrics, Tick::JobMissing);
                self.cancel.cancel(StopReason::JobVanished);
            }
            FeedLookup::Found(job) => {
                let stored = self.store.replace(job.clone());
                let outcome = stored.outcome();
                self.route.route(&metrics, Tick::Snapshot { outcome });
                match outcome {
                    Some(JobOutcome::Complete) => {
                        self.cancel.cancel(StopReason::JobComplete);
                    }
                    Some(JobOutcome::Failed) => {
                        self.cancel.cancel(StopReason::JobFailed);
                    }
                    None => {}
                }
            }
        }
    }
}
