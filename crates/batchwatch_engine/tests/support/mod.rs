#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use batchwatch_core::{JobId, JobMetric, RealtimeMetrics, ReplicateInfo};
use batchwatch_engine::{
    AdminApi, AdminError, AdminErrorKind, JobDescription, MetricsOptions, MetricsSink,
};
use chrono::{Duration, TimeZone, Utc};
use tokio_util::sync::CancellationToken;

pub const TARGET: &str = "myminio";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

pub fn job_id() -> JobId {
    JobId::new("KwSysDpxcBU9FNhGkn2dCf")
}

pub fn running(objects: u64) -> JobMetric {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    JobMetric {
        job_id: job_id().to_string(),
        job_type: "replicate".to_string(),
        start_time: start,
        last_update: start + Duration::seconds(objects as i64),
        replicate: Some(ReplicateInfo {
            objects,
            bytes_transferred: objects * 1024,
            object: format!("obj-{objects}"),
            ..ReplicateInfo::default()
        }),
        ..JobMetric::default()
    }
}

pub fn completed(objects: u64) -> JobMetric {
    JobMetric {
        complete: true,
        ..running(objects)
    }
}

pub fn failed(objects: u64) -> JobMetric {
    JobMetric {
        failed: true,
        ..running(objects)
    }
}

pub fn tick(job: JobMetric) -> RealtimeMetrics {
    RealtimeMetrics::with_job(&job_id(), job)
}

pub fn no_such_job() -> AdminError {
    AdminError::new(AdminErrorKind::NoSuchJob, "The specified job does not exist")
}

/// How the scripted feed behaves once its ticks are used up.
#[derive(Debug, Clone)]
pub enum FeedEnd {
    /// Wait for cancellation like a live feed that stopped ticking.
    Hang,
    Close,
    Fail(AdminError),
}

pub struct ScriptedAdmin {
    pub describe: Result<JobDescription, AdminError>,
    pub ticks: Vec<RealtimeMetrics>,
    pub end: FeedEnd,
    pub delivered: AtomicUsize,
    pub options: Mutex<Option<MetricsOptions>>,
}

impl ScriptedAdmin {
    pub fn new(ticks: Vec<RealtimeMetrics>, end: FeedEnd) -> Self {
        Self {
            describe: Ok(JobDescription {
                raw: "replicate:\n  apiVersion: v1\n".to_string(),
            }),
            ticks,
            end,
            delivered: AtomicUsize::new(0),
            options: Mutex::new(None),
        }
    }

    pub fn with_describe(mut self, describe: Result<JobDescription, AdminError>) -> Self {
        self.describe = describe;
        self
    }

    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AdminApi for ScriptedAdmin {
    async fn describe_job(&self, _job_id: &JobId) -> Result<JobDescription, AdminError> {
        self.describe.clone()
    }

    async fn metrics(
        &self,
        options: &MetricsOptions,
        sink: &dyn MetricsSink,
        cancel: &CancellationToken,
    ) -> Result<(), AdminError> {
        *self.options.lock().unwrap() = Some(options.clone());
        for tick in &self.ticks {
            if cancel.is_cancelled() {
                return Err(AdminError::cancelled());
            }
            tokio::task::yield_now().await;
            sink.deliver(tick.clone());
            self.delivered.fetch_add(1, Ordering::SeqCst);
        }
        match &self.end {
            FeedEnd::Hang => {
                cancel.cancelled().await;
                Err(AdminError::cancelled())
            }
            FeedEnd::Close => Ok(()),
            FeedEnd::Fail(err) => Err(err.clone()),
        }
    }
}

#[derive(Default)]
pub struct CollectSink {
    pub received: Mutex<Vec<RealtimeMetrics>>,
}

impl CollectSink {
    pub fn take(&self) -> Vec<RealtimeMetrics> {
        self.received.lock().unwrap().drain(..).collect()
    }
}

impl MetricsSink for CollectSink {
    fn deliver(&self, metrics: RealtimeMetrics) {
        self.received.lock().unwrap().push(metrics);
    }
}
