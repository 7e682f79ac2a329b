use std::time::Duration;

use batchwatch_core::{JobId, RealtimeMetrics};
use tokio_util::sync::CancellationToken;

use crate::AdminError;

/// Metric families the admin service can aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    BatchJobs,
}

impl MetricKind {
    /// Bit used in the `types` query parameter.
    pub fn type_bits(self) -> u32 {
        match self {
            MetricKind::BatchJobs => 1 << 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsOptions {
    pub kind: MetricKind,
    pub by_job_id: Option<JobId>,
    pub interval: Duration,
}

impl MetricsOptions {
    /// One aggregated batch-job message per second, filtered to `job_id`.
    pub fn batch_job(job_id: JobId) -> Self {
        Self {
            kind: MetricKind::BatchJobs,
            by_job_id: Some(job_id),
            interval: Duration::from_secs(1),
        }
    }
}

/// Raw describe output; only its existence matters to the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescription {
    pub raw: String,
}

/// Receives feed messages one at a time, in delivery order. Implementations
/// must not block: the feed does not read ahead while a delivery runs.
pub trait MetricsSink: Send + Sync {
    fn deliver(&self, metrics: RealtimeMetrics);
}

#[async_trait::async_trait]
pub trait AdminApi: Send + Sync {
    async fn describe_job(&self, job_id: &JobId) -> Result<JobDescription, AdminError>;

    /// Streams metrics into `sink` until the server ends the feed or `cancel`
    /// fires, in which case the error kind is `Cancelled`.
    async fn metrics(
        &self,
        options: &MetricsOptions,
        sink: &dyn MetricsSink,
        cancel: &CancellationToken,
    ) -> Result<(), AdminError>;
}
