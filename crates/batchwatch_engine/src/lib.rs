//! Batchwatch engine: admin API access, the metrics subscription and the
//! cancellation plumbing shared by both output modes.
mod admin;
mod cancel;
mod client;
mod emitter;
mod monitor;
mod resolver;
mod store;
mod subscriber;
mod types;

pub use admin::{AdminApi, JobDescription, MetricKind, MetricsOptions, MetricsSink};
pub use cancel::Cancellation;
pub use client::{AdminSettings, ReqwestAdminClient};
pub use emitter::StructuredEmitter;
pub use monitor::Monitor;
pub use resolver::{resolve_job, Resolution};
pub use store::SnapshotStore;
pub use subscriber::{DisplayRoute, SnapshotRoute, Subscriber, Tick};
pub use types::{AdminError, AdminErrorKind, MonitorError, NO_SUCH_JOB_CODE};
