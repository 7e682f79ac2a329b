//! Batchwatch core: metric wire types, the live display state machine and
//! view-model helpers. Nothing in here performs IO.
mod effect;
mod format;
mod metrics;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, StopReason};
pub use format::{format_elapsed, format_iec_bytes};
pub use metrics::{
    Aggregated, BatchJobMetrics, ExpirationInfo, FeedLookup, JobId, JobKind, JobMetric,
    JobOutcome, KeyRotationInfo, RealtimeMetrics, ReplicateInfo,
};
pub use msg::Msg;
pub use state::MonitorState;
pub use update::update;
pub use view_model::{throughput, Header, MonitorViewModel, RowView, Throughput, SPINNER_FRAMES};
