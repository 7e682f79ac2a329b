#![allow(dead_code)]

use std::sync::Once;

use batchwatch_core::{JobId, JobMetric, RealtimeMetrics, ReplicateInfo};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

pub fn job_id() -> JobId {
    JobId::new("KwSysDpxcBU9FNhGkn2dCf")
}

pub fn started_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn replicate_job(elapsed_secs: i64, objects: u64, bytes: u64) -> JobMetric {
    JobMetric {
        job_id: job_id().to_string(),
        job_type: "replicate".to_string(),
        start_time: started_at(),
        last_update: started_at() + Duration::seconds(elapsed_secs),
        replicate: Some(ReplicateInfo {
            bucket: "photos".to_string(),
            object: format!("2024/img-{objects:04}.jpg"),
            objects,
            objects_failed: 0,
            bytes_transferred: bytes,
            bytes_failed: 0,
            ..ReplicateInfo::default()
        }),
        ..JobMetric::default()
    }
}

pub fn tick(job: JobMetric) -> RealtimeMetrics {
    RealtimeMetrics::with_job(&job_id(), job)
}

pub fn complete(mut job: JobMetric) -> JobMetric {
    job.complete = true;
    job
}

pub fn failed(mut job: JobMetric) -> JobMetric {
    job.failed = true;
    job
}
