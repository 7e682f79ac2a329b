//! Wire shapes of the admin metrics feed, restricted to what the batch job
//! monitor reads. Unknown fields are carried through untouched so that the
//! structured output reproduces the envelope the server sent.
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque batch job identifier as issued by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One message of the realtime metrics feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RealtimeMetrics {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub aggregated: Aggregated,
    #[serde(rename = "final", default)]
    pub is_final: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Aggregated {
    #[serde(rename = "batchJobs", default, skip_serializing_if = "Option::is_none")]
    pub batch_jobs: Option<BatchJobMetrics>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchJobMetrics {
    #[serde(rename = "collected", default)]
    pub collected_at: DateTime<Utc>,
    #[serde(default)]
    pub jobs: BTreeMap<JobId, JobMetric>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobMetric {
    #[serde(rename = "jobID")]
    pub job_id: String,
    pub job_type: String,
    pub start_time: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
    pub retry_attempts: u32,
    pub complete: bool,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicate: Option<ReplicateInfo>,
    #[serde(rename = "rotation", skip_serializing_if = "Option::is_none")]
    pub key_rotate: Option<KeyRotationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<ExpirationInfo>,
    /// Fields this monitor does not read, such as `status` or sections of
    /// job types it has no layout for.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplicateInfo {
    #[serde(rename = "lastBucket")]
    pub bucket: String,
    #[serde(rename = "lastObject")]
    pub object: String,
    pub objects: u64,
    pub objects_failed: u64,
    pub bytes_transferred: u64,
    pub bytes_failed: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyRotationInfo {
    #[serde(rename = "lastBucket")]
    pub bucket: String,
    #[serde(rename = "lastObject")]
    pub object: String,
    pub objects: u64,
    pub objects_failed: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpirationInfo {
    #[serde(rename = "lastBucket")]
    pub bucket: String,
    #[serde(rename = "lastObject")]
    pub object: String,
    pub objects: u64,
    pub objects_failed: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Complete,
    Failed,
}

/// Closed set of job types the display knows how to lay out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Replicate,
    KeyRotate,
    Expire,
    Unknown(String),
}

impl JobKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "replicate" => JobKind::Replicate,
            "keyrotate" => JobKind::KeyRotate,
            "expire" => JobKind::Expire,
            other => JobKind::Unknown(other.to_string()),
        }
    }
}

impl JobMetric {
    pub fn kind(&self) -> JobKind {
        JobKind::from_tag(&self.job_type)
    }

    /// Terminal outcome, if any. A snapshot claiming both flags is reported
    /// as failed.
    pub fn outcome(&self) -> Option<JobOutcome> {
        if self.failed {
            Some(JobOutcome::Failed)
        } else if self.complete {
            Some(JobOutcome::Complete)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Time between the job start and its latest metric update.
    pub fn elapsed(&self) -> Duration {
        self.last_update - self.start_time
    }
}

/// Result of looking a job up in one feed message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedLookup<'a> {
    /// The message has no batch job section at all.
    NoAggregation,
    /// Batch jobs are reported, but not this one.
    JobMissing,
    Found(&'a JobMetric),
}

impl RealtimeMetrics {
    pub fn lookup(&self, job_id: &JobId) -> FeedLookup<'_> {
        match &self.aggregated.batch_jobs {
            None => FeedLookup::NoAggregation,
            Some(batch) => match batch.jobs.get(job_id.as_str()) {
                Some(job) => FeedLookup::Found(job),
                None => FeedLookup::JobMissing,
            },
        }
    }

    /// Builds a single-job message, mostly useful for tests and fakes.
    pub fn with_job(job_id: &JobId, job: JobMetric) -> Self {
        let mut jobs = BTreeMap::new();
        jobs.insert(job_id.clone(), job);
        Self {
            aggregated: Aggregated {
                batch_jobs: Some(BatchJobMetrics {
                    collected_at: Utc::now(),
                    jobs,
                    extra: BTreeMap::new(),
                }),
                ..Aggregated::default()
            },
            ..Self::default()
        }
    }
}
