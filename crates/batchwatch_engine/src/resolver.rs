use batchwatch_core::JobId;
use watch_logging::{watch_debug, watch_info};

use crate::admin::AdminApi;
use crate::MonitorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The server describes the job as currently running.
    Active,
    /// Not active; the feed may still report it from recent history.
    Historical,
}

/// Checks whether the job is active. "No such job" is not fatal.
pub async fn resolve_job(
    api: &dyn AdminApi,
    target: &str,
    job_id: &JobId,
) -> Result<Resolution, MonitorError> {
    match api.describe_job(job_id).await {
        Ok(description) => {
            watch_debug!(
                "job {} is active ({} bytes of description)",
                job_id,
                description.raw.len()
            );
            Ok(Resolution::Active)
        }
        Err(err) if err.is_no_such_job() => {
            watch_info!("job {} has no active record on {}", job_id, target);
            Ok(Resolution::Historical)
        }
        Err(source) => Err(MonitorError::Describe {
            target: target.to_string(),
            source,
        }),
    }
}
