use std::time::Duration;

use batchwatch_core::{JobId, RealtimeMetrics};
use futures_util::StreamExt;
use reqwest::{Response, Url};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use watch_logging::{watch_debug, watch_trace};

use crate::admin::{AdminApi, JobDescription, MetricsOptions, MetricsSink};
use crate::{AdminError, AdminErrorKind, NO_SUCH_JOB_CODE};

const ADMIN_PREFIX: &str = "minio/admin/v3/";

#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub endpoint: Url,
    pub connect_timeout: Duration,
    /// Longest metrics line accepted before the feed is treated as corrupt.
    pub max_line_bytes: usize,
}

impl AdminSettings {
    pub fn new(endpoint: &str) -> Result<Self, AdminError> {
        let mut endpoint = Url::parse(endpoint)
            .map_err(|err| AdminError::new(AdminErrorKind::InvalidEndpoint, err.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AdminError::new(
                AdminErrorKind::InvalidEndpoint,
                format!("unsupported scheme {}", endpoint.scheme()),
            ));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        Ok(Self {
            endpoint,
            connect_timeout: Duration::from_secs(10),
            max_line_bytes: 8 * 1024 * 1024,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// Admin API client over plain HTTP(S). Requests are sent unsigned.
#[derive(Debug, Clone)]
pub struct ReqwestAdminClient {
    settings: AdminSettings,
    client: reqwest::Client,
}

impl ReqwestAdminClient {
    pub fn new(settings: AdminSettings) -> Result<Self, AdminError> {
        // No overall request timeout: the metrics feed is long-lived.
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| AdminError::new(AdminErrorKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn admin_url(&self, api: &str, query: &[(&str, String)]) -> Result<Url, AdminError> {
        let mut url = self
            .settings
            .endpoint
            .join(ADMIN_PREFIX)
            .and_then(|base| base.join(api))
            .map_err(|err| AdminError::new(AdminErrorKind::InvalidEndpoint, err.to_string()))?;
        url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }
}

#[async_trait::async_trait]
impl AdminApi for ReqwestAdminClient {
    async fn describe_job(&self, job_id: &JobId) -> Result<JobDescription, AdminError> {
        let url = self.admin_url("describe-job", &[("jobId", job_id.to_string())])?;
        watch_debug!("describe-job GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let raw = response.text().await.map_err(map_reqwest_error)?;
        Ok(JobDescription { raw })
    }

    async fn metrics(
        &self,
        options: &MetricsOptions,
        sink: &dyn MetricsSink,
        cancel: &CancellationToken,
    ) -> Result<(), AdminError> {
        let mut query = vec![
            ("types", options.kind.type_bits().to_string()),
            ("interval", format!("{}s", options.interval.as_secs_f64())),
        ];
        if let Some(job_id) = &options.by_job_id {
            query.push(("by-jobID", job_id.to_string()));
        }
        let url = self.admin_url("metrics", &query)?;
        watch_debug!("metrics GET {}", url);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AdminError::cancelled()),
            sent = self.client.get(url).send() => sent.map_err(map_reqwest_error)?,
        };
        let response = check_status(response).await?;

        let max_line = self.settings.max_line_bytes;
        let mut pending: Vec<u8> = Vec::new();
        // Bytes of `pending` already known to hold no newline.
        let mut scanned = 0;
        let mut stream = response.bytes_stream();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AdminError::cancelled()),
                next = stream.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(map_reqwest_error)?;
            pending.extend_from_slice(&chunk);

            while let Some(offset) = pending[scanned..].iter().position(|byte| *byte == b'\n') {
                let newline = scanned + offset;
                check_line_len(newline, max_line)?;
                let line: Vec<u8> = pending.drain(..=newline).collect();
                scanned = 0;
                if let Some(metrics) = decode_line(&line)? {
                    let last = metrics.is_final;
                    sink.deliver(metrics);
                    if last {
                        return Ok(());
                    }
                    if cancel.is_cancelled() {
                        return Err(AdminError::cancelled());
                    }
                }
            }
            scanned = pending.len();
            check_line_len(scanned, max_line)?;
        }

        if let Some(metrics) = decode_line(&pending)? {
            let last = metrics.is_final;
            sink.deliver(metrics);
            if last {
                return Ok(());
            }
        }
        Err(AdminError::new(
            AdminErrorKind::UnexpectedEof,
            "metrics stream ended before the final message",
        ))
    }
}

fn decode_line(line: &[u8]) -> Result<Option<RealtimeMetrics>, AdminError> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    watch_trace!("metrics line {} bytes", line.len());
    serde_json::from_slice(line)
        .map(Some)
        .map_err(|err| AdminError::new(AdminErrorKind::Decode, err.to_string()))
}

fn check_line_len(len: usize, max_line: usize) -> Result<(), AdminError> {
    if len > max_line {
        return Err(AdminError::new(
            AdminErrorKind::Decode,
            format!("metrics line exceeds {max_line} bytes"),
        ));
    }
    Ok(())
}

async fn check_status(response: Response) -> Result<Response, AdminError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(error) if error.code == NO_SUCH_JOB_CODE => {
            Err(AdminError::new(AdminErrorKind::NoSuchJob, error.message))
        }
        Ok(error) => Err(AdminError::new(
            AdminErrorKind::Api {
                status: status.as_u16(),
                code: error.code,
            },
            error.message,
        )),
        Err(_) => Err(AdminError::new(
            AdminErrorKind::HttpStatus(status.as_u16()),
            status.to_string(),
        )),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> AdminError {
    if err.is_timeout() {
        return AdminError::new(AdminErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return AdminError::new(AdminErrorKind::Decode, err.to_string());
    }
    AdminError::new(AdminErrorKind::Network, err.to_string())
}
