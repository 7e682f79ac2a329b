use std::fmt;

use thiserror::Error;

/// Admin API error code for a job id the server has no active record of.
pub const NO_SUCH_JOB_CODE: &str = "XMinioAdminNoSuchJob";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AdminError {
    pub kind: AdminErrorKind,
    pub message: String,
}

impl AdminError {
    pub fn new(kind: AdminErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(AdminErrorKind::Cancelled, "operation cancelled")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == AdminErrorKind::Cancelled
    }

    pub fn is_no_such_job(&self) -> bool {
        self.kind == AdminErrorKind::NoSuchJob
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminErrorKind {
    InvalidEndpoint,
    NoSuchJob,
    /// Error response carrying an admin API error code.
    Api { status: u16, code: String },
    /// Error response without a decodable body.
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    /// The stream ended without the server marking the last message final.
    UnexpectedEof,
    Cancelled,
}

impl fmt::Display for AdminErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminErrorKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            AdminErrorKind::NoSuchJob => write!(f, "no such job"),
            AdminErrorKind::Api { status, code } => write!(f, "{code} (http status {status})"),
            AdminErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            AdminErrorKind::Timeout => write!(f, "timeout"),
            AdminErrorKind::Network => write!(f, "network error"),
            AdminErrorKind::Decode => write!(f, "malformed response"),
            AdminErrorKind::UnexpectedEof => write!(f, "unexpected end of stream"),
            AdminErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Fatal monitor failures, scoped to the operation and target they hit.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Unable to lookup job status on {target}")]
    Describe {
        target: String,
        #[source]
        source: AdminError,
    },
    #[error("Unable to get current batch status on {target}")]
    Subscribe {
        target: String,
        #[source]
        source: AdminError,
    },
}
