use std::sync::{Arc, OnceLock};

use batchwatch_core::StopReason;
use tokio_util::sync::CancellationToken;
use watch_logging::watch_debug;

/// One-way stop signal shared by the feed and the renderer.
///
/// The first reason passed to [`Cancellation::cancel`] is kept; later calls
/// are no-ops apart from returning `false`.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
    reason: Arc<OnceLock<StopReason>>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the signal. Returns `true` for the call that actually tripped it.
    pub fn cancel(&self, reason: StopReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        self.token.cancel();
        if first {
            watch_debug!("monitor cancelled: {}", reason);
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn reason(&self) -> Option<StopReason> {
        self.reason.get().copied()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
