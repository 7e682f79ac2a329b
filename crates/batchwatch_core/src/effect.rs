use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The display loop should stop after drawing the current frame.
    Quit { reason: StopReason },
}

/// Why the monitor stopped. Shared by the display loop and the feed
/// cancellation so both sides log the same vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The user asked to quit.
    Interrupted,
    /// A tick arrived without any batch-job aggregation.
    FeedAbsent,
    /// The aggregation no longer lists the job.
    JobVanished,
    JobComplete,
    JobFailed,
    /// The feed ended on its own.
    FeedClosed,
    /// The caller tore the monitor down on the way out.
    Shutdown,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Interrupted => write!(f, "interrupted"),
            StopReason::FeedAbsent => write!(f, "no batch job metrics available"),
            StopReason::JobVanished => write!(f, "job no longer reported"),
            StopReason::JobComplete => write!(f, "job complete"),
            StopReason::JobFailed => write!(f, "job failed"),
            StopReason::FeedClosed => write!(f, "metrics feed closed"),
            StopReason::Shutdown => write!(f, "shutdown"),
        }
    }
}
