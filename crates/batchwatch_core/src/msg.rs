use crate::RealtimeMetrics;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User pressed Ctrl-C.
    Interrupt,
    /// One tick of the metrics feed, forwarded unfiltered.
    Metrics(Box<RealtimeMetrics>),
    /// Local animation timer; independent of the feed cadence.
    SpinnerTick,
    /// The feed ended and no producer is left; freeze the current frame.
    FeedClosed,
}
