use std::io::Write;
use std::sync::{Mutex, PoisonError};

use batchwatch_core::RealtimeMetrics;
use watch_logging::watch_error;

use crate::subscriber::{SnapshotRoute, Tick};
use crate::Cancellation;

/// Writes one JSON line per snapshot tick, flushed immediately.
pub struct StructuredEmitter<W> {
    out: Mutex<W>,
    cancel: Cancellation,
}

impl<W: Write + Send> StructuredEmitter<W> {
    pub fn new(out: W, cancel: Cancellation) -> Self {
        Self {
            out: Mutex::new(out),
            cancel,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, metrics: &RealtimeMetrics) -> std::io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *out, metrics)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

impl<W: Write + Send> SnapshotRoute for StructuredEmitter<W> {
    fn route(&self, metrics: &RealtimeMetrics, tick: Tick) {
        if self.cancel.is_cancelled() {
            return;
        }
        if let Tick::Snapshot { .. } = tick {
            if let Err(err) = self.emit(metrics) {
                watch_error!("Failed to write metrics record: {}", err);
            }
        }
    }
}
