use batchwatch_core::{Effect, StopReason};
use batchwatch_engine::Cancellation;
use watch_logging::watch_info;

/// Applies display effects to the outside world.
pub(crate) struct EffectRunner {
    cancel: Cancellation,
}

impl EffectRunner {
    pub(crate) fn new(cancel: Cancellation) -> Self {
        Self { cancel }
    }

    /// Returns the stop reason when the display loop should end.
    pub(crate) fn apply(&self, effects: Vec<Effect>) -> Option<StopReason> {
        let mut stop = None;
        for effect in effects {
            match effect {
                Effect::Quit { reason } => {
                    watch_info!("Display quitting: {}", reason);
                    self.cancel.cancel(reason);
                    stop.get_or_insert(reason);
                }
            }
        }
        stop
    }
}
