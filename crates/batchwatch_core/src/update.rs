use crate::{Effect, FeedLookup, JobOutcome, MonitorState, Msg, StopReason};

/// Pure update function: applies a message to state and returns any effects.
///
/// Once the state is quitting every further message is dropped, so the last
/// drawn frame stays the final one.
pub fn update(mut state: MonitorState, msg: Msg) -> (MonitorState, Vec<Effect>) {
    if state.is_quitting() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Interrupt => quit(&mut state, StopReason::Interrupted),
        Msg::Metrics(metrics) => {
            let job_id = state.job_id().clone();
            match metrics.lookup(&job_id) {
                FeedLookup::NoAggregation => quit(&mut state, StopReason::FeedAbsent),
                FeedLookup::JobMissing => quit(&mut state, StopReason::JobVanished),
                FeedLookup::Found(job) => {
                    let outcome = job.outcome();
                    state.replace_snapshot(job.clone());
                    match outcome {
                        Some(JobOutcome::Complete) => quit(&mut state, StopReason::JobComplete),
                        Some(JobOutcome::Failed) => quit(&mut state, StopReason::JobFailed),
                        None => Vec::new(),
                    }
                }
            }
        }
        Msg::SpinnerTick => {
            state.advance_spinner();
            Vec::new()
        }
        Msg::FeedClosed => quit(&mut state, StopReason::FeedClosed),
    };

    (state, effects)
}

fn quit(state: &mut MonitorState, reason: StopReason) -> Vec<Effect> {
    state.quit();
    vec![Effect::Quit { reason }]
}
