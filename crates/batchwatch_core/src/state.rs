use crate::view_model::{self, MonitorViewModel, SPINNER_FRAMES};
use crate::{JobId, JobMetric};

/// Everything the live display knows about the monitored job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    job_id: JobId,
    current: JobMetric,
    quitting: bool,
    spinner_phase: usize,
    dirty: bool,
}

impl MonitorState {
    /// Starts dirty so the first frame is drawn before any tick arrives.
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            current: JobMetric::default(),
            quitting: false,
            spinner_phase: 0,
            dirty: true,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn current(&self) -> &JobMetric {
        &self.current
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn spinner_phase(&self) -> usize {
        self.spinner_phase
    }

    pub fn view(&self) -> MonitorViewModel {
        view_model::project(self)
    }

    /// Returns whether a redraw is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn replace_snapshot(&mut self, job: JobMetric) {
        self.current = job;
        self.dirty = true;
    }

    pub(crate) fn quit(&mut self) {
        self.quitting = true;
        self.dirty = true;
    }

    pub(crate) fn advance_spinner(&mut self) {
        self.spinner_phase = (self.spinner_phase + 1) % SPINNER_FRAMES.len();
        self.dirty = true;
    }
}
