use crate::{format_elapsed, format_iec_bytes, JobKind, JobMetric, JobOutcome, MonitorState};

/// Frames of the running indicator, advanced by `Msg::SpinnerTick`.
pub const SPINNER_FRAMES: [&str; 4] = ["∙∙∙", "●∙∙", "∙●∙", "∙∙●"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Spinner { frame: &'static str },
    Success,
    Failure,
    /// Quit before the job reached a terminal state.
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorViewModel {
    pub header: Header,
    pub rows: Vec<RowView>,
    /// Separates the final frame from whatever the shell prints next.
    pub trailing_blank: bool,
}

/// Per-second rates derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub bytes_per_sec: f64,
    pub objects_per_sec: f64,
}

/// Rates for a replication snapshot; `None` until some time has elapsed.
pub fn throughput(job: &JobMetric) -> Option<Throughput> {
    let secs = elapsed_secs(job)?;
    let replicate = job.replicate.clone().unwrap_or_default();
    Some(Throughput {
        bytes_per_sec: replicate.bytes_transferred as f64 / secs,
        objects_per_sec: replicate.objects as f64 / secs,
    })
}

pub(crate) fn project(state: &MonitorState) -> MonitorViewModel {
    let job = state.current();
    let header = if !state.is_quitting() {
        Header::Spinner {
            frame: SPINNER_FRAMES[state.spinner_phase() % SPINNER_FRAMES.len()],
        }
    } else {
        match job.outcome() {
            Some(JobOutcome::Complete) => Header::Success,
            Some(JobOutcome::Failed) => Header::Failure,
            None => Header::Blank,
        }
    };

    let rows = match job.kind() {
        JobKind::Replicate => replicate_rows(job),
        JobKind::KeyRotate => {
            let info = job.key_rotate.clone().unwrap_or_default();
            counter_rows(job, info.objects, info.objects_failed, info.object)
        }
        JobKind::Expire => {
            let info = job.expired.clone().unwrap_or_default();
            counter_rows(job, info.objects, info.objects_failed, info.object)
        }
        JobKind::Unknown(_) => Vec::new(),
    };

    MonitorViewModel {
        header,
        rows,
        trailing_blank: state.is_quitting(),
    }
}

fn replicate_rows(job: &JobMetric) -> Vec<RowView> {
    let info = job.replicate.clone().unwrap_or_default();
    let mut rows = vec![
        row("JobType:", job.job_type.clone()),
        row("Objects:", info.objects.to_string()),
        // The feed has no separate version counter; every replicated version
        // is counted as an object.
        row("Versions:", info.objects.to_string()),
        row("FailedObjects:", info.objects_failed.to_string()),
    ];
    if let Some(rate) = throughput(job) {
        rows.push(row(
            "Throughput:",
            format!("{}/s", format_iec_bytes(rate.bytes_per_sec as u64)),
        ));
        rows.push(row("IOPs:", format!("{:.2} objs/s", rate.objects_per_sec)));
    }
    rows.push(row("Transferred:", format_iec_bytes(info.bytes_transferred)));
    rows.push(row("Elapsed:", format_elapsed(job.elapsed())));
    rows.push(row("CurrObjName:", info.object));
    rows
}

fn counter_rows(job: &JobMetric, objects: u64, failed: u64, object: String) -> Vec<RowView> {
    let mut rows = vec![
        row("JobType:", job.job_type.clone()),
        row("Objects:", objects.to_string()),
        row("FailedObjects:", failed.to_string()),
    ];
    if let Some(secs) = elapsed_secs(job) {
        rows.push(row("IOPs:", format!("{:.2} objs/s", objects as f64 / secs)));
    }
    rows.push(row("Elapsed:", format_elapsed(job.elapsed())));
    rows.push(row("CurrObjName:", object));
    rows
}

fn elapsed_secs(job: &JobMetric) -> Option<f64> {
    let elapsed = job.elapsed();
    let secs = match elapsed.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => elapsed.num_milliseconds() as f64 / 1e3,
    };
    (secs > 0.0).then_some(secs)
}

fn row(label: &'static str, value: String) -> RowView {
    RowView { label, value }
}
