mod support;

use std::sync::Arc;
use std::time::Duration;

use batchwatch_core::{RealtimeMetrics, StopReason};
use batchwatch_engine::{AdminError, AdminErrorKind, Monitor, MonitorError, Resolution};
use pretty_assertions::assert_eq;
use serde_json::Value;

use support::{
    completed, failed, init_logging, job_id, no_such_job, running, tick, FeedEnd, ScriptedAdmin,
    TARGET,
};

fn records(out: Vec<u8>) -> Vec<Value> {
    String::from_utf8(out)
        .expect("utf-8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("one JSON record per line"))
        .collect()
}

fn objects(record: &Value) -> u64 {
    record["aggregated"]["batchJobs"]["jobs"][job_id().as_str()]["replicate"]["objects"]
        .as_u64()
        .expect("objects counter")
}

#[tokio::test]
async fn emits_one_record_per_tick_through_the_terminal_one() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(
        vec![
            tick(running(1)),
            tick(running(2)),
            tick(completed(3)),
            tick(running(4)),
        ],
        FeedEnd::Hang,
    ));
    let monitor = Monitor::new(admin.clone(), TARGET, job_id());

    let out = monitor.run_structured(Vec::new()).await.expect("clean exit");

    let records = records(out);
    assert_eq!(records.iter().map(objects).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(records[2]["aggregated"]["batchJobs"]["jobs"][job_id().as_str()]["complete"], true);
    assert_eq!(admin.delivered(), 3);
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::JobComplete));
    assert_eq!(monitor.store().latest().map(|job| job.complete), Some(true));
}

#[tokio::test]
async fn failed_job_stops_after_its_record() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(
        vec![tick(running(1)), tick(failed(1)), tick(running(2))],
        FeedEnd::Hang,
    ));
    let monitor = Monitor::new(admin, TARGET, job_id());

    let out = monitor.run_structured(Vec::new()).await.expect("clean exit");

    assert_eq!(records(out).len(), 2);
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::JobFailed));
}

#[tokio::test]
async fn missing_aggregation_terminates_without_output() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(
        vec![RealtimeMetrics::default(), tick(running(1))],
        FeedEnd::Hang,
    ));
    let monitor = Monitor::new(admin.clone(), TARGET, job_id());

    let out = monitor.run_structured(Vec::new()).await.expect("not an error");

    assert!(out.is_empty());
    assert_eq!(admin.delivered(), 1);
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::FeedAbsent));
    assert!(monitor.store().latest().is_none());
}

#[tokio::test]
async fn vanished_job_terminates_after_previous_records() {
    init_logging();
    let mut vanished = tick(running(2));
    if let Some(batch) = vanished.aggregated.batch_jobs.as_mut() {
        batch.jobs.clear();
    }
    let admin = Arc::new(ScriptedAdmin::new(
        vec![tick(running(1)), vanished],
        FeedEnd::Hang,
    ));
    let monitor = Monitor::new(admin, TARGET, job_id());

    let out = monitor.run_structured(Vec::new()).await.expect("not an error");

    assert_eq!(records(out).len(), 1);
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::JobVanished));
    // The last delivered snapshot stays visible.
    assert_eq!(
        monitor.store().latest().and_then(|job| job.replicate.clone()).map(|r| r.objects),
        Some(1)
    );
}

#[tokio::test]
async fn transport_failure_is_fatal_and_names_the_target() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(
        vec![tick(running(1))],
        FeedEnd::Fail(AdminError::new(AdminErrorKind::Network, "connection reset")),
    ));
    let monitor = Monitor::new(admin, TARGET, job_id());

    let err = monitor.run_structured(Vec::new()).await.unwrap_err();

    match err {
        MonitorError::Subscribe { target, source } => {
            assert_eq!(target, TARGET);
            assert_eq!(source.kind, AdminErrorKind::Network);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn outside_cancel_is_a_clean_exit() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(vec![tick(running(1))], FeedEnd::Hang));
    let monitor = Monitor::new(admin, TARGET, job_id());
    let cancel = monitor.cancellation();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel(StopReason::Interrupted);
    });

    let out = monitor.run_structured(Vec::new()).await.expect("cancel is not an error");

    assert_eq!(records(out).len(), 1);
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::Interrupted));
}

#[tokio::test]
async fn server_closing_the_feed_trips_cancellation() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(vec![tick(running(1))], FeedEnd::Close));
    let monitor = Monitor::new(admin, TARGET, job_id());

    monitor.run_structured(Vec::new()).await.expect("clean exit");

    assert_eq!(monitor.cancellation().reason(), Some(StopReason::FeedClosed));
}

#[tokio::test]
async fn historical_job_still_reports_its_final_snapshot() {
    init_logging();
    let admin = Arc::new(
        ScriptedAdmin::new(vec![tick(completed(7))], FeedEnd::Hang).with_describe(Err(no_such_job())),
    );
    let monitor = Monitor::new(admin, TARGET, job_id());

    assert_eq!(monitor.resolve().await.expect("not fatal"), Resolution::Historical);
    let out = monitor.run_structured(Vec::new()).await.expect("clean exit");

    let records = records(out);
    assert_eq!(records.len(), 1);
    assert_eq!(objects(&records[0]), 7);
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::JobComplete));
}

#[tokio::test]
async fn feed_is_filtered_to_the_job_once_per_second() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(vec![tick(completed(1))], FeedEnd::Hang));
    let monitor = Monitor::new(admin.clone(), TARGET, job_id());

    monitor.run_structured(Vec::new()).await.expect("clean exit");

    let options = admin.options.lock().unwrap().clone().expect("feed opened");
    assert_eq!(options.by_job_id, Some(job_id()));
    assert_eq!(options.interval, Duration::from_secs(1));
    assert_eq!(options.kind.type_bits(), 8);
}
