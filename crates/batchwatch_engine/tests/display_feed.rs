mod support;

use std::sync::Arc;
use std::time::Duration;

use batchwatch_core::{update, Header, MonitorState, Msg, RealtimeMetrics, StopReason};
use batchwatch_engine::Monitor;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use support::{completed, init_logging, job_id, running, tick, FeedEnd, ScriptedAdmin, TARGET};

async fn drain(mut rx: mpsc::UnboundedReceiver<Msg>) -> Vec<Msg> {
    let mut received = Vec::new();
    while let Some(msg) = rx.recv().await {
        received.push(msg);
    }
    received
}

#[tokio::test]
async fn terminal_snapshot_reaches_the_display_before_teardown() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(
        vec![tick(running(1)), tick(completed(2)), tick(running(3))],
        FeedEnd::Hang,
    ));
    let monitor = Monitor::new(admin, TARGET, job_id());
    let (tx, rx) = mpsc::unbounded_channel();

    let feed = monitor.spawn_display_feed(tx);
    let received = drain(rx).await;
    feed.await.expect("task joined").expect("clean exit");

    assert_eq!(received.len(), 2);
    let mut state = MonitorState::new(job_id());
    let mut quit_reasons = Vec::new();
    for msg in received {
        let (next, effects) = update(state, msg);
        state = next;
        quit_reasons.extend(effects);
    }
    assert_eq!(
        quit_reasons,
        vec![batchwatch_core::Effect::Quit {
            reason: StopReason::JobComplete
        }]
    );
    assert_eq!(state.view().header, Header::Success);
}

#[tokio::test]
async fn absent_aggregation_is_forwarded_so_the_display_quits() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(vec![RealtimeMetrics::default()], FeedEnd::Hang));
    let monitor = Monitor::new(admin, TARGET, job_id());
    let (tx, rx) = mpsc::unbounded_channel();

    let feed = monitor.spawn_display_feed(tx);
    let received = drain(rx).await;
    feed.await.expect("task joined").expect("clean exit");

    let (state, _) = update(
        MonitorState::new(job_id()),
        received.into_iter().next().expect("one message"),
    );
    assert!(state.is_quitting());
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::FeedAbsent));
}

#[tokio::test]
async fn shutdown_stops_a_quiet_feed() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(Vec::new(), FeedEnd::Hang));
    let monitor = Monitor::new(admin, TARGET, job_id());
    let (tx, rx) = mpsc::unbounded_channel();

    let feed = monitor.spawn_display_feed(tx);
    monitor.shutdown();
    monitor.shutdown();

    feed.await.expect("task joined").expect("cancel is not an error");
    assert!(drain(rx).await.is_empty());
    assert_eq!(monitor.cancellation().reason(), Some(StopReason::Shutdown));
}

#[tokio::test]
async fn departed_display_stops_the_feed() {
    init_logging();
    let admin = Arc::new(ScriptedAdmin::new(
        vec![tick(running(1)), tick(running(2))],
        FeedEnd::Hang,
    ));
    let monitor = Monitor::new(admin.clone(), TARGET, job_id());
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    let feed = monitor.spawn_display_feed(tx);
    tokio::time::timeout(Duration::from_secs(5), feed)
        .await
        .expect("feed stops without a display")
        .expect("task joined")
        .expect("clean exit");

    assert_eq!(monitor.cancellation().reason(), Some(StopReason::Shutdown));
    assert_eq!(admin.delivered(), 1);
}
