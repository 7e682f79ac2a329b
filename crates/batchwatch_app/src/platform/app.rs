use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use batchwatch_core::{update, JobId, MonitorState, Msg, StopReason};
use batchwatch_engine::{Cancellation, Monitor, MonitorError, ReqwestAdminClient, Resolution};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use watch_logging::{watch_error, watch_info, watch_warn};

use super::cli::Cli;
use super::config;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui::render::render;
use super::ui::terminal::LiveFrame;
use super::ui::theme::Theme;

const HISTORY_NOTICE: &str =
    "Unable to find an active job, attempting to list from previously run jobs";

/// Spinner cadence, independent of the one-second metrics feed.
const SPINNER_INTERVAL: Duration = Duration::from_millis(1000 / 7);

pub(crate) async fn run(cli: Cli) -> ExitCode {
    let destination = match &cli.log_file {
        Some(path) => LogDestination::File(path.clone()),
        None => LogDestination::Terminal,
    };
    logging::initialize(&destination, cli.debug);

    match run_monitor(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let LogDestination::File(_) = destination {
                watch_error!("{:#}", err);
            }
            eprintln!("batchwatch: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_monitor(cli: Cli) -> anyhow::Result<()> {
    let config = config::load(cli.config.as_deref()).context("Unable to load configuration")?;
    let settings = config
        .resolve_target(&cli.target)
        .with_context(|| format!("Unable to initialize admin client for {}", cli.target))?;
    let client = ReqwestAdminClient::new(settings)
        .with_context(|| format!("Unable to initialize admin client for {}", cli.target))?;
    let monitor = Monitor::new(Arc::new(client), cli.target.as_str(), JobId::new(cli.job_id.as_str()));

    let resolution = monitor.resolve().await?;
    announce_resolution(&mut io::stdout(), resolution, cli.json)
        .context("Unable to write to stdout")?;

    if cli.json {
        run_structured(&monitor).await?;
    } else {
        let theme = Theme::new(!cli.no_color && io::stdout().is_terminal());
        run_interactive(&monitor, theme).await?;
    }

    let reason = monitor.cancellation().reason();
    match monitor.store().latest() {
        Some(job) => watch_info!(
            "Stopped watching job {} ({:?}): complete={} failed={}",
            monitor.job_id(),
            reason,
            job.complete,
            job.failed
        ),
        None => watch_info!("Stopped watching job {} ({:?})", monitor.job_id(), reason),
    }
    Ok(())
}

async fn run_structured(monitor: &Monitor) -> anyhow::Result<()> {
    let interrupt = spawn_interrupt_cancel(monitor.cancellation());
    let result = monitor.run_structured(io::stdout()).await;
    monitor.shutdown();
    let _ = interrupt.await;
    result?;
    Ok(())
}

/// Prints the history notice for a job with no active record. Structured
/// output stays pure JSON, so it gets no notice.
fn announce_resolution<W: Write>(
    out: &mut W,
    resolution: Resolution,
    structured: bool,
) -> io::Result<()> {
    if resolution == Resolution::Historical && !structured {
        writeln!(out, "{HISTORY_NOTICE}")?;
        out.flush()?;
    }
    Ok(())
}

async fn run_interactive(monitor: &Monitor, theme: Theme) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::unbounded_channel::<Msg>();
    let spinner = spawn_spinner(msg_tx.clone(), monitor.cancellation());
    let interrupt = spawn_interrupt_msg(msg_tx.clone(), monitor.cancellation());

    let mut frame = LiveFrame::new(io::stdout());
    let outcome = run_display(monitor, msg_tx, msg_rx, &mut frame, &theme).await;

    for (name, task) in [("spinner", spinner), ("interrupt listener", interrupt)] {
        if let Err(err) = task.await {
            watch_warn!("The {} task failed: {}", name, err);
        }
    }
    outcome.map(|_| ())
}

/// Drives the display until it quits, then tears the feed down and waits
/// for it. Returns the final state.
///
/// `msg_tx` is handed to the feed; other producers hold their own clones.
/// Once every producer is gone the feed's own result decides how the frame
/// ends.
async fn run_display<W: Write>(
    monitor: &Monitor,
    msg_tx: mpsc::UnboundedSender<Msg>,
    mut msg_rx: mpsc::UnboundedReceiver<Msg>,
    frame: &mut LiveFrame<W>,
    theme: &Theme,
) -> anyhow::Result<MonitorState> {
    let mut feed = monitor.spawn_display_feed(msg_tx);
    let effects = EffectRunner::new(monitor.cancellation());
    let mut state = MonitorState::new(monitor.job_id().clone());
    let mut feed_done = false;

    let outcome: anyhow::Result<()> = match redraw(&mut state, frame, theme) {
        Err(err) => Err(err.into()),
        Ok(()) => loop {
            tokio::select! {
                biased;
                msg = msg_rx.recv() => {
                    let msg = match msg {
                        Some(msg) => msg,
                        None => {
                            if !feed_done {
                                feed_done = true;
                                if let Err(err) = feed_result((&mut feed).await) {
                                    break Err(err);
                                }
                            }
                            Msg::FeedClosed
                        }
                    };
                    let (next, fx) = update(state, msg);
                    state = next;
                    if let Err(err) = redraw(&mut state, frame, theme) {
                        break Err(err.into());
                    }
                    if effects.apply(fx).is_some() {
                        break Ok(());
                    }
                }
                joined = &mut feed, if !feed_done => {
                    feed_done = true;
                    // Ticks routed before the feed stopped are still queued.
                    if let Err(err) = feed_result(joined) {
                        break Err(err);
                    }
                }
            }
        },
    };

    monitor.shutdown();
    let restored = frame.finish();
    if !feed_done {
        if let Err(err) = feed_result(feed.await) {
            watch_warn!("Metrics feed failed during shutdown: {:#}", err);
        }
    }
    outcome?;
    restored.context("Unable to restore the terminal")?;
    Ok(state)
}

fn feed_result(joined: Result<Result<(), MonitorError>, JoinError>) -> anyhow::Result<()> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.into()),
        Err(err) => Err(anyhow!("metrics feed task failed: {err}")),
    }
}

fn redraw<W: Write>(
    state: &mut MonitorState,
    frame: &mut LiveFrame<W>,
    theme: &Theme,
) -> io::Result<()> {
    if state.consume_dirty() {
        frame.draw(&render(&state.view(), theme))?;
    }
    Ok(())
}

fn spawn_spinner(tx: mpsc::UnboundedSender<Msg>, cancel: Cancellation) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SPINNER_INTERVAL);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if tx.send(Msg::SpinnerTick).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn spawn_interrupt_msg(tx: mpsc::UnboundedSender<Msg>, cancel: Cancellation) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    let _ = tx.send(Msg::Interrupt);
                }
                Err(err) => watch_warn!("Unable to listen for Ctrl-C: {}", err),
            },
        }
    })
}

fn spawn_interrupt_cancel(cancel: Cancellation) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    cancel.cancel(StopReason::Interrupted);
                }
                Err(err) => watch_warn!("Unable to listen for Ctrl-C: {}", err),
            },
        }
    })
}
