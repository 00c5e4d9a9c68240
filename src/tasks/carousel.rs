pub mod state;

use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio::sync::watch;
use tokio::time::{self, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::events::{CarouselCommand, CarouselSnapshot, ImagesLoaded};
use state::Carousel;

fn arm(period: Duration) -> Interval {
    // First fire one full period after arming, never immediately.
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Arms or releases the advance timer to match the state machine. An armed
/// timer is left running across cursor moves; only a should-tick flip
/// touches it, so pause/resume restarts the full period and manual
/// navigation does not.
fn sync_ticker(ticker: &mut Option<Interval>, carousel: &Carousel, period: Duration) {
    if carousel.should_tick() {
        if ticker.is_none() {
            debug!(period = %humantime::format_duration(period), "advance timer armed");
            *ticker = Some(arm(period));
        }
    } else if ticker.take().is_some() {
        debug!("advance timer released");
    }
}

fn apply_command(carousel: &mut Carousel, cmd: CarouselCommand) {
    match cmd {
        CarouselCommand::Next => {
            if let Some(idx) = carousel.advance() {
                debug!(index = idx, "manual advance");
            } else {
                debug!("next ignored: no photos loaded");
            }
        }
        CarouselCommand::Previous => {
            if let Some(idx) = carousel.previous() {
                debug!(index = idx, "manual step back");
            } else {
                debug!("previous ignored: no photos loaded");
            }
        }
        CarouselCommand::TogglePlay => {
            let playing = carousel.toggle_play();
            info!(playing, "play state toggled");
        }
    }
}

/// Drives the carousel: applies commands and load results to the state
/// machine, owns the advance timer, and publishes a snapshot after every
/// change.
///
/// Timer rules: at most one interval is alive, armed exactly while the
/// state machine reports `should_tick()`, and dropped on cancellation.
pub async fn run(
    mut loaded_rx: Receiver<ImagesLoaded>,
    mut command_rx: Receiver<CarouselCommand>,
    snapshots: watch::Sender<CarouselSnapshot>,
    period: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    let mut carousel = Carousel::new();
    let mut ticker: Option<Interval> = None;
    let mut loads_open = true;
    let mut commands_open = true;

    let _ = snapshots.send(carousel.snapshot());

    loop {
        select! {
            _ = cancel.cancelled() => break,

            _ = next_tick(&mut ticker) => {
                if let Some(idx) = carousel.advance() {
                    debug!(index = idx, "timer advance");
                    let _ = snapshots.send(carousel.snapshot());
                }
            }

            maybe_loaded = loaded_rx.recv(), if loads_open => {
                match maybe_loaded {
                    Some(ImagesLoaded(items)) => {
                        info!(count = items.len(), "photo list replaced");
                        carousel.replace_items(items);
                        sync_ticker(&mut ticker, &carousel, period);
                        let _ = snapshots.send(carousel.snapshot());
                    }
                    None => {
                        // Fetch side finished; keep rotating what we have.
                        loads_open = false;
                    }
                }
            }

            maybe_cmd = command_rx.recv(), if commands_open => {
                match maybe_cmd {
                    Some(cmd) => {
                        apply_command(&mut carousel, cmd);
                        sync_ticker(&mut ticker, &carousel, period);
                        let _ = snapshots.send(carousel.snapshot());
                    }
                    None => {
                        debug!("command channel closed");
                        commands_open = false;
                    }
                }
            }
        }
    }

    // Teardown: the interval drops with the task on every exit path.
    debug!("carousel task stopped");
    Ok(())
}
