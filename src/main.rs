//! Binary entrypoint for the photo carousel.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use photo_carousel::config::{API_KEY_ENV, Configuration};
use photo_carousel::events::{CarouselCommand, CarouselSnapshot, ImagesLoaded};
use photo_carousel::tasks;

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "photo-carousel", about = "Self-advancing photo carousel")]
struct Cli {
    /// Path to YAML config file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the advance interval (ms)
    #[arg(long, value_name = "MILLIS")]
    interval_ms: Option<u64>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("photo_carousel={level}").parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);
    fmt().with_env_filter(filter).with_target(false).compact().init();
    Ok(())
}

fn parse_console_line(line: &str) -> Option<ConsoleInput> {
    match line.trim().to_ascii_lowercase().as_str() {
        "n" | "next" => Some(ConsoleInput::Command(CarouselCommand::Next)),
        "p" | "prev" | "previous" => Some(ConsoleInput::Command(CarouselCommand::Previous)),
        "t" | "toggle" => Some(ConsoleInput::Command(CarouselCommand::TogglePlay)),
        "q" | "quit" => Some(ConsoleInput::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleInput {
    Command(CarouselCommand),
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(ms) = cli.interval_ms {
        cfg.advance_interval = Duration::from_millis(ms);
    }
    let cfg = cfg.validated().context("validating configuration")?;

    // The key is resolved here and injected; tasks never read the
    // environment themselves.
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .or_else(|| cfg.api_key.clone());

    info!(
        interval = %humantime::format_duration(cfg.advance_interval),
        page_size = cfg.page_size,
        "starting carousel (commands: n/p/t/q)"
    );

    // Channels (small/bounded); the watch channel is the read-only state
    // surface for presentation subscribers.
    let (loaded_tx, loaded_rx) = mpsc::channel::<ImagesLoaded>(1); // Fetch -> Carousel
    let (command_tx, command_rx) = mpsc::channel::<CarouselCommand>(16); // Control -> Carousel
    let (snapshot_tx, snapshot_rx) = watch::channel(CarouselSnapshot::default()); // Carousel -> Display

    let cancel = CancellationToken::new();

    // Ctrl-C cancels the pipeline
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; shutting down");
            cancel.cancel();
        });
    }

    // SIGUSR1 toggles play/pause
    #[cfg(unix)]
    {
        let cancel = cancel.clone();
        let commands = command_tx.clone();
        tokio::spawn(async move {
            match signal(SignalKind::user_defined1()) {
                Ok(mut sigusr1) => loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        received = sigusr1.recv() => {
                            if received.is_none() {
                                break;
                            }
                            info!("SIGUSR1 received; toggling play/pause");
                            if commands.send(CarouselCommand::TogglePlay).await.is_err() {
                                break;
                            }
                        }
                    }
                },
                Err(err) => warn!("failed to register SIGUSR1 handler: {err}"),
            }
        });
    }

    // Console control surface: one command per line
    {
        let cancel = cancel.clone();
        let commands = command_tx.clone();
        tokio::spawn(async move {
            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => match parse_console_line(&line) {
                            Some(ConsoleInput::Command(cmd)) => {
                                if commands.send(cmd).await.is_err() {
                                    break;
                                }
                            }
                            Some(ConsoleInput::Quit) => {
                                info!("quit requested; shutting down");
                                cancel.cancel();
                                break;
                            }
                            None => {
                                if !line.trim().is_empty() {
                                    warn!(input = line.trim(), "unrecognized command (use n/p/t/q)");
                                }
                            }
                        },
                        Ok(None) => {
                            info!("stdin closed; console controls disabled");
                            break;
                        }
                        Err(err) => {
                            warn!("stdin watcher failed: {err}");
                            break;
                        }
                    }
                }
            }
        });
    }

    let mut workers = JoinSet::new();

    // Loader: one fetch, then done
    workers.spawn({
        let cfg = cfg.clone();
        let loaded_tx = loaded_tx.clone();
        let cancel = cancel.clone();
        async move {
            tasks::fetch::run(cfg, api_key, loaded_tx, cancel)
                .await
                .context("fetch task failed")
        }
    });

    // Carousel controller
    workers.spawn({
        let period = cfg.advance_interval;
        let cancel = cancel.clone();
        async move {
            tasks::carousel::run(loaded_rx, command_rx, snapshot_tx, period, cancel)
                .await
                .context("carousel task failed")
        }
    });

    // Display consumer
    workers.spawn({
        let cancel = cancel.clone();
        async move {
            tasks::display::run(snapshot_rx, cancel)
                .await
                .context("display task failed")
        }
    });

    drop(loaded_tx);
    drop(command_tx);

    // Drain the JoinSet (wait for tasks to complete)
    while let Some(res) = workers.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}
