//! Warclock engine binary.
//!
//! This is the entry point that wires together the scheduler, the
//! dispatch queue, the two periodic drivers, and the command router. It
//! loads configuration, initializes all subsystems, and runs until
//! interrupted.
//!
//! The chat transport is a collaborator this binary does not ship: the
//! outbound sink logs every line, and inbound traffic is read from
//! stdin as `<channel> <nick> <text>` lines so the whole core can be
//! exercised end to end from a terminal.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `warclock-config.yaml`
//! 3. Build the scheduler and seed the channel directory
//! 4. Start the outbound sink task
//! 5. Start the war-clock (1 s) and idle-clock (60 s) drivers
//! 6. Route stdin lines until EOF or Ctrl-C
//! 7. Request a stop and wait for the drivers to exit

mod commands;
mod error;
mod router;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use rand::SeedableRng as _;
use rand::rngs::SmallRng;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use warclock_core::collab::{StubAmusements, StubMarkov, StubSocialPoster};
use warclock_core::config::BotConfig;
use warclock_core::control::RunControl;
use warclock_core::runner;
use warclock_core::scheduler::Scheduler;
use warclock_dispatch::{Dispatcher, TracingSink};

use crate::error::EngineError;
use crate::router::Router;

/// Application entry point for the Warclock engine.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("warclock-engine starting");

    // 2. Load configuration.
    let config = load_config().context("loading configuration")?;
    info!(
        nickname = config.bot.nickname,
        admins = config.bot.admins.len(),
        channels = config.channels.len(),
        war_tick_ms = config.timing.war_tick_ms,
        idle_tick_secs = config.timing.idle_tick_secs,
        "Configuration loaded"
    );

    // 3. Build the scheduler.
    let scheduler = Arc::new(Scheduler::from_config(&config, unix_now_secs()));
    info!("Scheduler initialized");

    // 4. Start the outbound sink.
    let (dispatcher, outbound_rx) = Dispatcher::new();
    let sink_task = tokio::spawn(warclock_dispatch::run_sink(outbound_rx, TracingSink));
    info!("Outbound sink started");

    // 5. Start the periodic drivers.
    let control = Arc::new(RunControl::new());
    let war_clock = tokio::spawn(runner::run_war_clock(
        Arc::clone(&scheduler),
        dispatcher.clone(),
        Arc::clone(&control),
        config.timing.war_tick_ms,
    ));
    let idle_clock = tokio::spawn(runner::run_idle_clock(
        Arc::clone(&scheduler),
        dispatcher.clone(),
        Arc::clone(&control),
        config.timing.idle_tick_secs,
        StubMarkov,
        StubAmusements,
        StubSocialPoster,
        SmallRng::from_os_rng(),
    ));
    info!("Tick drivers started");

    // 6. Route inbound lines until the feed closes or Ctrl-C arrives.
    let mut router = Router::new(
        Arc::clone(&scheduler),
        dispatcher.clone(),
        StubAmusements,
        SmallRng::from_os_rng(),
        &config.bot.admins,
        config.wars.min_duration_secs,
        config.wars.default_start_delay_secs,
    );

    tokio::select! {
        result = run_feed(&mut router, &scheduler) => {
            if let Err(error) = result {
                warn!(%error, "inbound feed failed");
            } else {
                info!("inbound feed closed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received");
        }
    }

    // 7. Stop the drivers and drain the queue.
    control.request_stop();
    let _ = war_clock.await;
    let _ = idle_clock.await;
    drop(dispatcher);
    drop(router);
    // Armed delayed actions keep the outbound channel open until they
    // fire; give the drain a moment, then abandon whatever is left.
    if tokio::time::timeout(std::time::Duration::from_secs(2), sink_task)
        .await
        .is_err()
    {
        warn!("outbound queue still has armed actions, abandoning drain");
    }

    info!("warclock-engine shutdown complete");
    Ok(())
}

/// Load the bot configuration from `warclock-config.yaml`.
///
/// Looks for the config file relative to the current working directory
/// and falls back to built-in defaults when it is absent.
fn load_config() -> Result<BotConfig, EngineError> {
    let config_path = Path::new("warclock-config.yaml");
    if config_path.exists() {
        let config = BotConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(BotConfig::default())
    }
}

/// Read `<channel> <nick> <text>` lines from stdin into the router.
///
/// Unknown channels are registered on first sight, mirroring how the
/// bot joins a channel when invited.
async fn run_feed<A, R>(
    router: &mut Router<A, R>,
    scheduler: &Arc<Scheduler>,
) -> Result<(), EngineError>
where
    A: warclock_core::collab::AmusementSource,
    R: rand::Rng,
{
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut parts = trimmed.splitn(3, ' ');
        let (Some(channel), Some(sender), Some(text)) =
            (parts.next(), parts.next(), parts.next())
        else {
            warn!(line = trimmed, "malformed feed line, want: <channel> <nick> <text>");
            continue;
        };

        if scheduler.register_channel(channel, unix_now_secs()).await {
            info!(channel, "channel registered from feed");
        }
        router.handle_line(channel, sender, text).await;
    }
    Ok(())
}

/// Current unix time in whole seconds (clamped at zero).
fn unix_now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp().max(0)).unwrap_or(0)
}
