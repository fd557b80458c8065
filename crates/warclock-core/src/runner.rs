//! The periodic drivers: the 1-second war clock and the 60-second idle
//! clock.
//!
//! Both are plain async loops built on [`tokio::time::interval`] --
//! cooperative timers, not a thread per war. Each iteration acquires
//! the scheduler lock exactly once, does its pure-state work, releases
//! the lock, and only then pushes the resulting lines through the
//! dispatch queue. Nothing in a tick blocks on external I/O, so one
//! slow transport can never stall every countdown in every channel.
//!
//! A failure inside one iteration is logged and the loop keeps its
//! cadence; only [`RunControl::request_stop`] ends a driver.

use std::sync::Arc;

use rand::Rng;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, info};

use warclock_dispatch::Dispatcher;
use warclock_types::{ActionKind, AmbientKind, MarkovFlavor};

use crate::announce;
use crate::collab::{AmusementSource, MarkovSource, SocialPoster};
use crate::control::RunControl;
use crate::scheduler::Scheduler;

/// Drive the war clock until a stop is requested.
///
/// Once per `tick_ms` (1000 in production; countdown semantics assume
/// one second) the scheduler tick runs and every returned event is
/// formatted and handed to the dispatcher with no delay -- the queue
/// itself provides the asynchronous hop to the transport.
pub async fn run_war_clock(
    scheduler: Arc<Scheduler>,
    dispatcher: Dispatcher,
    control: Arc<RunControl>,
    tick_ms: u64,
) {
    let mut ticker = interval(Duration::from_millis(tick_ms.max(1)));
    // If a tick overruns, skip the backlog rather than bursting
    // countdown decrements.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(tick_ms, "war clock started");
    loop {
        tokio::select! {
            () = control.stopped() => break,
            _ = ticker.tick() => {
                let events = scheduler.tick().await;
                for event in &events {
                    let line = announce::render(event);
                    dispatcher.schedule(&line.target, &line.text, line.kind, 0);
                }
                if !events.is_empty() {
                    debug!(count = events.len(), "war events dispatched");
                }
            }
        }
    }
    info!("war clock stopped");
}

/// Drive the idle ticker until a stop is requested.
///
/// Every `tick_secs` the scheduler rolls the ambient plan; the plan is
/// then mapped onto the collaborators and the dispatch queue out here,
/// after the scheduler lock has been released.
pub async fn run_idle_clock<M, A, S, R>(
    scheduler: Arc<Scheduler>,
    dispatcher: Dispatcher,
    control: Arc<RunControl>,
    tick_secs: u64,
    mut markov: M,
    mut amusements: A,
    mut social: S,
    mut rng: R,
) where
    M: MarkovSource,
    A: AmusementSource,
    S: SocialPoster,
    R: Rng,
{
    let mut ticker = interval(Duration::from_secs(tick_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(tick_secs, "idle clock started");
    loop {
        tokio::select! {
            () = control.stopped() => break,
            _ = ticker.tick() => {
                let plan = scheduler.idle_tick(&mut rng).await;
                for action in &plan.actions {
                    perform_ambient(
                        &dispatcher,
                        &mut markov,
                        &mut amusements,
                        &action.channel,
                        action.kind,
                        &mut rng,
                    );
                }
                if plan.social_post {
                    social.post(&markov.line(MarkovFlavor::Say));
                }
            }
        }
    }
    info!("idle clock stopped");
}

/// Map one ambient decision onto collaborator output and the queue.
fn perform_ambient<M, A>(
    dispatcher: &Dispatcher,
    markov: &mut M,
    amusements: &mut A,
    channel: &str,
    kind: AmbientKind,
    rng: &mut impl Rng,
) where
    M: MarkovSource,
    A: AmusementSource,
{
    debug!(channel, ?kind, "ambient action");
    match kind {
        AmbientKind::Markov => {
            let (flavor, action_kind) = if rng.random_bool(0.5) {
                (MarkovFlavor::Say, ActionKind::Message)
            } else {
                (MarkovFlavor::Emote, ActionKind::Emote)
            };
            let text = markov.line(flavor);
            dispatcher.schedule(channel, &text, action_kind, 0);
        }
        AmbientKind::Amusement => {
            for line in amusements.ambient(channel) {
                dispatcher.schedule(channel, &line.text, line.kind, line.delay_ms);
            }
        }
        AmbientKind::Bored => {
            dispatcher.schedule(channel, "I'm bored.", ActionKind::Message, 0);
        }
        AmbientKind::Velociraptors => {
            for line in amusements.raptor_swarm(channel) {
                dispatcher.schedule(channel, &line.text, line.kind, line.delay_ms);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::collab::{StubAmusements, StubMarkov, StubSocialPoster};
    use crate::config::{BotConfig, ChannelSeed};

    fn scheduler_with_war() -> Arc<Scheduler> {
        let config = BotConfig {
            channels: vec![ChannelSeed {
                name: "#writing".to_owned(),
                muzzled: false,
                random_chatter_level: 100.0,
                markov: true,
                amusement: true,
                bored: true,
                velociraptors: true,
            }],
            ..BotConfig::default()
        };
        Arc::new(Scheduler::from_config(&config, 0))
    }

    #[tokio::test(start_paused = true)]
    async fn war_clock_dispatches_countdown_lines() {
        let scheduler = scheduler_with_war();
        scheduler
            .start_war("sprint", "ada", "#writing", 65, 0)
            .await
            .unwrap();

        let (dispatcher, mut rx) = Dispatcher::new();
        let control = Arc::new(RunControl::new());

        let driver = tokio::spawn(run_war_clock(
            Arc::clone(&scheduler),
            dispatcher,
            Arc::clone(&control),
            1000,
        ));

        // 65 -> 60 takes five ticks; the 60-second line is the first event.
        let line = tokio::time::timeout(Duration::from_secs(30), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(line.text, "sprint: 1 minute remaining.");

        control.request_stop();
        driver.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn war_clock_stops_on_request() {
        let scheduler = scheduler_with_war();
        let (dispatcher, _rx) = Dispatcher::new();
        let control = Arc::new(RunControl::new());

        let driver = tokio::spawn(run_war_clock(
            Arc::clone(&scheduler),
            dispatcher,
            Arc::clone(&control),
            1000,
        ));
        control.request_stop();
        let result =
            tokio::time::timeout(Duration::from_secs(5), driver).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_clock_produces_ambient_lines() {
        let scheduler = scheduler_with_war();
        let (dispatcher, mut rx) = Dispatcher::new();
        let control = Arc::new(RunControl::new());

        let driver = tokio::spawn(run_idle_clock(
            Arc::clone(&scheduler),
            dispatcher,
            Arc::clone(&control),
            60,
            StubMarkov,
            StubAmusements,
            StubSocialPoster,
            SmallRng::seed_from_u64(3),
        ));

        // Chatter level is 100%, so the first pass must produce a line.
        let line = tokio::time::timeout(Duration::from_secs(120), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(line.target, "#writing");

        control.request_stop();
        driver.await.unwrap();
    }
}
