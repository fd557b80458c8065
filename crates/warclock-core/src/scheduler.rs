//! The scheduler: one explicit object owning all timed-event state.
//!
//! There is no hidden singleton anywhere in this crate. `main` builds
//! one [`Scheduler`], wraps it in an [`Arc`], and hands it to the tick
//! drivers and the command layer. Every piece of shared mutable state
//! (the war registry and the per-channel chatter state) lives behind a
//! single `tokio::sync::Mutex` inside it, and every entry point --
//! the 1-second tick, the 60-second idle pass, command-issued start/end
//! calls, chatter rolls, admin toggles -- acquires that one lock for
//! the duration of its critical section. A tick therefore never sees a
//! half-constructed war, and the RAII guard releases the lock on every
//! exit path by construction.
//!
//! Nothing under the lock performs I/O: ticks return typed events, and
//! the runner hands them to the dispatch queue after the lock is gone.
//!
//! [`Arc`]: std::sync::Arc

use rand::Rng;
use tokio::sync::Mutex;

use warclock_types::{TriggerKind, WarEvent, WarSnapshot};

use crate::channels::{ChannelDirectory, ChannelState};
use crate::chatter;
use crate::config::{BotConfig, ChatterConfig};
use crate::idle::{self, IdleAction, IdlePlan};
use crate::registry::{WarError, WarRegistry};

/// All mutable scheduler state, guarded as one unit.
#[derive(Debug, Default)]
struct SchedulerState {
    wars: WarRegistry,
    channels: ChannelDirectory,
}

/// The timed-event core shared by the tick drivers and command layer.
#[derive(Debug)]
pub struct Scheduler {
    state: Mutex<SchedulerState>,
    chatter: ChatterConfig,
    social_post_pct: u32,
    nickname_lower: String,
}

impl Scheduler {
    /// Build a scheduler from configuration, seeding the channel
    /// directory. `now_secs` initializes every channel's chatter clock.
    pub fn from_config(config: &BotConfig, now_secs: u64) -> Self {
        let mut channels = ChannelDirectory::new();
        for seed in &config.channels {
            channels.register(ChannelState::from_seed(seed, now_secs));
        }
        Self {
            state: Mutex::new(SchedulerState {
                wars: WarRegistry::new(),
                channels,
            }),
            chatter: config.chatter.normalized(),
            social_post_pct: config.idle.social_post_pct,
            nickname_lower: config.bot.nickname.to_lowercase(),
        }
    }

    /// The normalized chatter parameters in effect.
    pub const fn chatter_config(&self) -> &ChatterConfig {
        &self.chatter
    }

    // -----------------------------------------------------------------------
    // War commands
    // -----------------------------------------------------------------------

    /// Start a new war. See [`WarRegistry::start_war`].
    pub async fn start_war(
        &self,
        name: &str,
        starter: &str,
        channel: &str,
        duration_secs: u64,
        start_delay_secs: u64,
    ) -> Result<Vec<WarEvent>, WarError> {
        let mut state = self.state.lock().await;
        state
            .wars
            .start_war(name, starter, channel, duration_secs, start_delay_secs)
    }

    /// End a war early. See [`WarRegistry::end_war`].
    pub async fn end_war(
        &self,
        name: &str,
        requester: &str,
        is_admin: bool,
    ) -> Result<WarEvent, WarError> {
        let mut state = self.state.lock().await;
        state.wars.end_war(name, requester, is_admin)
    }

    /// Snapshots of the wars in one channel, insertion order.
    pub async fn wars_in(&self, channel: &str) -> Vec<WarSnapshot> {
        self.state.lock().await.wars.wars_in(channel)
    }

    /// Snapshots of every live war, insertion order.
    pub async fn all_wars(&self) -> Vec<WarSnapshot> {
        self.state.lock().await.wars.all_wars()
    }

    // -----------------------------------------------------------------------
    // Tick entry points
    // -----------------------------------------------------------------------

    /// Advance every war by one second and return the lifecycle events.
    ///
    /// Called once per second by the war-clock driver. The whole pass
    /// runs under the scheduler lock; the returned events are formatted
    /// and dispatched by the caller after the lock is released.
    pub async fn tick(&self) -> Vec<WarEvent> {
        let mut state = self.state.lock().await;
        state.wars.tick()
    }

    /// Run one idle-ticker pass and return the ambient plan.
    ///
    /// Muzzled channels (persisted flag or running war) are skipped
    /// here, under the same lock the tick uses, so the plan is
    /// consistent with the war state at the moment of the roll.
    pub async fn idle_tick(&self, rng: &mut impl Rng) -> IdlePlan {
        let mut state = self.state.lock().await;

        let mut actions = Vec::new();
        let muzzled: Vec<String> = state
            .channels
            .iter()
            .filter(|ch| ch.muzzled || state.wars.has_running_in(&ch.name))
            .map(|ch| ch.name.clone())
            .collect();

        for channel in state.channels.iter_mut() {
            if muzzled.iter().any(|name| name == &channel.name) {
                continue;
            }
            if let Some(kind) = idle::pick_ambient(channel, rng) {
                actions.push(IdleAction {
                    channel: channel.name.clone(),
                    kind,
                });
            }
        }

        IdlePlan {
            actions,
            social_post: idle::should_social_post(self.social_post_pct, rng),
        }
    }

    // -----------------------------------------------------------------------
    // Chatter
    // -----------------------------------------------------------------------

    /// Roll the ambient chatter trigger for an inbound message.
    ///
    /// Returns `None` when the channel is unknown, muzzled (explicitly
    /// or via a running war), or the roll fails.
    pub async fn maybe_chatter(
        &self,
        channel: &str,
        message: &str,
        now_secs: u64,
        rng: &mut impl Rng,
    ) -> Option<TriggerKind> {
        let mut state = self.state.lock().await;

        if state.channels.get(channel)?.muzzled || state.wars.has_running_in(channel) {
            return None;
        }

        let mentions_bot = message.to_lowercase().contains(&self.nickname_lower);
        let chatter_config = self.chatter;
        let channel_state = state.channels.get_mut(channel)?;
        chatter::maybe_trigger(channel_state, mentions_bot, now_secs, &chatter_config, rng)
    }

    // -----------------------------------------------------------------------
    // Channel administration
    // -----------------------------------------------------------------------

    /// Register a channel if it is not already known.
    pub async fn register_channel(&self, name: &str, now_secs: u64) -> bool {
        let mut state = self.state.lock().await;
        state.channels.register(ChannelState::new(name, now_secs))
    }

    /// Whether ambient chatter is muzzled in the channel right now.
    ///
    /// True when the persisted flag is set *or* any war in the channel
    /// is currently running; a merely scheduled war does not muzzle.
    pub async fn is_channel_muzzled(&self, channel: &str) -> bool {
        let state = self.state.lock().await;
        state.channels.get(channel).is_some_and(|ch| ch.muzzled)
            || state.wars.has_running_in(channel)
    }

    /// Set the persisted muzzle flag. Returns false for an unknown channel.
    pub async fn set_muzzle(&self, channel: &str, muzzled: bool) -> bool {
        let mut state = self.state.lock().await;
        match state.channels.get_mut(channel) {
            Some(ch) => {
                ch.muzzled = muzzled;
                true
            }
            None => false,
        }
    }

    /// Toggle one ambient kind for a channel. Returns false when unknown.
    pub async fn set_ambient(
        &self,
        channel: &str,
        kind: warclock_types::AmbientKind,
        enabled: bool,
    ) -> bool {
        let mut state = self.state.lock().await;
        match state.channels.get_mut(channel) {
            Some(ch) => {
                ch.toggles.set(kind, enabled);
                true
            }
            None => false,
        }
    }

    /// Set a channel's random-chatter level (percent). Returns false
    /// when the channel is unknown.
    pub async fn set_chatter_level(&self, channel: &str, percent: f64) -> bool {
        let mut state = self.state.lock().await;
        match state.channels.get_mut(channel) {
            Some(ch) => {
                ch.random_chatter_level = percent;
                true
            }
            None => false,
        }
    }
}
