//! Inbound message routing.
//!
//! Every line that arrives from the transport passes through here:
//! `!`-prefixed messages become user commands, `$`-prefixed messages
//! become admin commands, and everything else rolls the ambient chatter
//! trigger. All replies and side effects leave through the dispatch
//! queue; the router itself never talks to the transport.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, warn};

use warclock_core::announce;
use warclock_core::collab::AmusementSource;
use warclock_core::scheduler::Scheduler;
use warclock_dispatch::Dispatcher;
use warclock_types::{ActionKind, WarEvent};

use crate::commands::{self, AdminCommand, Command};

/// Lines sent privately for `!help`, in order.
const USER_HELP: &[&str] = &[
    "I keep the clocks for word wars. These are the commands I answer to:",
    "!startwar <duration in min> [<time to start in min>|now [<name>]] - starts a word war",
    "!endwar <name> - ends one of your wars early",
    "!listwars - I will tell you about the wars in this channel.",
    "!listall - I will tell you about every war I am timing.",
    "!eggtimer [<minutes>] - I will send you a notice after that long (15 by default).",
];

/// Lines sent privately for `$help`, in order.
const ADMIN_HELP: &[&str] = &[
    "All admin commands:",
    "$muzzle <#channel> <0/1> - clears/sets the ambient chatter muzzle",
    "$chatter <#channel> <markov|amusement|bored|velociraptors> <0/1> - toggles one ambient behavior",
    "$chatterlevel <#channel> <0-100> - sets the random chatter level",
];

/// Routes inbound lines to the scheduler, chatter engine, and queue.
pub struct Router<A, R> {
    scheduler: Arc<Scheduler>,
    dispatcher: Dispatcher,
    amusements: A,
    rng: R,
    admins: BTreeSet<String>,
    min_duration_secs: u64,
    default_start_delay_secs: u64,
}

impl<A, R> Router<A, R>
where
    A: AmusementSource,
    R: Rng,
{
    /// Build a router.
    ///
    /// `admins` is matched case-insensitively against sender nicks.
    pub fn new(
        scheduler: Arc<Scheduler>,
        dispatcher: Dispatcher,
        amusements: A,
        rng: R,
        admins: &[String],
        min_duration_secs: u64,
        default_start_delay_secs: u64,
    ) -> Self {
        Self {
            scheduler,
            dispatcher,
            amusements,
            rng,
            admins: admins.iter().map(|nick| nick.to_lowercase()).collect(),
            min_duration_secs,
            default_start_delay_secs,
        }
    }

    /// Whether the given nick is an admin.
    pub fn is_admin(&self, nick: &str) -> bool {
        self.admins.contains(&nick.to_lowercase())
    }

    /// Handle one inbound channel line.
    pub async fn handle_line(&mut self, channel: &str, sender: &str, text: &str) {
        if let Some(parsed) = commands::parse_user(text, self.min_duration_secs) {
            match parsed {
                Ok(command) => self.run_command(channel, sender, command).await,
                Err(error) => {
                    debug!(channel, sender, %error, "command rejected");
                    self.reply(channel, &format!("{sender}: {error}"));
                }
            }
            return;
        }

        if let Some(parsed) = commands::parse_admin(text) {
            if !self.is_admin(sender) {
                warn!(channel, sender, text, "non-admin attempted admin command");
                self.reply(
                    channel,
                    &format!(
                        "{sender}: You are not an admin. Only Admins have access to that command."
                    ),
                );
                return;
            }
            match parsed {
                Ok(command) => self.run_admin(channel, sender, command).await,
                Err(error) => self.reply(channel, &format!("{sender}: {error}")),
            }
            return;
        }

        self.maybe_chatter(channel, sender, text).await;
    }

    /// Execute a parsed user command.
    async fn run_command(&mut self, channel: &str, sender: &str, command: Command) {
        match command {
            Command::StartWar {
                duration_secs,
                start_delay_secs,
                name,
            } => {
                let name = name.unwrap_or_else(|| format!("{sender}'s war"));
                let delay = start_delay_secs.unwrap_or(self.default_start_delay_secs);
                match self
                    .scheduler
                    .start_war(&name, sender, channel, duration_secs, delay)
                    .await
                {
                    Ok(events) => self.dispatch_events(&events),
                    Err(error) => self.reply(channel, &format!("{sender}: {error}")),
                }
            }
            Command::EndWar { name } => {
                let is_admin = self.is_admin(sender);
                match self.scheduler.end_war(&name, sender, is_admin).await {
                    Ok(event) => self.dispatch_events(std::slice::from_ref(&event)),
                    Err(error) => self.reply(channel, &format!("{sender}: {error}")),
                }
            }
            Command::ListWars => {
                let snapshots = self.scheduler.wars_in(channel).await;
                if snapshots.is_empty() {
                    self.reply(sender, "No wars are currently available.");
                } else {
                    for snapshot in &snapshots {
                        self.reply(sender, &snapshot.description());
                    }
                }
            }
            Command::ListAll => {
                let snapshots = self.scheduler.all_wars().await;
                if snapshots.is_empty() {
                    self.reply(sender, "No wars are currently available.");
                } else {
                    for snapshot in &snapshots {
                        self.reply(sender, &snapshot.description_with_channel());
                    }
                }
            }
            Command::EggTimer { minutes } => {
                self.reply(channel, &format!("{sender}: your timer has been set."));
                self.dispatcher.schedule(
                    sender,
                    "Your timer has expired!",
                    ActionKind::Notice,
                    minutes_to_millis(minutes),
                );
            }
            Command::Help => {
                for line in USER_HELP {
                    self.reply(sender, line);
                }
            }
        }
    }

    /// Execute a parsed admin command.
    async fn run_admin(&mut self, channel: &str, sender: &str, command: AdminCommand) {
        match command {
            AdminCommand::Muzzle {
                channel: target,
                flag,
            } => {
                if self.scheduler.set_muzzle(&target, flag).await {
                    self.reply(
                        channel,
                        &format!("{sender}: Channel muzzle flag updated for {target}"),
                    );
                } else {
                    self.reply(channel, &format!("I don't know about {target}"));
                }
            }
            AdminCommand::Chatter {
                channel: target,
                kind,
                flag,
            } => {
                if self.scheduler.set_ambient(&target, kind, flag).await {
                    self.reply(
                        channel,
                        &format!("{sender}: Chatter setting updated for {target}"),
                    );
                } else {
                    self.reply(channel, &format!("I don't know about {target}"));
                }
            }
            AdminCommand::ChatterLevel {
                channel: target,
                percent,
            } => {
                if self.scheduler.set_chatter_level(&target, percent).await {
                    self.reply(
                        channel,
                        &format!("{sender}: Random chatter level updated for {target}"),
                    );
                } else {
                    self.reply(channel, &format!("I don't know about {target}"));
                }
            }
            AdminCommand::Help => {
                for line in ADMIN_HELP {
                    self.reply(sender, line);
                }
            }
        }
    }

    /// Roll the ambient chatter trigger for an ordinary message.
    async fn maybe_chatter(&mut self, channel: &str, sender: &str, text: &str) {
        let fired = self
            .scheduler
            .maybe_chatter(channel, text, now_secs(), &mut self.rng)
            .await;
        if let Some(kind) = fired {
            for line in self.amusements.trigger(kind, channel, sender) {
                self.dispatcher
                    .schedule(channel, &line.text, line.kind, line.delay_ms);
            }
        }
    }

    /// Render war events into announcement lines on the queue.
    fn dispatch_events(&self, events: &[WarEvent]) {
        for event in events {
            let line = announce::render(event);
            self.dispatcher
                .schedule(&line.target, &line.text, line.kind, 0);
        }
    }

    /// Queue an immediate plain-message reply.
    fn reply(&self, target: &str, text: &str) {
        self.dispatcher
            .schedule(target, text, ActionKind::Message, 0);
    }
}

/// Current unix time in whole seconds (clamped at zero).
fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp().max(0)).unwrap_or(0)
}

/// Convert fractional minutes to whole milliseconds for the queue.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn minutes_to_millis(minutes: f64) -> u64 {
    let millis = minutes * 60_000.0;
    if !millis.is_finite() || millis < 0.0 || millis > 1e15 {
        return 0;
    }
    millis.floor() as u64
}
