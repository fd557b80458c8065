//! Collaborator traits for the subsystems the bot core does not own.
//!
//! The markov text generator, the amusement/entertainment modules, and
//! the social-post client are all external to the scheduling core. Each
//! is abstracted behind a small trait so the tick drivers stay pure and
//! tests can substitute canned implementations, the same way the engine
//! elsewhere swaps in stub decision sources.
//!
//! Collaborators return [`TimedLine`]s instead of performing sends; the
//! runner owns the hop onto the dispatch queue.

use warclock_types::{MarkovFlavor, TimedLine, TriggerKind};

/// A black-box markov-chain text generator.
pub trait MarkovSource {
    /// Generate one line from the given corpus.
    fn line(&mut self, flavor: MarkovFlavor) -> String;
}

/// The entertainment modules behind chatter triggers and ambient acts.
pub trait AmusementSource {
    /// Perform the entertainment action for a fired chatter trigger.
    fn trigger(&mut self, kind: TriggerKind, channel: &str, sender: &str) -> Vec<TimedLine>;

    /// Perform a random ambient act for a quiet channel.
    fn ambient(&mut self, channel: &str) -> Vec<TimedLine>;

    /// Release the velociraptor swarm.
    fn raptor_swarm(&mut self, channel: &str) -> Vec<TimedLine>;
}

/// A client for the external social-post service.
pub trait SocialPoster {
    /// Publish one generated line to the outside world.
    fn post(&mut self, text: &str);
}

/// A [`MarkovSource`] that produces fixed filler text.
///
/// Used when running the bot core without the real generator attached,
/// and by tests that only care that *a* line was requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubMarkov;

impl MarkovSource for StubMarkov {
    fn line(&mut self, flavor: MarkovFlavor) -> String {
        match flavor {
            MarkovFlavor::Say => String::from("words words words"),
            MarkovFlavor::Emote => String::from("types furiously"),
        }
    }
}

/// An [`AmusementSource`] with one canned line per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAmusements;

impl AmusementSource for StubAmusements {
    fn trigger(&mut self, kind: TriggerKind, _channel: &str, sender: &str) -> Vec<TimedLine> {
        let text = match kind {
            TriggerKind::GetItem => format!("gets {sender} a mysterious parcel"),
            TriggerKind::Challenge => format!("challenges {sender} to write faster"),
            TriggerKind::Eightball => {
                String::from("mutters under his breath, \"Ask again later\"")
            }
            TriggerKind::FridgeThrow => format!("hurls a fridge at {sender}"),
            TriggerKind::Defenestrate => {
                format!("throws {sender} through the nearest window")
            }
            TriggerKind::Sing => String::from("chants a snappy ditty"),
            TriggerKind::Foof => format!("throws a pillow at {sender}"),
        };
        vec![TimedLine::emote_after(0, text)]
    }

    fn ambient(&mut self, _channel: &str) -> Vec<TimedLine> {
        vec![TimedLine::emote_after(0, String::from("shuffles some papers"))]
    }

    fn raptor_swarm(&mut self, _channel: &str) -> Vec<TimedLine> {
        vec![TimedLine::emote_after(
            0,
            String::from("releases a swarm of velociraptors"),
        )]
    }
}

/// A [`SocialPoster`] that logs instead of publishing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSocialPoster;

impl SocialPoster for StubSocialPoster {
    fn post(&mut self, text: &str) {
        tracing::info!(text, "social post (stub)");
    }
}
