//! Enumeration types for the Warclock bot core.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outbound delivery
// ---------------------------------------------------------------------------

/// How an outbound line is delivered on the chat protocol.
///
/// The transport collaborator maps these onto the underlying protocol
/// verbs (plain message, `/me`-style emote, or notice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// An ordinary channel or private message.
    Message,
    /// A third-person emote ("* botname does something").
    Emote,
    /// A protocol notice (used for war begin/end announcements).
    Notice,
}

// ---------------------------------------------------------------------------
// Ambient chatter
// ---------------------------------------------------------------------------

/// The entertainment action selected when a chatter trigger fires.
///
/// The selection among these is deliberately *not* uniform: the engine
/// draws over weighted bands tuned by long operation of the original
/// bot. See `warclock_core::chatter` for the band layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Fetch the sender a random item.
    GetItem,
    /// Issue a writing challenge.
    Challenge,
    /// Mutter an eightball answer under the bot's breath.
    Eightball,
    /// Hurl a refrigerator at someone.
    FridgeThrow,
    /// Throw someone out the nearest window.
    Defenestrate,
    /// Sing (badly).
    Sing,
    /// Throw a pillow.
    Foof,
}

impl TriggerKind {
    /// The fixed ordered palette the weighted draw selects from.
    pub const PALETTE: [Self; 7] = [
        Self::GetItem,
        Self::Challenge,
        Self::Eightball,
        Self::FridgeThrow,
        Self::Defenestrate,
        Self::Sing,
        Self::Foof,
    ];
}

/// An ambient behavior the idle ticker may fire in a quiet channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AmbientKind {
    /// Ask the markov generator for a random say/emote line.
    Markov,
    /// Delegate to the amusement module for a random act.
    Amusement,
    /// Say a fixed "I'm bored." message.
    Bored,
    /// Release a swarm of velociraptors.
    Velociraptors,
}

/// Which markov corpus a generated line should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkovFlavor {
    /// Lines learned from ordinary channel messages.
    Say,
    /// Lines learned from emotes.
    Emote,
}

// ---------------------------------------------------------------------------
// War lifecycle
// ---------------------------------------------------------------------------

/// The lifecycle phase of a word war, derived from its counters.
///
/// There is no `Ended` variant: a war whose countdown reaches zero is
/// removed from the registry outright, leaving no tombstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarPhase {
    /// Counting down to start (`time_to_start > 0`).
    Scheduled,
    /// Counting down to end (`time_to_start == 0`, `remaining > 0`).
    Running,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_covers_every_kind_once() {
        let mut seen = std::collections::BTreeSet::new();
        for kind in TriggerKind::PALETTE {
            seen.insert(kind);
        }
        assert_eq!(seen.len(), TriggerKind::PALETTE.len());
    }

    #[test]
    fn action_kind_roundtrip_serde() {
        for kind in [ActionKind::Message, ActionKind::Emote, ActionKind::Notice] {
            let json = serde_json::to_string(&kind).ok();
            assert!(json.is_some());
            let back: Result<ActionKind, _> =
                serde_json::from_str(json.as_deref().unwrap_or(""));
            assert_eq!(back.ok(), Some(kind));
        }
    }
}
