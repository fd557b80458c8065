//! Idle-ticker decision logic (the 60-second ambient cadence).
//!
//! Once a minute the bot looks at every known channel and, with a
//! per-channel probability, fires one of the channel's enabled ambient
//! behaviors. The decisions here are pure; the runner maps the returned
//! plan onto collaborator calls and the dispatch queue.

use rand::Rng;

use warclock_types::AmbientKind;

use crate::channels::ChannelState;

/// One ambient action the idle ticker decided to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleAction {
    /// Channel the action fires in (display form).
    pub channel: String,
    /// The ambient behavior selected.
    pub kind: AmbientKind,
}

/// The full outcome of one idle-ticker pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdlePlan {
    /// Per-channel ambient actions to perform.
    pub actions: Vec<IdleAction>,
    /// Whether to forward a generated line to the social-post
    /// collaborator this tick.
    pub social_post: bool,
}

/// Decide whether a single channel fires an ambient behavior this tick.
///
/// Muzzle checks (including the implicit running-war muzzle) happen in
/// the scheduler before this is called. Returns `None` when the roll
/// fails or the channel has no ambient kinds enabled.
pub fn pick_ambient(state: &ChannelState, rng: &mut impl Rng) -> Option<AmbientKind> {
    let roll: f64 = rng.random_range(0.0..100.0);
    if roll >= state.random_chatter_level {
        return None;
    }

    let kinds = state.toggles.enabled_kinds();
    if kinds.is_empty() {
        return None;
    }
    let index = rng.random_range(0..kinds.len());
    kinds.get(index).copied()
}

/// Roll the fixed low-probability social post, independent of channels.
pub fn should_social_post(percent: u32, rng: &mut impl Rng) -> bool {
    let roll: u32 = rng.random_range(0..100);
    roll < percent
}
