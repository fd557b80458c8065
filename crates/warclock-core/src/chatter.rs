//! The ambient chatter engine.
//!
//! On every non-command message in an unmuzzled channel the bot rolls
//! against odds that grow with the logarithm of the channel's idle time.
//! A successful roll picks an entertainment action from a weighted
//! palette and advances the channel's cooldown clock by a *random
//! fraction* of the elapsed time -- not all the way to "now" -- so
//! triggers can arrive in bursts once a channel has been quiet long
//! enough.
//!
//! The weighted bands in [`pick_trigger`] are carried over from years of
//! tuning in production; do not re-derive "fair" probabilities from the
//! palette size.

use rand::Rng;

use warclock_types::TriggerKind;

use crate::channels::ChannelState;
use crate::config::ChatterConfig;

/// Compute the base odds (percent) for a channel idle `elapsed_secs`.
///
/// `floor(ln(elapsed) * time_multiplier)`, capped at `max_base_odds`.
/// The elapsed time is clamped to at least 1 second before the log so
/// the result is never negative or NaN.
pub fn base_odds(elapsed_secs: u64, config: &ChatterConfig) -> f64 {
    let clamped = u32::try_from(elapsed_secs.max(1)).unwrap_or(u32::MAX);
    let raw = (f64::from(clamped).ln() * f64::from(config.time_multiplier)).floor();
    raw.min(f64::from(config.max_base_odds))
}

/// Roll for an ambient chatter trigger on an inbound message.
///
/// Returns the selected [`TriggerKind`] when the trigger fires, `None`
/// otherwise. Muzzle checks happen in the scheduler before this is
/// called -- the engine itself is a pure decision function over the
/// channel state, the clock, and the RNG.
///
/// On a successful fire the channel's cooldown clock advances by
/// `random(0, elapsed / time_divisor)` seconds. The range is clamped to
/// at least 1 so a small `elapsed / divisor` ratio cannot produce an
/// empty range (the original implementation could crash there; the
/// clamp keeps the burst behavior without the crash -- see DESIGN.md).
pub fn maybe_trigger(
    state: &mut ChannelState,
    mentions_bot: bool,
    now_secs: u64,
    config: &ChatterConfig,
    rng: &mut impl Rng,
) -> Option<TriggerKind> {
    let elapsed = now_secs.saturating_sub(state.last_chatter_secs).max(1);

    let mut odds = base_odds(elapsed, config);
    if mentions_bot {
        // Applied after the cap: a direct mention can exceed the base cap.
        odds *= f64::from(config.name_multiplier);
    }

    let roll: u32 = rng.random_range(0..100);
    if f64::from(roll) >= odds {
        return None;
    }

    let kind = pick_trigger(rng);

    let span = elapsed
        .checked_div(u64::from(config.time_divisor.max(1)))
        .unwrap_or(0)
        .max(1);
    let advance: u64 = rng.random_range(0..span);
    state.last_chatter_secs = state.last_chatter_secs.saturating_add(advance);

    tracing::debug!(
        channel = state.name,
        ?kind,
        odds,
        elapsed,
        "Chattered"
    );

    Some(kind)
}

/// Select a trigger kind over the weighted bands.
///
/// The draw is uniform in [0, 220) and the thresholds are the
/// production-tuned originals:
///
/// ```text
/// 181..=219  get-item
/// 161..=180  challenge
/// 121..=160  eightball
///  96..=120  fridge-throw
///  46..=95   defenestrate
///  21..=45   sing
///   0..=20   foof
/// ```
pub fn pick_trigger(rng: &mut impl Rng) -> TriggerKind {
    let band: u32 = rng.random_range(0..220);
    if band > 180 {
        TriggerKind::GetItem
    } else if band > 160 {
        TriggerKind::Challenge
    } else if band > 120 {
        TriggerKind::Eightball
    } else if band > 95 {
        TriggerKind::FridgeThrow
    } else if band > 45 {
        TriggerKind::Defenestrate
    } else if band > 20 {
        TriggerKind::Sing
    } else {
        TriggerKind::Foof
    }
}
