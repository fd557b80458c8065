//! Typed war lifecycle events emitted by the scheduler tick.
//!
//! The tick itself never touches the transport: it returns these events
//! and a separate consumer formats them into announcement text and hands
//! the result to the delayed-action dispatcher. That split keeps the
//! timing logic free of I/O and lets tests assert on events instead of
//! side effects.

use serde::{Deserialize, Serialize};

/// A lifecycle event for a single war.
///
/// Every variant carries the display-form war name and the channel the
/// war lives in, which is all the announcement formatter needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarEvent {
    /// A war was created with a non-zero start delay.
    Scheduled {
        /// Display-form war name.
        name: String,
        /// Channel the war runs in.
        channel: String,
        /// Nick of the user who started the war.
        starter: String,
        /// Seconds until the war begins.
        start_in_secs: u64,
    },

    /// A scheduled war's time-to-start crossed an announcement threshold.
    StartCountdown {
        /// Display-form war name.
        name: String,
        /// Channel the war runs in.
        channel: String,
        /// Seconds left until the war begins.
        seconds_left: u64,
    },

    /// A war transitioned from `Scheduled` to `Running`.
    Begun {
        /// Display-form war name.
        name: String,
        /// Channel the war runs in.
        channel: String,
        /// Total fighting duration in seconds.
        duration_secs: u64,
    },

    /// A running war's remaining time crossed an announcement threshold.
    EndCountdown {
        /// Display-form war name.
        name: String,
        /// Channel the war runs in.
        channel: String,
        /// Seconds left until the war ends.
        seconds_left: u64,
    },

    /// A war's countdown reached zero and it was removed.
    Ended {
        /// Display-form war name.
        name: String,
        /// Channel the war ran in.
        channel: String,
    },

    /// A war was force-ended before its natural expiry.
    EndedEarly {
        /// Display-form war name.
        name: String,
        /// Channel the war ran in.
        channel: String,
        /// Nick of the user who ended it.
        by: String,
    },
}

impl WarEvent {
    /// The channel this event belongs to.
    pub fn channel(&self) -> &str {
        match self {
            Self::Scheduled { channel, .. }
            | Self::StartCountdown { channel, .. }
            | Self::Begun { channel, .. }
            | Self::EndCountdown { channel, .. }
            | Self::Ended { channel, .. }
            | Self::EndedEarly { channel, .. } => channel,
        }
    }

    /// The display-form name of the war this event concerns.
    pub fn war_name(&self) -> &str {
        match self {
            Self::Scheduled { name, .. }
            | Self::StartCountdown { name, .. }
            | Self::Begun { name, .. }
            | Self::EndCountdown { name, .. }
            | Self::Ended { name, .. }
            | Self::EndedEarly { name, .. } => name,
        }
    }
}
