//! Core entity structs shared across the Warclock workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::ActionKind;
use crate::ids::ActionId;

/// A read-only snapshot of a single war, taken under the scheduler lock.
///
/// Snapshots are what `!listwars` / `!listall` render and what tests
/// inspect; they never alias live registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarSnapshot {
    /// Display-form war name (original capitalization preserved).
    pub name: String,
    /// Channel the war runs in.
    pub channel: String,
    /// Nick of the user who started the war.
    pub starter: String,
    /// Total fighting duration in seconds.
    pub duration_secs: u64,
    /// Seconds until the war begins (0 once running).
    pub time_to_start_secs: u64,
    /// Seconds of fighting time left (0 until the war begins).
    pub remaining_secs: u64,
}

impl WarSnapshot {
    /// One-line description for `!listwars` output.
    pub fn description(&self) -> String {
        if self.time_to_start_secs > 0 {
            format!(
                "{}: {} minute(s), starting in {} second(s)",
                self.name,
                self.duration_secs / 60,
                self.time_to_start_secs
            )
        } else {
            format!(
                "{}: {} second(s) remaining of {} minute(s)",
                self.name,
                self.remaining_secs,
                self.duration_secs / 60
            )
        }
    }

    /// Description including the channel, for the all-channels listing.
    pub fn description_with_channel(&self) -> String {
        format!("[{}] {}", self.channel, self.description())
    }
}

/// A single line queued for outbound delivery.
///
/// Produced by the dispatcher's timer tasks and consumed by the outbound
/// sink. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundLine {
    /// Correlates the scheduling log entry with the delivery log entry.
    pub id: ActionId,
    /// Channel or nick the line is addressed to.
    pub target: String,
    /// Fully formatted payload text.
    pub text: String,
    /// Protocol verb to deliver the line with.
    pub kind: ActionKind,
    /// Absolute time the action was due to fire.
    pub fire_at: DateTime<Utc>,
}

/// A line some collaborator wants delivered after a relative delay.
///
/// Collaborator traits return these instead of performing sends, so the
/// decision logic stays pure and the engine owns all scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedLine {
    /// Milliseconds to wait before delivery.
    pub delay_ms: u64,
    /// Protocol verb to deliver the line with.
    pub kind: ActionKind,
    /// Fully formatted payload text.
    pub text: String,
}

impl TimedLine {
    /// Convenience constructor for an immediate plain message.
    pub const fn message(text: String) -> Self {
        Self {
            delay_ms: 0,
            kind: ActionKind::Message,
            text,
        }
    }

    /// Convenience constructor for a delayed emote.
    pub const fn emote_after(delay_ms: u64, text: String) -> Self {
        Self {
            delay_ms,
            kind: ActionKind::Emote,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(time_to_start_secs: u64, remaining_secs: u64) -> WarSnapshot {
        WarSnapshot {
            name: String::from("Morning Sprint"),
            channel: String::from("#writing"),
            starter: String::from("ada"),
            duration_secs: 600,
            time_to_start_secs,
            remaining_secs,
        }
    }

    #[test]
    fn scheduled_description_mentions_start() {
        let snap = snapshot(120, 0);
        let text = snap.description();
        assert!(text.contains("starting in 120"));
        assert!(text.starts_with("Morning Sprint:"));
    }

    #[test]
    fn running_description_mentions_remaining() {
        let snap = snapshot(0, 90);
        let text = snap.description();
        assert!(text.contains("90 second(s) remaining"));
    }

    #[test]
    fn channel_form_prefixes_channel() {
        let snap = snapshot(0, 90);
        assert!(snap.description_with_channel().starts_with("[#writing] "));
    }
}
