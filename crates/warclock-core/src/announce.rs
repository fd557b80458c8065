//! Formatting of war events into announcement lines.
//!
//! This is the consumer side of the typed-event split: the scheduler
//! tick emits [`WarEvent`]s, and this module turns them into fully
//! formatted outbound lines for the dispatch queue. Countdown values
//! below sixty seconds render in seconds-form, everything else in
//! minutes-form, with singular/plural chosen at exactly 1.

use warclock_types::{ActionKind, WarEvent};

/// A formatted announcement ready for the dispatch queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Channel (or nick) the line is addressed to.
    pub target: String,
    /// Protocol verb to deliver with.
    pub kind: ActionKind,
    /// Fully formatted text.
    pub text: String,
}

/// Render a war event into its announcement line.
pub fn render(event: &WarEvent) -> Announcement {
    match event {
        WarEvent::Scheduled {
            name: _,
            channel,
            starter,
            start_in_secs,
        } => Announcement {
            target: channel.clone(),
            kind: ActionKind::Message,
            text: format!(
                "{starter}: your wordwar will start in {}.",
                minutes_phrase(*start_in_secs)
            ),
        },
        WarEvent::StartCountdown {
            name,
            channel,
            seconds_left,
        } => Announcement {
            target: channel.clone(),
            kind: ActionKind::Message,
            text: format!("{name}: Starting in {}!", countdown_phrase(*seconds_left)),
        },
        WarEvent::Begun {
            name,
            channel,
            duration_secs,
        } => Announcement {
            target: channel.clone(),
            kind: ActionKind::Notice,
            text: format!(
                "WordWar: '{name}' starts now! ({} minutes)",
                duration_secs / 60
            ),
        },
        WarEvent::EndCountdown {
            name,
            channel,
            seconds_left,
        } => Announcement {
            target: channel.clone(),
            kind: ActionKind::Message,
            text: if *seconds_left < 60 {
                format!("{name}: {} remaining!", countdown_phrase(*seconds_left))
            } else {
                format!("{name}: {} remaining.", countdown_phrase(*seconds_left))
            },
        },
        WarEvent::Ended { name, channel } => Announcement {
            target: channel.clone(),
            kind: ActionKind::Notice,
            text: format!("WordWar: '{name}' is over!"),
        },
        WarEvent::EndedEarly { name, channel, by: _ } => Announcement {
            target: channel.clone(),
            kind: ActionKind::Message,
            text: format!("The war '{name}' has been ended."),
        },
    }
}

/// Seconds-form below one minute, minutes-form at and above it.
fn countdown_phrase(seconds: u64) -> String {
    if seconds < 60 {
        unit_phrase(seconds, "second")
    } else {
        unit_phrase(seconds / 60, "minute")
    }
}

/// Render a whole number of minutes, falling back to seconds-form for
/// sub-minute values (only reachable from odd configuration).
fn minutes_phrase(seconds: u64) -> String {
    if seconds < 60 {
        unit_phrase(seconds, "second")
    } else {
        unit_phrase(seconds / 60, "minute")
    }
}

/// `1 second` / `5 seconds` with the plural chosen at exactly 1.
fn unit_phrase(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}
