//! The word-war countdown state machine.
//!
//! A war is a pair of second-granularity countdowns: time-to-start and
//! remaining fighting time. Exactly one of the two is non-zero at any
//! moment the war exists:
//!
//! - `Scheduled`: `time_to_start > 0`, `remaining == 0`
//! - `Running`: `time_to_start == 0`, `remaining > 0`
//!
//! The transition to `Running` happens exactly once, when time-to-start
//! reaches zero; `remaining` is loaded from the stored duration at that
//! moment. When `remaining` reaches zero the war is finished and the
//! registry removes it -- there is no `Ended` state to observe.
//!
//! # Design Principles
//!
//! - Counters only decrease, and only via [`War::advance`], which the
//!   registry calls exactly once per clock tick under the scheduler lock.
//! - All countdown arithmetic is saturating (no silent wraparound).
//! - The state machine is pure: it reports what happened through
//!   [`CountdownStep`] and never performs I/O.

use warclock_types::{WarPhase, WarSnapshot};

/// What a single one-second advance did to a war's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// A counter decreased but crossed no announcement threshold.
    Quiet,
    /// Time-to-start crossed an announcement threshold.
    AnnounceStart(u64),
    /// Time-to-start reached zero; the war is now running.
    Begun,
    /// Remaining time crossed an announcement threshold.
    AnnounceEnd(u64),
    /// Remaining time reached zero; the war is finished.
    Finished,
}

/// A single word war.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct War {
    /// Display-form name (original capitalization preserved).
    name: String,
    /// Lowercased name used for registry lookups.
    key: String,
    /// Nick of the user who started the war.
    starter: String,
    /// Channel the war runs in.
    channel: String,
    /// Total fighting duration in seconds.
    duration_secs: u64,
    /// Seconds until the war begins.
    time_to_start_secs: u64,
    /// Seconds of fighting time left (loaded from duration at begin).
    remaining_secs: u64,
}

impl War {
    /// Create a new war.
    ///
    /// A zero `start_delay_secs` creates the war directly in `Running`
    /// with the full duration on the clock; otherwise the war starts in
    /// `Scheduled` and the duration is held back until it begins.
    pub fn new(
        name: &str,
        starter: &str,
        channel: &str,
        duration_secs: u64,
        start_delay_secs: u64,
    ) -> Self {
        let remaining_secs = if start_delay_secs == 0 {
            duration_secs
        } else {
            0
        };
        Self {
            name: name.to_owned(),
            key: name.to_lowercase(),
            starter: starter.to_owned(),
            channel: channel.to_owned(),
            duration_secs,
            time_to_start_secs: start_delay_secs,
            remaining_secs,
        }
    }

    /// Lowercased lookup key for this war's name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display-form war name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nick of the user who started the war.
    pub fn starter(&self) -> &str {
        &self.starter
    }

    /// Channel the war runs in.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Total fighting duration in seconds.
    pub const fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Current lifecycle phase, derived from the counters.
    pub const fn phase(&self) -> WarPhase {
        if self.time_to_start_secs > 0 {
            WarPhase::Scheduled
        } else {
            WarPhase::Running
        }
    }

    /// Whether this war runs in the given channel (case-insensitive).
    pub fn is_in_channel(&self, channel: &str) -> bool {
        self.channel.eq_ignore_ascii_case(channel)
    }

    /// Whether the given nick started this war (case-insensitive).
    pub fn started_by(&self, nick: &str) -> bool {
        self.starter.eq_ignore_ascii_case(nick)
    }

    /// Advance the war by one second and report what happened.
    ///
    /// Must be called at most once per clock tick; the registry owns
    /// that cadence. A `Finished` result means the caller should remove
    /// the war from the registry.
    pub fn advance(&mut self) -> CountdownStep {
        if self.time_to_start_secs > 0 {
            self.time_to_start_secs = self.time_to_start_secs.saturating_sub(1);
            if self.time_to_start_secs == 0 {
                self.remaining_secs = self.duration_secs;
                return CountdownStep::Begun;
            }
            if announce_at(self.time_to_start_secs) {
                return CountdownStep::AnnounceStart(self.time_to_start_secs);
            }
            return CountdownStep::Quiet;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return CountdownStep::Finished;
        }
        if announce_at(self.remaining_secs) {
            return CountdownStep::AnnounceEnd(self.remaining_secs);
        }
        CountdownStep::Quiet
    }

    /// Take a read-only snapshot of the war's current state.
    pub fn snapshot(&self) -> WarSnapshot {
        WarSnapshot {
            name: self.name.clone(),
            channel: self.channel.clone(),
            starter: self.starter.clone(),
            duration_secs: self.duration_secs,
            time_to_start_secs: self.time_to_start_secs,
            remaining_secs: self.remaining_secs,
        }
    }
}

/// Whether a countdown value is an announcement threshold.
///
/// Announcements fire at 60, 30, and the final five seconds, plus every
/// five minutes above that. The same set applies to both the start and
/// end countdowns.
pub const fn announce_at(seconds: u64) -> bool {
    matches!(seconds, 60 | 30 | 5 | 4 | 3 | 2 | 1) || (seconds > 0 && seconds % 300 == 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_starts_running() {
        let war = War::new("Sprint", "ada", "#writing", 60, 0);
        assert_eq!(war.phase(), WarPhase::Running);
        assert_eq!(war.snapshot().remaining_secs, 60);
        assert_eq!(war.snapshot().time_to_start_secs, 0);
    }

    #[test]
    fn nonzero_delay_starts_scheduled_with_duration_held_back() {
        let war = War::new("Sprint", "ada", "#writing", 120, 30);
        assert_eq!(war.phase(), WarPhase::Scheduled);
        assert_eq!(war.snapshot().time_to_start_secs, 30);
        // The invariant: exactly one counter is non-zero.
        assert_eq!(war.snapshot().remaining_secs, 0);
    }

    #[test]
    fn begins_exactly_when_delay_expires() {
        let mut war = War::new("Sprint", "ada", "#writing", 120, 30);
        for _ in 0..29 {
            let step = war.advance();
            assert_ne!(step, CountdownStep::Begun);
        }
        assert_eq!(war.advance(), CountdownStep::Begun);
        assert_eq!(war.phase(), WarPhase::Running);
        assert_eq!(war.snapshot().remaining_secs, 120);
    }

    #[test]
    fn finishes_exactly_when_duration_expires() {
        let mut war = War::new("Sprint", "ada", "#writing", 60, 0);
        for _ in 0..59 {
            let step = war.advance();
            assert_ne!(step, CountdownStep::Finished);
        }
        assert_eq!(war.advance(), CountdownStep::Finished);
    }

    #[test]
    fn counters_only_decrease() {
        let mut war = War::new("Sprint", "ada", "#writing", 120, 30);
        let mut last_tts = war.snapshot().time_to_start_secs;
        let mut last_rem = u64::MAX;
        for _ in 0..150 {
            let _ = war.advance();
            let snap = war.snapshot();
            assert!(snap.time_to_start_secs <= last_tts);
            if snap.time_to_start_secs == 0 {
                assert!(snap.remaining_secs <= last_rem);
                last_rem = snap.remaining_secs;
            }
            last_tts = snap.time_to_start_secs;
        }
    }

    #[test]
    fn announcement_thresholds_match_the_fixed_set() {
        let expected: Vec<u64> = vec![1, 2, 3, 4, 5, 30, 60, 300, 600, 900];
        for value in 0..=1000u64 {
            assert_eq!(
                announce_at(value),
                expected.contains(&value),
                "threshold mismatch at {value}"
            );
        }
    }

    #[test]
    fn declining_600s_run_announces_exactly_eight_times() {
        let mut war = War::new("Sprint", "ada", "#writing", 600, 0);
        let mut announcements = Vec::new();
        loop {
            match war.advance() {
                CountdownStep::AnnounceEnd(left) => announcements.push(left),
                CountdownStep::Finished => break,
                CountdownStep::Quiet => {}
                other => {
                    assert!(
                        false,
                        "unexpected step in running countdown: {other:?}"
                    );
                }
            }
        }
        assert_eq!(announcements, vec![300, 60, 30, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn start_countdown_announces_on_the_same_set() {
        let mut war = War::new("Sprint", "ada", "#writing", 60, 600);
        let mut announcements = Vec::new();
        loop {
            match war.advance() {
                CountdownStep::AnnounceStart(left) => announcements.push(left),
                CountdownStep::Begun => break,
                CountdownStep::Quiet => {}
                other => {
                    assert!(false, "unexpected step in start countdown: {other:?}");
                }
            }
        }
        assert_eq!(announcements, vec![300, 60, 30, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn key_is_lowercase() {
        let war = War::new("The GRAND Melee", "ada", "#writing", 60, 0);
        assert_eq!(war.key(), "the grand melee");
        assert_eq!(war.name(), "The GRAND Melee");
    }

    #[test]
    fn starter_check_ignores_case() {
        let war = War::new("Sprint", "Ada", "#writing", 60, 0);
        assert!(war.started_by("ada"));
        assert!(war.started_by("ADA"));
        assert!(!war.started_by("grace"));
    }
}
