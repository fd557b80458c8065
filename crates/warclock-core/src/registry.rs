//! The war registry: name-keyed storage plus the once-per-second tick.
//!
//! The registry owns every live [`War`] and is the only code allowed to
//! advance their countdowns. It is deliberately not thread-safe on its
//! own -- the [`Scheduler`] wraps it in a mutex and every entry point
//! (tick, start, end, listing, muzzle checks) goes through that single
//! lock, so a tick can never observe a half-constructed war.
//!
//! Wars are stored in insertion order. Listings are expected to come
//! back in the order wars were declared, not sorted by time remaining,
//! so the backing store is a `Vec` with linear key lookup; war counts
//! are small (a handful per channel at the very worst).
//!
//! [`Scheduler`]: crate::scheduler::Scheduler

use tracing::{debug, info};
use warclock_types::{WarEvent, WarPhase, WarSnapshot};

use crate::war::{CountdownStep, War};

/// Errors returned by registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WarError {
    /// A war with the same case-insensitive name already exists.
    #[error("there is already a war with the name '{name}'")]
    AlreadyExists {
        /// The conflicting display-form name.
        name: String,
    },

    /// No war with the given name exists.
    #[error("no war with the name '{name}'")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The requester may not end this war.
    #[error("only the starter of a war (or an admin) can end it early")]
    NotAuthorized {
        /// The display-form name of the war.
        name: String,
    },
}

/// Insertion-ordered collection of live wars.
#[derive(Debug, Default)]
pub struct WarRegistry {
    wars: Vec<War>,
}

impl WarRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self { wars: Vec::new() }
    }

    /// Number of live wars.
    pub fn len(&self) -> usize {
        self.wars.len()
    }

    /// Whether the registry holds no wars.
    pub fn is_empty(&self) -> bool {
        self.wars.is_empty()
    }

    /// Start a new war.
    ///
    /// Duration validation (>= 60 seconds) happens in the command layer
    /// before this is reached; the registry only enforces name
    /// uniqueness. A zero start delay creates the war directly in
    /// `Running` and the returned events include [`WarEvent::Begun`];
    /// otherwise a [`WarEvent::Scheduled`] confirmation is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WarError::AlreadyExists`] if a war with the same
    /// case-insensitive name is live.
    pub fn start_war(
        &mut self,
        name: &str,
        starter: &str,
        channel: &str,
        duration_secs: u64,
        start_delay_secs: u64,
    ) -> Result<Vec<WarEvent>, WarError> {
        let key = name.to_lowercase();
        if self.wars.iter().any(|war| war.key() == key) {
            return Err(WarError::AlreadyExists {
                name: name.to_owned(),
            });
        }

        let war = War::new(name, starter, channel, duration_secs, start_delay_secs);
        info!(
            war = war.name(),
            channel = war.channel(),
            starter = war.starter(),
            duration_secs,
            start_delay_secs,
            "War declared"
        );

        let events = if start_delay_secs == 0 {
            vec![WarEvent::Begun {
                name: war.name().to_owned(),
                channel: war.channel().to_owned(),
                duration_secs,
            }]
        } else {
            vec![WarEvent::Scheduled {
                name: war.name().to_owned(),
                channel: war.channel().to_owned(),
                starter: war.starter().to_owned(),
                start_in_secs: start_delay_secs,
            }]
        };

        self.wars.push(war);
        Ok(events)
    }

    /// End a war before its natural expiry.
    ///
    /// Only the original starter (case-insensitive nick match) or an
    /// admin may do this. The war is removed and an
    /// [`WarEvent::EndedEarly`] is returned for announcement.
    ///
    /// # Errors
    ///
    /// Returns [`WarError::NotFound`] for an unknown name and
    /// [`WarError::NotAuthorized`] when the requester is neither the
    /// starter nor an admin. Neither failure mutates any counter.
    pub fn end_war(
        &mut self,
        name: &str,
        requester: &str,
        is_admin: bool,
    ) -> Result<WarEvent, WarError> {
        let key = name.to_lowercase();
        let position = self
            .wars
            .iter()
            .position(|war| war.key() == key)
            .ok_or_else(|| WarError::NotFound {
                name: name.to_owned(),
            })?;

        let authorized = is_admin
            || self
                .wars
                .get(position)
                .is_some_and(|war| war.started_by(requester));
        if !authorized {
            let display = self
                .wars
                .get(position)
                .map_or_else(|| name.to_owned(), |war| war.name().to_owned());
            return Err(WarError::NotAuthorized { name: display });
        }

        let war = self.wars.remove(position);
        info!(
            war = war.name(),
            channel = war.channel(),
            by = requester,
            "War killed"
        );
        Ok(WarEvent::EndedEarly {
            name: war.name().to_owned(),
            channel: war.channel().to_owned(),
            by: requester.to_owned(),
        })
    }

    /// Advance every live war by one second.
    ///
    /// Called once per second by the war-clock driver, always under the
    /// scheduler lock so the whole pass is atomic with respect to
    /// concurrent start/end calls. Finished wars are removed before the
    /// method returns; their [`WarEvent::Ended`] is the last event they
    /// ever produce.
    pub fn tick(&mut self) -> Vec<WarEvent> {
        let mut events = Vec::new();
        let mut finished: Vec<String> = Vec::new();

        for war in &mut self.wars {
            match war.advance() {
                CountdownStep::Quiet => {}
                CountdownStep::AnnounceStart(seconds_left) => {
                    events.push(WarEvent::StartCountdown {
                        name: war.name().to_owned(),
                        channel: war.channel().to_owned(),
                        seconds_left,
                    });
                }
                CountdownStep::Begun => {
                    events.push(WarEvent::Begun {
                        name: war.name().to_owned(),
                        channel: war.channel().to_owned(),
                        duration_secs: war.duration_secs(),
                    });
                }
                CountdownStep::AnnounceEnd(seconds_left) => {
                    events.push(WarEvent::EndCountdown {
                        name: war.name().to_owned(),
                        channel: war.channel().to_owned(),
                        seconds_left,
                    });
                }
                CountdownStep::Finished => {
                    debug!(war = war.name(), channel = war.channel(), "War finished");
                    events.push(WarEvent::Ended {
                        name: war.name().to_owned(),
                        channel: war.channel().to_owned(),
                    });
                    finished.push(war.key().to_owned());
                }
            }
        }

        if !finished.is_empty() {
            self.wars
                .retain(|war| !finished.iter().any(|key| key == war.key()));
        }

        events
    }

    /// Snapshots of the wars in the given channel, insertion order.
    pub fn wars_in(&self, channel: &str) -> Vec<WarSnapshot> {
        self.wars
            .iter()
            .filter(|war| war.is_in_channel(channel))
            .map(War::snapshot)
            .collect()
    }

    /// Snapshots of every live war, insertion order.
    pub fn all_wars(&self) -> Vec<WarSnapshot> {
        self.wars.iter().map(War::snapshot).collect()
    }

    /// Whether any war in the given channel is currently running.
    ///
    /// Running wars implicitly muzzle ambient chatter in their channel;
    /// merely scheduled wars do not.
    pub fn has_running_in(&self, channel: &str) -> bool {
        self.wars
            .iter()
            .any(|war| war.is_in_channel(channel) && war.phase() == WarPhase::Running)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> WarRegistry {
        let mut registry = WarRegistry::new();
        for name in names {
            registry
                .start_war(name, "ada", "#writing", 600, 0)
                .unwrap();
        }
        registry
    }

    #[test]
    fn distinct_names_all_accepted() {
        let registry = registry_with(&["alpha", "beta", "gamma"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_name_differing_only_in_case_rejected() {
        let mut registry = registry_with(&["Morning Sprint"]);
        let result = registry.start_war("MORNING sprint", "grace", "#writing", 600, 0);
        assert!(matches!(result, Err(WarError::AlreadyExists { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_channel_different_names_coexist() {
        let registry = registry_with(&["alpha", "beta"]);
        assert_eq!(registry.wars_in("#writing").len(), 2);
    }

    #[test]
    fn immediate_start_emits_begun() {
        let mut registry = WarRegistry::new();
        let events = registry
            .start_war("sprint", "ada", "#writing", 60, 0)
            .unwrap();
        assert!(matches!(
            events.as_slice(),
            [WarEvent::Begun { duration_secs: 60, .. }]
        ));
    }

    #[test]
    fn delayed_start_emits_scheduled() {
        let mut registry = WarRegistry::new();
        let events = registry
            .start_war("sprint", "ada", "#writing", 60, 300)
            .unwrap();
        assert!(matches!(
            events.as_slice(),
            [WarEvent::Scheduled { start_in_secs: 300, .. }]
        ));
    }

    #[test]
    fn sixty_second_war_is_gone_after_sixty_ticks() {
        let mut registry = WarRegistry::new();
        registry.start_war("sprint", "ada", "#writing", 60, 0).unwrap();
        for _ in 0..59 {
            let _ = registry.tick();
            assert_eq!(registry.len(), 1);
        }
        let events = registry.tick();
        assert!(events
            .iter()
            .any(|e| matches!(e, WarEvent::Ended { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn delayed_war_lifecycle_matches_spec_timings() {
        let mut registry = WarRegistry::new();
        registry
            .start_war("sprint", "ada", "#writing", 120, 30)
            .unwrap();

        let mut all_events = Vec::new();
        for _ in 0..30 {
            all_events.extend(registry.tick());
        }
        // After 30 ticks the war is running with the full 120 on the clock.
        let snaps = registry.wars_in("#writing");
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps.first().map(|s| s.remaining_secs), Some(120));
        assert!(all_events
            .iter()
            .any(|e| matches!(e, WarEvent::Begun { .. })));

        for _ in 30..150 {
            all_events.extend(registry.tick());
        }
        assert!(registry.is_empty());
        assert!(all_events
            .iter()
            .any(|e| matches!(e, WarEvent::Ended { .. })));
    }

    #[test]
    fn countdown_event_count_over_600s_run() {
        let mut registry = WarRegistry::new();
        registry.start_war("sprint", "ada", "#writing", 600, 0).unwrap();
        let mut countdowns: i32 = 0;
        while !registry.is_empty() {
            for event in registry.tick() {
                if matches!(event, WarEvent::EndCountdown { .. }) {
                    countdowns = countdowns.saturating_add(1);
                }
            }
        }
        assert_eq!(countdowns, 8);
    }

    #[test]
    fn end_war_by_starter_removes_it() {
        let mut registry = registry_with(&["sprint"]);
        let event = registry.end_war("SPRINT", "ada", false).unwrap();
        assert!(matches!(event, WarEvent::EndedEarly { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn end_war_by_admin_removes_it() {
        let mut registry = registry_with(&["sprint"]);
        let result = registry.end_war("sprint", "grace", true);
        assert!(result.is_ok());
        assert!(registry.is_empty());
    }

    #[test]
    fn end_war_by_stranger_rejected_without_mutation() {
        let mut registry = WarRegistry::new();
        registry
            .start_war("sprint", "ada", "#writing", 120, 30)
            .unwrap();
        let before = registry.all_wars();

        let result = registry.end_war("sprint", "mallory", false);
        assert!(matches!(result, Err(WarError::NotAuthorized { .. })));
        assert_eq!(registry.all_wars(), before);
    }

    #[test]
    fn end_unknown_war_not_found() {
        let mut registry = WarRegistry::new();
        let result = registry.end_war("ghost", "ada", true);
        assert!(matches!(result, Err(WarError::NotFound { .. })));
    }

    #[test]
    fn listings_preserve_insertion_order() {
        let registry = registry_with(&["zeta", "alpha", "mu"]);
        let names: Vec<String> = registry
            .all_wars()
            .into_iter()
            .map(|snap| snap.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn running_war_counts_for_muzzle_scheduled_does_not() {
        let mut registry = WarRegistry::new();
        registry
            .start_war("pending", "ada", "#writing", 120, 30)
            .unwrap();
        assert!(!registry.has_running_in("#writing"));

        registry
            .start_war("live", "ada", "#writing", 120, 0)
            .unwrap();
        assert!(registry.has_running_in("#writing"));
        assert!(!registry.has_running_in("#other"));
    }
}
