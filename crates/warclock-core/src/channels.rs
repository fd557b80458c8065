//! Per-channel chatter state and the channel directory.
//!
//! Channel names are normalized to lowercase for lookups; the directory
//! is keyed storage only and carries no timing logic of its own.

use std::collections::BTreeMap;

use warclock_types::AmbientKind;

use crate::config::ChannelSeed;

/// Which ambient idle behaviors a channel has enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientToggles {
    /// Random markov say/emote lines.
    pub markov: bool,
    /// Amusement-module random acts.
    pub amusement: bool,
    /// The fixed "I'm bored." message.
    pub bored: bool,
    /// Velociraptor swarms.
    pub velociraptors: bool,
}

impl Default for AmbientToggles {
    fn default() -> Self {
        Self {
            markov: true,
            amusement: true,
            bored: true,
            velociraptors: true,
        }
    }
}

impl AmbientToggles {
    /// The currently-enabled ambient kinds, in palette order.
    pub fn enabled_kinds(&self) -> Vec<AmbientKind> {
        let mut kinds = Vec::new();
        if self.markov {
            kinds.push(AmbientKind::Markov);
        }
        if self.amusement {
            kinds.push(AmbientKind::Amusement);
        }
        if self.bored {
            kinds.push(AmbientKind::Bored);
        }
        if self.velociraptors {
            kinds.push(AmbientKind::Velociraptors);
        }
        kinds
    }

    /// Set the toggle for one ambient kind.
    pub const fn set(&mut self, kind: AmbientKind, enabled: bool) {
        match kind {
            AmbientKind::Markov => self.markov = enabled,
            AmbientKind::Amusement => self.amusement = enabled,
            AmbientKind::Bored => self.bored = enabled,
            AmbientKind::Velociraptors => self.velociraptors = enabled,
        }
    }
}

/// Mutable per-channel chatter state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelState {
    /// Channel name as first seen (display form).
    pub name: String,
    /// Whether ambient chatter is administratively muzzled here.
    pub muzzled: bool,
    /// Percent chance per idle tick of firing an ambient behavior.
    pub random_chatter_level: f64,
    /// Which ambient behaviors are enabled here.
    pub toggles: AmbientToggles,
    /// Unix seconds of the last successful chatter trigger.
    pub last_chatter_secs: u64,
}

impl ChannelState {
    /// Create channel state with everything enabled and the clock set
    /// to `now_secs`.
    pub fn new(name: &str, now_secs: u64) -> Self {
        Self {
            name: name.to_owned(),
            muzzled: false,
            random_chatter_level: 10.0,
            toggles: AmbientToggles::default(),
            last_chatter_secs: now_secs,
        }
    }

    /// Create channel state from a config seed entry.
    pub fn from_seed(seed: &ChannelSeed, now_secs: u64) -> Self {
        Self {
            name: seed.name.clone(),
            muzzled: seed.muzzled,
            random_chatter_level: seed.random_chatter_level,
            toggles: AmbientToggles {
                markov: seed.markov,
                amusement: seed.amusement,
                bored: seed.bored,
                velociraptors: seed.velociraptors,
            },
            last_chatter_secs: now_secs,
        }
    }
}

/// Lowercase-keyed directory of known channels.
#[derive(Debug, Default)]
pub struct ChannelDirectory {
    channels: BTreeMap<String, ChannelState>,
}

impl ChannelDirectory {
    /// Create an empty directory.
    pub const fn new() -> Self {
        Self {
            channels: BTreeMap::new(),
        }
    }

    /// Number of known channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Register a channel if it is not already known. Returns whether a
    /// new entry was created.
    pub fn register(&mut self, state: ChannelState) -> bool {
        let key = state.name.to_lowercase();
        if self.channels.contains_key(&key) {
            return false;
        }
        self.channels.insert(key, state);
        true
    }

    /// Look up a channel (case-insensitive).
    pub fn get(&self, channel: &str) -> Option<&ChannelState> {
        self.channels.get(&channel.to_lowercase())
    }

    /// Mutable lookup (case-insensitive).
    pub fn get_mut(&mut self, channel: &str) -> Option<&mut ChannelState> {
        self.channels.get_mut(&channel.to_lowercase())
    }

    /// Iterate over all channel states.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelState> {
        self.channels.values()
    }

    /// Mutable iteration over all channel states.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChannelState> {
        self.channels.values_mut()
    }
}
