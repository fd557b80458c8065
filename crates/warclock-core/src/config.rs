//! Configuration loading and typed config structures for the Warclock bot.
//!
//! The canonical configuration lives in `warclock-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates
//! the file.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level bot configuration.
///
/// Mirrors the structure of `warclock-config.yaml`. All fields have
/// defaults matching the constants the bot shipped with originally.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BotConfig {
    /// Identity settings (nickname, admin nicks).
    #[serde(default)]
    pub bot: IdentityConfig,

    /// Word-war limits and conventions.
    #[serde(default)]
    pub wars: WarConfig,

    /// Ambient chatter odds parameters.
    #[serde(default)]
    pub chatter: ChatterConfig,

    /// Idle-ticker parameters.
    #[serde(default)]
    pub idle: IdleConfig,

    /// Tick cadence settings.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Channels to seed the directory with at startup.
    #[serde(default)]
    pub channels: Vec<ChannelSeed>,
}

impl BotConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityConfig {
    /// Nick the bot answers to (mention detection is case-insensitive).
    #[serde(default = "default_nickname")]
    pub nickname: String,

    /// Nicks allowed to use `$`-prefixed admin commands and to end any war.
    #[serde(default)]
    pub admins: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            nickname: default_nickname(),
            admins: Vec::new(),
        }
    }
}

/// Word-war limits and conventions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarConfig {
    /// Minimum accepted war duration in seconds.
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: u64,

    /// Start delay applied when `!startwar` omits one (the five-minute
    /// convention). `now` always maps to 0 regardless of this value.
    #[serde(default = "default_start_delay_secs")]
    pub default_start_delay_secs: u64,
}

impl Default for WarConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: default_min_duration_secs(),
            default_start_delay_secs: default_start_delay_secs(),
        }
    }
}

/// Ambient chatter odds parameters.
///
/// A stored value of 0 for any field means "use the built-in default",
/// matching how the original settings table was interpreted. Call
/// [`ChatterConfig::normalized`] before handing values to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChatterConfig {
    /// Cap applied to the idle-time base odds (percent).
    #[serde(default = "default_max_base_odds")]
    pub max_base_odds: u32,

    /// Multiplier applied when a message mentions the bot's nick.
    #[serde(default = "default_name_multiplier")]
    pub name_multiplier: u32,

    /// Multiplier applied to `ln(elapsed)` when computing base odds.
    #[serde(default = "default_time_multiplier")]
    pub time_multiplier: u32,

    /// Divisor controlling how far the cooldown clock advances on fire.
    #[serde(default = "default_time_divisor")]
    pub time_divisor: u32,
}

impl ChatterConfig {
    /// Replace any zero field with its built-in default.
    pub const fn normalized(self) -> Self {
        Self {
            max_base_odds: if self.max_base_odds == 0 {
                default_max_base_odds()
            } else {
                self.max_base_odds
            },
            name_multiplier: if self.name_multiplier == 0 {
                default_name_multiplier()
            } else {
                self.name_multiplier
            },
            time_multiplier: if self.time_multiplier == 0 {
                default_time_multiplier()
            } else {
                self.time_multiplier
            },
            time_divisor: if self.time_divisor == 0 {
                default_time_divisor()
            } else {
                self.time_divisor
            },
        }
    }
}

impl Default for ChatterConfig {
    fn default() -> Self {
        Self {
            max_base_odds: default_max_base_odds(),
            name_multiplier: default_name_multiplier(),
            time_multiplier: default_time_multiplier(),
            time_divisor: default_time_divisor(),
        }
    }
}

/// Idle-ticker parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IdleConfig {
    /// Percent chance per idle tick of forwarding a generated line to
    /// the social-post collaborator, independent of channel state.
    #[serde(default = "default_social_post_pct")]
    pub social_post_pct: u32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            social_post_pct: default_social_post_pct(),
        }
    }
}

/// Tick cadence settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Milliseconds between war-clock ticks (countdowns assume 1000).
    #[serde(default = "default_war_tick_ms")]
    pub war_tick_ms: u64,

    /// Seconds between idle-ticker passes.
    #[serde(default = "default_idle_tick_secs")]
    pub idle_tick_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            war_tick_ms: default_war_tick_ms(),
            idle_tick_secs: default_idle_tick_secs(),
        }
    }
}

/// A channel entry seeded into the directory at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelSeed {
    /// Channel name (stored lowercase internally).
    pub name: String,

    /// Whether ambient chatter is muzzled in this channel.
    #[serde(default)]
    pub muzzled: bool,

    /// Percent chance per idle tick of firing an ambient behavior.
    #[serde(default = "default_random_chatter_level")]
    pub random_chatter_level: f64,

    /// Whether the markov ambient behavior is enabled.
    #[serde(default = "default_true")]
    pub markov: bool,

    /// Whether the amusement ambient behavior is enabled.
    #[serde(default = "default_true")]
    pub amusement: bool,

    /// Whether the "I'm bored." ambient behavior is enabled.
    #[serde(default = "default_true")]
    pub bored: bool,

    /// Whether the velociraptor-swarm ambient behavior is enabled.
    #[serde(default = "default_true")]
    pub velociraptors: bool,
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_nickname() -> String {
    "warclock".to_owned()
}

const fn default_min_duration_secs() -> u64 {
    60
}

const fn default_start_delay_secs() -> u64 {
    300
}

const fn default_max_base_odds() -> u32 {
    20
}

const fn default_name_multiplier() -> u32 {
    4
}

const fn default_time_multiplier() -> u32 {
    4
}

const fn default_time_divisor() -> u32 {
    2
}

const fn default_social_post_pct() -> u32 {
    1
}

const fn default_war_tick_ms() -> u64 {
    1000
}

const fn default_idle_tick_secs() -> u64 {
    60
}

const fn default_random_chatter_level() -> f64 {
    10.0
}

const fn default_true() -> bool {
    true
}
