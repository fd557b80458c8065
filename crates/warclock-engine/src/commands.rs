//! Parsing of `!`-prefixed user commands and `$`-prefixed admin
//! commands.
//!
//! Numeric parameters are parsed with explicit fallible parses consumed
//! via pattern matching; a parse failure becomes a typed
//! [`CommandError`] reported synchronously to the requester, and no
//! state is mutated on any error path.

use warclock_types::AmbientKind;

/// Errors produced while parsing or validating a command.
///
/// The `Display` form of each variant is the reply sent back to the
/// requester, so the wording stays close to what the bot always said.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// The duration argument did not parse as a number.
    #[error("could not understand the duration parameter. Was it numeric?")]
    BadDuration,

    /// The duration was below the configured minimum.
    #[error("duration must be at least {min_minutes} minute(s).")]
    DurationTooShort {
        /// Minimum accepted duration in whole minutes.
        min_minutes: u64,
    },

    /// The start-delay argument was neither a number nor `now`.
    #[error("could not understand the time to start parameter. Was it numeric?")]
    BadStartDelay,

    /// `!endwar` was called without a name.
    #[error("I need a war name to end.")]
    MissingWarName,

    /// The eggtimer argument did not parse as a number.
    #[error("could not understand first parameter. Was it numeric?")]
    BadEggTimer,

    /// A known command was called with unusable arguments.
    #[error("use: {usage}")]
    Usage {
        /// The usage string to echo back.
        usage: &'static str,
    },

    /// The command name is not one the bot knows.
    #[error("!{name} was not part of my training.")]
    UnknownCommand {
        /// The unrecognized command name.
        name: String,
    },

    /// The admin command name is not one the bot knows.
    #[error("${name} is not a valid admin command - try $help")]
    UnknownAdminCommand {
        /// The unrecognized admin command name.
        name: String,
    },
}

/// A parsed `!`-prefixed user command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `!startwar <durationMinutes> [<startDelayMinutes>|now] [<name>...]`
    StartWar {
        /// Fighting duration in seconds.
        duration_secs: u64,
        /// Explicit start delay in seconds; `None` means use the
        /// configured default.
        start_delay_secs: Option<u64>,
        /// Explicit war name; `None` means derive from the sender.
        name: Option<String>,
    },
    /// `!endwar <name...>`
    EndWar {
        /// Case-insensitive war name to end.
        name: String,
    },
    /// `!listwars` — wars in this channel, privately to the sender.
    ListWars,
    /// `!listall` — all wars everywhere, privately to the sender.
    ListAll,
    /// `!eggtimer [<minutes>]` — private notice after the given time.
    EggTimer {
        /// Minutes until the timer notice fires.
        minutes: f64,
    },
    /// `!help` — command list, privately to the sender.
    Help,
}

/// A parsed `$`-prefixed admin command.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    /// `$muzzle <#channel> <0/1>`
    Muzzle {
        /// Target channel.
        channel: String,
        /// New muzzle flag.
        flag: bool,
    },
    /// `$chatter <#channel> <kind> <0/1>`
    Chatter {
        /// Target channel.
        channel: String,
        /// Which ambient kind to toggle.
        kind: AmbientKind,
        /// New enabled flag.
        flag: bool,
    },
    /// `$chatterlevel <#channel> <percent>`
    ChatterLevel {
        /// Target channel.
        channel: String,
        /// New random-chatter level in percent.
        percent: f64,
    },
    /// `$help` — admin command list, privately to the sender.
    Help,
}

/// Usage string echoed back for a bare `!startwar`.
const STARTWAR_USAGE: &str = "!startwar <duration in min> [<time to start in min> [<name>]]";

/// Parse a `!`-prefixed message. Returns `None` when the message does
/// not carry the prefix at all.
///
/// # Errors
///
/// Returns a [`CommandError`] describing exactly what the requester got
/// wrong; the caller replies with its `Display` form.
pub fn parse_user(
    message: &str,
    min_duration_secs: u64,
) -> Option<Result<Command, CommandError>> {
    let body = message.strip_prefix('!')?;
    let mut words = body.split_whitespace();
    let command = words.next()?.to_lowercase();
    let args: Vec<&str> = words.collect();

    let parsed = match command.as_str() {
        "startwar" => parse_startwar(&args, min_duration_secs),
        "endwar" => {
            if args.is_empty() {
                Err(CommandError::MissingWarName)
            } else {
                Ok(Command::EndWar {
                    name: args.join(" "),
                })
            }
        }
        "listwars" => Ok(Command::ListWars),
        "listall" => Ok(Command::ListAll),
        "eggtimer" => parse_eggtimer(&args),
        "help" => Ok(Command::Help),
        other => Err(CommandError::UnknownCommand {
            name: other.to_owned(),
        }),
    };
    Some(parsed)
}

/// Parse a `$`-prefixed message. Returns `None` without the prefix.
///
/// # Errors
///
/// Returns a [`CommandError`] for malformed arguments or unknown
/// command names.
pub fn parse_admin(message: &str) -> Option<Result<AdminCommand, CommandError>> {
    let body = message.strip_prefix('$')?;
    let mut words = body.split_whitespace();
    let command = words.next()?.to_lowercase();
    let args: Vec<&str> = words.collect();

    let parsed = match command.as_str() {
        "muzzle" | "setmuzzleflag" => match args.as_slice() {
            [channel, flag] => Ok(AdminCommand::Muzzle {
                channel: (*channel).to_lowercase(),
                flag: *flag != "0",
            }),
            _ => Err(CommandError::Usage {
                usage: "$muzzle <#channel> <0/1>",
            }),
        },
        "chatter" => match args.as_slice() {
            [channel, kind, flag] => match parse_ambient_kind(kind) {
                Some(kind) => Ok(AdminCommand::Chatter {
                    channel: (*channel).to_lowercase(),
                    kind,
                    flag: *flag != "0",
                }),
                None => Err(CommandError::Usage {
                    usage: "$chatter <#channel> <markov|amusement|bored|velociraptors> <0/1>",
                }),
            },
            _ => Err(CommandError::Usage {
                usage: "$chatter <#channel> <markov|amusement|bored|velociraptors> <0/1>",
            }),
        },
        "chatterlevel" => match args.as_slice() {
            [channel, percent] => match percent.parse::<f64>() {
                Ok(percent) if (0.0..=100.0).contains(&percent) => {
                    Ok(AdminCommand::ChatterLevel {
                        channel: (*channel).to_lowercase(),
                        percent,
                    })
                }
                _ => Err(CommandError::Usage {
                    usage: "$chatterlevel <#channel> <0-100>",
                }),
            },
            _ => Err(CommandError::Usage {
                usage: "$chatterlevel <#channel> <0-100>",
            }),
        },
        "help" => Ok(AdminCommand::Help),
        other => Err(CommandError::UnknownAdminCommand {
            name: other.to_owned(),
        }),
    };
    Some(parsed)
}

/// Parse `!startwar` arguments.
fn parse_startwar(args: &[&str], min_duration_secs: u64) -> Result<Command, CommandError> {
    let Some(duration_arg) = args.first() else {
        return Err(CommandError::Usage {
            usage: STARTWAR_USAGE,
        });
    };

    let duration_secs = match duration_arg.parse::<f64>() {
        Ok(minutes) => minutes_to_secs(minutes).ok_or(CommandError::BadDuration)?,
        Err(_) => return Err(CommandError::BadDuration),
    };

    if duration_secs < min_duration_secs {
        return Err(CommandError::DurationTooShort {
            min_minutes: min_duration_secs.div_euclid(60).max(1),
        });
    }

    let start_delay_secs = match args.get(1) {
        None => None,
        Some(arg) if arg.eq_ignore_ascii_case("now") => Some(0),
        Some(arg) => match arg.parse::<f64>() {
            Ok(minutes) => Some(minutes_to_secs(minutes).ok_or(CommandError::BadStartDelay)?),
            Err(_) => return Err(CommandError::BadStartDelay),
        },
    };

    let name = if args.len() > 2 {
        Some(args.get(2..).unwrap_or_default().join(" "))
    } else {
        None
    };

    Ok(Command::StartWar {
        duration_secs,
        start_delay_secs,
        name,
    })
}

/// Parse `!eggtimer` arguments (default 15 minutes).
fn parse_eggtimer(args: &[&str]) -> Result<Command, CommandError> {
    let minutes = match args.first() {
        None => 15.0,
        Some(arg) => match arg.parse::<f64>() {
            Ok(minutes) if minutes > 0.0 && minutes.is_finite() => minutes,
            _ => return Err(CommandError::BadEggTimer),
        },
    };
    Ok(Command::EggTimer { minutes })
}

/// Convert fractional minutes to whole seconds, rejecting junk values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn minutes_to_secs(minutes: f64) -> Option<u64> {
    let seconds = minutes * 60.0;
    if !seconds.is_finite() || seconds < 0.0 || seconds > 1e12 {
        return None;
    }
    Some(seconds.floor() as u64)
}

/// Map an ambient-kind word to its enum value.
fn parse_ambient_kind(word: &str) -> Option<AmbientKind> {
    match word.to_lowercase().as_str() {
        "markov" => Some(AmbientKind::Markov),
        "amusement" => Some(AmbientKind::Amusement),
        "bored" => Some(AmbientKind::Bored),
        "velociraptors" | "velociraptor" => Some(AmbientKind::Velociraptors),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MIN: u64 = 60;

    fn user(message: &str) -> Result<Command, CommandError> {
        parse_user(message, MIN).unwrap()
    }

    #[test]
    fn non_command_messages_are_ignored() {
        assert!(parse_user("hello there", MIN).is_none());
        assert!(parse_admin("hello there").is_none());
    }

    #[test]
    fn startwar_minimal_form() {
        let command = user("!startwar 10").unwrap();
        assert_eq!(
            command,
            Command::StartWar {
                duration_secs: 600,
                start_delay_secs: None,
                name: None,
            }
        );
    }

    #[test]
    fn startwar_now_maps_delay_to_zero() {
        let command = user("!startwar 10 now").unwrap();
        assert_eq!(
            command,
            Command::StartWar {
                duration_secs: 600,
                start_delay_secs: Some(0),
                name: None,
            }
        );
    }

    #[test]
    fn startwar_with_delay_and_multiword_name() {
        let command = user("!startwar 25 5 The Grand Melee").unwrap();
        assert_eq!(
            command,
            Command::StartWar {
                duration_secs: 1500,
                start_delay_secs: Some(300),
                name: Some(String::from("The Grand Melee")),
            }
        );
    }

    #[test]
    fn startwar_fractional_minutes() {
        let command = user("!startwar 1.5 now").unwrap();
        assert_eq!(
            command,
            Command::StartWar {
                duration_secs: 90,
                start_delay_secs: Some(0),
                name: None,
            }
        );
    }

    #[test]
    fn startwar_non_numeric_duration_is_a_validation_error() {
        assert_eq!(user("!startwar ten"), Err(CommandError::BadDuration));
    }

    #[test]
    fn startwar_below_minimum_duration_rejected() {
        assert_eq!(
            user("!startwar 0.5"),
            Err(CommandError::DurationTooShort { min_minutes: 1 })
        );
    }

    #[test]
    fn startwar_bad_delay_rejected() {
        assert_eq!(user("!startwar 10 soon"), Err(CommandError::BadStartDelay));
    }

    #[test]
    fn startwar_without_arguments_prints_usage() {
        assert!(matches!(user("!startwar"), Err(CommandError::Usage { .. })));
    }

    #[test]
    fn endwar_joins_multiword_names() {
        let command = user("!endwar The Grand Melee").unwrap();
        assert_eq!(
            command,
            Command::EndWar {
                name: String::from("The Grand Melee"),
            }
        );
    }

    #[test]
    fn endwar_without_name_is_an_error() {
        assert_eq!(user("!endwar"), Err(CommandError::MissingWarName));
    }

    #[test]
    fn listing_commands_parse() {
        assert_eq!(user("!listwars").unwrap(), Command::ListWars);
        assert_eq!(user("!listall").unwrap(), Command::ListAll);
        assert_eq!(user("!help").unwrap(), Command::Help);
        assert_eq!(parse_admin("$help").unwrap().unwrap(), AdminCommand::Help);
    }

    #[test]
    fn eggtimer_defaults_to_fifteen_minutes() {
        let command = user("!eggtimer").unwrap();
        assert_eq!(command, Command::EggTimer { minutes: 15.0 });
    }

    #[test]
    fn eggtimer_rejects_non_numeric() {
        assert_eq!(user("!eggtimer soon"), Err(CommandError::BadEggTimer));
    }

    #[test]
    fn unknown_command_reports_its_name() {
        let error = user("!juggle").unwrap_err();
        assert_eq!(
            error,
            CommandError::UnknownCommand {
                name: String::from("juggle"),
            }
        );
        assert_eq!(error.to_string(), "!juggle was not part of my training.");
    }

    #[test]
    fn command_names_are_case_insensitive() {
        assert_eq!(user("!ListWars").unwrap(), Command::ListWars);
    }

    #[test]
    fn admin_muzzle_parses_flag_like_the_original() {
        let command = parse_admin("$muzzle #Writing 1").unwrap().unwrap();
        assert_eq!(
            command,
            AdminCommand::Muzzle {
                channel: String::from("#writing"),
                flag: true,
            }
        );
        // Anything that is not "0" counts as set.
        let command = parse_admin("$muzzle #writing yes").unwrap().unwrap();
        assert!(matches!(command, AdminCommand::Muzzle { flag: true, .. }));
        let command = parse_admin("$muzzle #writing 0").unwrap().unwrap();
        assert!(matches!(command, AdminCommand::Muzzle { flag: false, .. }));
    }

    #[test]
    fn admin_chatter_toggle_parses() {
        let command = parse_admin("$chatter #writing velociraptors 0")
            .unwrap()
            .unwrap();
        assert_eq!(
            command,
            AdminCommand::Chatter {
                channel: String::from("#writing"),
                kind: AmbientKind::Velociraptors,
                flag: false,
            }
        );
    }

    #[test]
    fn admin_chatterlevel_bounds_checked() {
        let ok = parse_admin("$chatterlevel #writing 15").unwrap();
        assert!(ok.is_ok());
        let too_high = parse_admin("$chatterlevel #writing 150").unwrap();
        assert!(matches!(too_high, Err(CommandError::Usage { .. })));
    }

    #[test]
    fn unknown_admin_command_reports_its_name() {
        let error = parse_admin("$frobnicate").unwrap().unwrap_err();
        assert_eq!(
            error.to_string(),
            "$frobnicate is not a valid admin command - try $help"
        );
    }
}
