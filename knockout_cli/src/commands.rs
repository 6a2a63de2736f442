use knockout::account::DEFAULT_LEADERBOARD_LIMIT;
use pico_args::Arguments;
use std::fmt;
use uuid::Uuid;

/// Players in a demo tournament when `--players` is not given
pub const DEFAULT_DEMO_PLAYERS: u32 = 8;

/// A parsed subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateAccount { name: String },
    CreateTournament { name: String },
    Join { tournament_id: Uuid, account_id: Uuid },
    Run { tournament_id: Uuid },
    Show { tournament_id: Uuid },
    Leaderboard { limit: u32 },
    Demo { players: u32 },
}

impl Command {
    /// Whether the command needs a PostgreSQL connection
    pub fn needs_database(&self) -> bool {
        !matches!(self, Command::Demo { .. })
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No subcommand given.
    MissingCommand,
    /// Unrecognized subcommand.
    UnrecognizedCommand(String),
    /// Required positional argument absent.
    MissingArgument(&'static str),
    /// Argument present but not parseable.
    InvalidArgument { name: &'static str, reason: String },
    /// Demo needs at least two players.
    TooFewPlayers(u32),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCommand => write!(f, "No command given. Run with --help for usage"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Run with --help to see available commands"
            ),
            Self::MissingArgument(name) => write!(f, "Missing required argument {name}"),
            Self::InvalidArgument { name, reason } => write!(f, "Invalid {name}: {reason}"),
            Self::TooFewPlayers(n) => {
                write!(f, "A tournament needs at least 2 players, got {n}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse the subcommand and its arguments
///
/// Global options must already have been consumed from `pargs`.
pub fn parse_command(pargs: &mut Arguments) -> Result<Command, ParseError> {
    let subcommand = pargs
        .subcommand()
        .map_err(|e| invalid("command", e))?
        .ok_or(ParseError::MissingCommand)?;

    match subcommand.as_str() {
        "create-account" => Ok(Command::CreateAccount {
            name: required(pargs, "NAME")?,
        }),
        "create-tournament" => Ok(Command::CreateTournament {
            name: required(pargs, "NAME")?,
        }),
        "join" => Ok(Command::Join {
            tournament_id: required(pargs, "TOURNAMENT_ID")?,
            account_id: required(pargs, "ACCOUNT_ID")?,
        }),
        "run" => Ok(Command::Run {
            tournament_id: required(pargs, "TOURNAMENT_ID")?,
        }),
        "show" => Ok(Command::Show {
            tournament_id: required(pargs, "TOURNAMENT_ID")?,
        }),
        "leaderboard" => Ok(Command::Leaderboard {
            limit: pargs
                .opt_value_from_str("--limit")
                .map_err(|e| invalid("--limit", e))?
                .unwrap_or(DEFAULT_LEADERBOARD_LIMIT),
        }),
        "demo" => {
            let players = pargs
                .opt_value_from_str("--players")
                .map_err(|e| invalid("--players", e))?
                .unwrap_or(DEFAULT_DEMO_PLAYERS);
            if players < 2 {
                return Err(ParseError::TooFewPlayers(players));
            }
            Ok(Command::Demo { players })
        }
        other => Err(ParseError::UnrecognizedCommand(other.to_string())),
    }
}

fn required<T>(pargs: &mut Arguments, name: &'static str) -> Result<T, ParseError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match pargs.free_from_str() {
        Ok(value) => Ok(value),
        Err(pico_args::Error::MissingArgument) => Err(ParseError::MissingArgument(name)),
        Err(e) => Err(invalid(name, e)),
    }
}

fn invalid(name: &'static str, err: pico_args::Error) -> ParseError {
    ParseError::InvalidArgument {
        name,
        reason: err.to_string(),
    }
}
