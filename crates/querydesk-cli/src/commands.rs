//! Slash-command parsing for the REPL.
//!
//! Thread and message numbers are typed 1-based, as listed on screen, and
//! converted to 0-based indices here.

use querydesk_core::session::Axis;
use thiserror::Error;

/// Commands offered for completion.
pub const COMMAND_NAMES: [&str; 12] = [
    "/new", "/threads", "/switch", "/show", "/delete", "/yes", "/no", "/axis", "/export",
    "/logout", "/help", "/quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: a question for the backend.
    Ask(String),
    New,
    Threads,
    Switch(usize),
    /// Reprints the active thread.
    Show,
    Delete(usize),
    Confirm,
    Cancel,
    Axis {
        message: usize,
        axis: Axis,
        column: Option<String>,
    },
    Export(usize),
    Logout,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (type /help)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Expected a number from 1, got '{0}'")]
    BadNumber(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Ok(Command::Ask(line.to_string()));
        }

        let (name, tail) = split_token(trimmed);
        let args: Vec<&str> = tail.split_whitespace().collect();

        match name {
            "/new" => Ok(Command::New),
            "/threads" => Ok(Command::Threads),
            "/show" => Ok(Command::Show),
            "/yes" => Ok(Command::Confirm),
            "/no" => Ok(Command::Cancel),
            "/logout" => Ok(Command::Logout),
            "/help" => Ok(Command::Help),
            "/quit" | "/exit" => Ok(Command::Quit),
            "/switch" => Ok(Command::Switch(single_number(&args, "/switch <thread>")?)),
            "/delete" => Ok(Command::Delete(single_number(&args, "/delete <thread>")?)),
            "/export" => Ok(Command::Export(single_number(&args, "/export <message>")?)),
            "/axis" => parse_axis(tail),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

const AXIS_USAGE: &str = "/axis <message> x|y [column]";

/// Splits off the first whitespace-delimited token; the remainder keeps its
/// inner spacing.
fn split_token(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim_start()),
        None => (text, ""),
    }
}

fn parse_axis(tail: &str) -> Result<Command, CommandError> {
    let (message, tail) = split_token(tail);
    let (axis, column) = split_token(tail);
    if message.is_empty() || axis.is_empty() {
        return Err(CommandError::Usage(AXIS_USAGE));
    }
    let axis = match axis.to_ascii_lowercase().as_str() {
        "x" => Axis::X,
        "y" => Axis::Y,
        _ => return Err(CommandError::Usage(AXIS_USAGE)),
    };
    // Column names are taken verbatim, inner spaces included
    let column = (!column.is_empty()).then(|| column.to_string());

    Ok(Command::Axis {
        message: to_index(message)?,
        axis,
        column,
    })
}

fn single_number(args: &[&str], usage: &'static str) -> Result<usize, CommandError> {
    match args {
        [value] => to_index(value),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn to_index(value: &str) -> Result<usize, CommandError> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::BadNumber(value.to_string())),
    }
}
