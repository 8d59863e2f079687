// src/core/protocol/command.rs

//! Parses one input line into a typed `Command`.
//!
//! The grammar is exact: a keyword, optionally followed by two non-negative
//! decimal integers, separated by single spaces. Anything else is
//! unrecognized, which is not an error: the connection simply ignores it.

/// A recognized client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Look,
    Dig { x: usize, y: usize },
    Flag { x: usize, y: usize },
    Deflag { x: usize, y: usize },
    Help,
    Bye,
}

impl Command {
    /// Parses a single line (without its terminator). Returns `None` if the
    /// line does not match the grammar exactly.
    pub fn parse(line: &str) -> Option<Command> {
        let mut tokens = line.split(' ');
        let keyword = tokens.next()?;

        let command = match keyword {
            "look" => Command::Look,
            "help" => Command::Help,
            "bye" => Command::Bye,
            "dig" | "flag" | "deflag" => {
                let x = parse_coordinate(tokens.next()?)?;
                let y = parse_coordinate(tokens.next()?)?;
                match keyword {
                    "dig" => Command::Dig { x, y },
                    "flag" => Command::Flag { x, y },
                    _ => Command::Deflag { x, y },
                }
            }
            _ => return None,
        };

        if tokens.next().is_some() {
            return None;
        }
        Some(command)
    }

    /// The protocol keyword, used for logging and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Look => "look",
            Command::Dig { .. } => "dig",
            Command::Flag { .. } => "flag",
            Command::Deflag { .. } => "deflag",
            Command::Help => "help",
            Command::Bye => "bye",
        }
    }
}

/// A non-empty run of ASCII digits. Values too large for `usize` saturate,
/// which keeps them syntactically valid but out of range for any board.
fn parse_coordinate(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse().unwrap_or(usize::MAX))
}
