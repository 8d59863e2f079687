// src/core/protocol/reply.rs

//! Server-to-client messages.

use std::fmt;

pub const HELP_TEXT: &str = "Here are the messages you can send to the server\n\
LOOK :== 'look'\n\
DIG :== 'dig' SPACE X SPACE Y\n\
FLAG :== 'flag' SPACE X SPACE Y\n\
DEFLAG :== 'deflag' SPACE X SPACE Y\n\
HELP_REQ :== 'help'\n\
BYE :== 'bye'";

/// One message sent to a client. The codec terminates each with a single `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Sent once on connect with the live player count, including the new player.
    Welcome { players: usize },
    /// A board rendering, already `\n`-terminated per row.
    Board(String),
    Help,
    Boom,
    Bye,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Welcome { players } => write!(
                f,
                "Welcome to Minesweeper. {players} people are playing including you. Type 'help' for help."
            ),
            Reply::Board(render) => f.write_str(render),
            Reply::Help => f.write_str(HELP_TEXT),
            Reply::Boom => f.write_str("BOOM!"),
            Reply::Bye => f.write_str("bye"),
        }
    }
}
