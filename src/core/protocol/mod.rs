// src/core/protocol/mod.rs

//! The line-oriented wire protocol: input parsing, replies and the codec
//! that frames both on a socket.

pub mod codec;
pub mod command;
pub mod reply;

pub use codec::{LineCodec, MAX_LINE_LENGTH};
pub use command::Command;
pub use reply::{HELP_TEXT, Reply};
