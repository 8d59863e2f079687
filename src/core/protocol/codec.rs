// src/core/protocol/codec.rs

//! A `tokio_util::codec` implementation that decodes newline-delimited input
//! lines and encodes `Reply` messages.

use super::reply::Reply;
use crate::core::MinesweeperError;
use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Longest accepted input line, excluding the terminator. A client that sends
/// more without a newline is disconnected.
pub const MAX_LINE_LENGTH: usize = 4096;

#[derive(Debug)]
pub struct LineCodec {
    max_length: usize,
    /// Where to resume scanning for `\n`, so a partial line is not rescanned.
    next_index: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = MinesweeperError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.next_index..].iter().position(|b| *b == b'\n');
        match newline {
            Some(offset) => {
                let end = self.next_index + offset;
                self.next_index = 0;
                if end > self.max_length {
                    return Err(MinesweeperError::LineTooLong {
                        limit: self.max_length,
                    });
                }
                let line = src.split_to(end + 1);
                Ok(Some(to_line(&line[..end])))
            }
            None if src.len() > self.max_length => Err(MinesweeperError::LineTooLong {
                limit: self.max_length,
            }),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    /// A final line without a terminator is still delivered.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        self.next_index = 0;
        let rest = src.split_to(src.len());
        Ok(Some(to_line(&rest)))
    }
}

impl Encoder<Reply> for LineCodec {
    type Error = MinesweeperError;

    fn encode(&mut self, item: Reply, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let text = item.to_string();
        dst.reserve(text.len() + 1);
        dst.extend_from_slice(text.as_bytes());
        if !text.ends_with('\n') {
            dst.put_u8(b'\n');
        }
        Ok(())
    }
}

/// Strips an optional trailing `\r` and decodes lossily; invalid UTF-8 can
/// never match the grammar anyway.
fn to_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
