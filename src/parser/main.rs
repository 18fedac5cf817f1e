use crate::error::Result;
use crate::parser::frame::decode;
use crate::parser::splitter::{decode_hex_dump, split_frames};
use crate::types::DecodedMessage;
use std::path::Path;
use tracing::debug;

/// Decode a hex dump holding any number of frames
///
/// The dump is split first and each segment decoded on its own, giving one
/// message per data frame (trailing heartbeats ride along with the frame
/// before them). Fails on the first bad segment.
pub fn decode_hex(raw: &str) -> Result<Vec<DecodedMessage>> {
    let frames = split_frames(raw)?;
    let mut messages = Vec::with_capacity(frames.len());

    for (index, frame) in frames.iter().enumerate() {
        debug!("decoding segment {} of {}", index + 1, frames.len());
        let bytes = decode_hex_dump(frame)?;
        messages.push(decode(&bytes)?);
    }

    Ok(messages)
}

/// Decode a hex dump as a single transport buffer
pub fn decode_hex_buffer(raw: &str) -> Result<DecodedMessage> {
    decode(&decode_hex_dump(raw)?)
}

/// Read a text file holding a hex dump and decode every frame in it
pub fn decode_file(file_path: &Path) -> Result<Vec<DecodedMessage>> {
    let text = std::fs::read_to_string(file_path)?;
    debug!("read {} characters from {:?}", text.len(), file_path);
    decode_hex(&text)
}
