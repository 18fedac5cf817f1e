//! Splitting a textual hex dump into independent frames
//!
//! The dump is hex-decoded once and cut at binary frame starts. A data frame
//! declares its own length (`10 + recordLength` bytes), which is trusted when
//! it ends exactly on another marker or on the end of the stream, so a 0x24
//! byte inside a payload never splits a frame. Bytes that do not open a data
//! frame, such as a trailing heartbeat, stay attached to the segment before
//! them.

use crate::error::{DecodeError, Result};
use crate::types::{COMMAND_FRAME_MARKER, DATA_FRAME_MARKER};
use tracing::{debug, trace};

/// Bytes in a data frame ahead of the date field, covered by the length word
const DATA_FRAME_PREAMBLE: usize = 10;
/// Offset of the big-endian record length word
const RECORD_LENGTH_OFFSET: usize = 8;

/// Hex-decode a dump, ignoring any whitespace
pub fn decode_hex_dump(raw: &str) -> Result<Vec<u8>> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|e| {
        let context = match e {
            hex::FromHexError::InvalidHexCharacter { index, .. } => {
                let end = (index + 8).min(digits.len());
                let start = index.saturating_sub(8);
                match digits.get(start..end) {
                    Some(near) => format!("{e} near {near:?}"),
                    // window cuts through a multi-byte character
                    None => e.to_string(),
                }
            }
            _ => format!("{e} ({} digits)", digits.len()),
        };
        DecodeError::MalformedHex(context)
    })
}

/// Split a hex dump into frames, each returned as uppercase hex text
///
/// Fails on the first malformed digit; nothing is returned in that case.
pub fn split_frames(raw: &str) -> Result<Vec<String>> {
    let bytes = decode_hex_dump(raw)?;
    let segments: Vec<String> = frame_boundaries(&bytes)
        .into_iter()
        .map(|(start, end)| hex::encode_upper(&bytes[start..end]))
        .collect();

    debug!("split {} bytes into {} frame(s)", bytes.len(), segments.len());
    Ok(segments)
}

/// Start/end offsets of every segment in a decoded stream
pub fn frame_boundaries(bytes: &[u8]) -> Vec<(usize, usize)> {
    let mut boundaries = Vec::new();
    let mut start = 0;

    while start < bytes.len() {
        let end = if bytes[start] == DATA_FRAME_MARKER {
            data_frame_end(bytes, start)
        } else {
            next_data_marker(bytes, start + 1)
        };
        trace!("segment {}..{}", start, end);
        boundaries.push((start, end));
        start = end;
    }

    boundaries
}

/// End of the segment opened by the data frame at `start`
fn data_frame_end(bytes: &[u8], start: usize) -> usize {
    let declared_end = bytes
        .get(start + RECORD_LENGTH_OFFSET..start + RECORD_LENGTH_OFFSET + 2)
        .map(|len| start + DATA_FRAME_PREAMBLE + u16::from_be_bytes([len[0], len[1]]) as usize);

    let frame_end = match declared_end {
        Some(end) if end == bytes.len() => return end,
        Some(end)
            if end < bytes.len()
                && matches!(bytes[end], DATA_FRAME_MARKER | COMMAND_FRAME_MARKER) =>
        {
            end
        }
        _ => return next_data_marker(bytes, start + 1),
    };

    // anything trailing the frame that is not another data frame belongs to it
    next_data_marker(bytes, frame_end)
}

fn next_data_marker(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == DATA_FRAME_MARKER)
        .map(|idx| from + idx)
        .unwrap_or(bytes.len())
}
