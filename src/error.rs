use thiserror::Error;

/// Errors raised while splitting, decoding or projecting JT701 frames.
///
/// Every variant is terminal for the call that produced it: no partially
/// decoded message is ever handed back alongside an error.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Hex text with an odd digit count or a non-hex character
    #[error("malformed hex input: {0}")]
    MalformedHex(String),

    /// Buffer shorter than the smallest valid frame (a heartbeat)
    #[error("minimum packet size is {minimum} bytes, got {actual}")]
    FrameTooShort { minimum: usize, actual: usize },

    /// First byte is neither a data nor a heartbeat/command marker
    #[error("not a JT701 packet, header byte 0x{0:02X}")]
    UnrecognizedHeader(u8),

    /// Field decoded fine but its value violates a physical range
    #[error("invalid {field} value: {detail}")]
    FieldOutOfRange { field: &'static str, detail: String },

    /// Buffer ended before the field could be read in full
    #[error("incomplete {field} at offset {offset}: need {needed} bytes, {available} available")]
    IncompleteField {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Date or time digits that do not form a calendar value
    #[error("invalid date/time field {0:?}")]
    InvalidDate(String),

    /// I/O errors from the file entry points
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    pub(crate) fn out_of_range(field: &'static str, detail: impl Into<String>) -> Self {
        DecodeError::FieldOutOfRange {
            field,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
