use crate::error::{DecodeError, Result};

/// Byte cursor over one transport buffer
///
/// Every read names the field it is reading so a short buffer reports which
/// field was cut off.
pub struct FrameStream<'a> {
    data: &'a [u8],
    pub pos: usize,
}

impl<'a> FrameStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// Byte at `pos + offset` without moving the cursor
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.get(self.pos + offset).copied()
    }

    pub fn read_bytes(&mut self, field: &'static str, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(DecodeError::IncompleteField {
                field,
                offset: self.pos,
                needed: count,
                available: self.remaining(),
            });
        }
        let data: &'a [u8] = self.data;
        let slice = &data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub fn skip(&mut self, field: &'static str, count: usize) -> Result<()> {
        self.read_bytes(field, count).map(|_| ())
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.read_bytes(field, 1)?[0])
    }

    pub fn read_u16_be(&mut self, field: &'static str) -> Result<u16> {
        let bytes = self.read_bytes(field, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_be(&mut self, field: &'static str) -> Result<u32> {
        let bytes = self.read_bytes(field, 4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `count` bytes as their uppercase hex text
    ///
    /// JT701 packs most identifiers and GPS fields as BCD, so `22 34 83 10`
    /// reads as `"22348310"`.
    pub fn read_hex_text(&mut self, field: &'static str, count: usize) -> Result<String> {
        Ok(hex::encode_upper(self.read_bytes(field, count)?))
    }

    /// Read `count` bytes of ASCII decimal digits as an owned string
    pub fn read_ascii_digits(&mut self, field: &'static str, count: usize) -> Result<String> {
        let bytes = self.read_bytes(field, count)?;
        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(DecodeError::out_of_range(
                field,
                format!("{} is not ASCII digits", hex::encode_upper(bytes)),
            ));
        }
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// Advance past the next `terminator` byte, returning the bytes before it
    pub fn read_until(&mut self, field: &'static str, terminator: u8) -> Result<&'a [u8]> {
        let data: &'a [u8] = self.data;
        let rest = &data[self.pos..];
        match rest.iter().position(|&b| b == terminator) {
            Some(idx) => {
                self.pos += idx + 1;
                Ok(&rest[..idx])
            }
            None => Err(DecodeError::IncompleteField {
                field,
                offset: self.pos,
                needed: rest.len() + 1,
                available: rest.len(),
            }),
        }
    }
}

/// Parse BCD hex text as a base-10 number
///
/// Fails when the text holds a nibble above 9.
pub fn parse_decimal_digits(field: &'static str, digits: &str) -> Result<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::out_of_range(
            field,
            format!("{digits:?} is not a decimal digit string"),
        ));
    }
    digits
        .parse::<u64>()
        .map_err(|e| DecodeError::out_of_range(field, format!("{digits:?}: {e}")))
}
